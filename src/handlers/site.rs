// src/handlers/site.rs
//
// Public tenant routes: blog homepage, RSS feed, individual posts and
// social cards. The host dispatch sends every request with a resolved
// tenant here; anything the surface doesn't serve chains back to the
// canonical origin.

use axum::{
    extract::{ConnectInfo, Extension, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use std::net::SocketAddr;

use crate::{
    error::AppError,
    models::{post::Post, view::View},
    render::{self, Page, PostPreview},
    session,
    state::AppState,
    tenant::{self, Tenant},
};

use super::{page, site_meta};

/// Where a tenant path goes when no tenant is resolved: foreign hostnames
/// bounce to the canonical origin, the apex domain gets a plain 404.
fn fall_through(state: &AppState, headers: &HeaderMap) -> Response {
    if tenant::host_of(headers) != state.config.domain {
        Redirect::to(&state.config.web_origin).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Fallback for paths the tenant surface doesn't serve: back to the
/// canonical origin, chaining into the main site.
pub async fn unmatched(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config.web_origin)
}

fn previews(posts: &[Post], date: impl Fn(&Post) -> String) -> Vec<PostPreview> {
    posts
        .iter()
        .map(|post| PostPreview {
            slug: post.slug.clone(),
            title: post.title.clone(),
            preview: render::preview(post.content.as_deref()),
            date: date(post),
        })
        .collect()
}

/// `GET /`: tenant blog homepage, or the main-site homepage on the apex.
pub async fn index(
    State(state): State<AppState>,
    Extension(tenant): Extension<Option<Tenant>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(Tenant(site)) = tenant else {
        return main_index(&state, &headers).await;
    };

    let posts = Post::list_published(&state.pool, &site.id).await?;
    let posts = previews(&posts, |p| {
        render::format_date(&p.published_at.unwrap_or(p.created_at))
    });

    Ok(page(&state, &Page::SiteHome { site: site_meta(&state, &site), posts }).into_response())
}

/// Main-site homepage: authenticated visitors go straight to the dashboard.
async fn main_index(state: &AppState, headers: &HeaderMap) -> Result<Response, AppError> {
    if tenant::host_of(headers) != state.config.domain {
        return Ok(Redirect::to(&state.config.web_origin).into_response());
    }

    let token = session::token_from_headers(headers);
    if session::auth(&state.pool, token.as_deref()).await?.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    Ok(page(state, &Page::Home).into_response())
}

/// `GET /feed.xml`: RSS feed of the tenant's published posts.
pub async fn feed(
    State(state): State<AppState>,
    Extension(tenant): Extension<Option<Tenant>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(Tenant(site)) = tenant else {
        return Ok(fall_through(&state, &headers));
    };

    let posts = Post::list_published(&state.pool, &site.id).await?;
    let posts = previews(&posts, |p| {
        p.published_at.unwrap_or(p.created_at).to_rfc2822()
    });

    let xml = render::feed_xml(&site_meta(&state, &site), &state.config.domain, &posts);

    Ok(([(header::CONTENT_TYPE, "application/rss+xml")], xml).into_response())
}

/// `GET /{slug}`: a published post on the tenant site. Drafts, deleted
/// posts and unknown slugs all look the same: back to the blog homepage.
pub async fn post_page(
    State(state): State<AppState>,
    Extension(tenant): Extension<Option<Tenant>>,
    Path(slug): Path<String>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(Tenant(site)) = tenant else {
        return Ok(fall_through(&state, &headers));
    };

    let post = match Post::find_by_slug(&state.pool, &site.id, &slug).await? {
        Some(post) if post.publicly_visible() => post,
        _ => return Ok(Redirect::to("/").into_response()),
    };

    // Counted at most once per visitor address, ever.
    let address = session::client_addr(&headers, peer);
    View::record(&state.pool, &post.id, &address).await?;

    let published_at = post.published_at.unwrap_or(post.created_at);
    let rendered = Page::SitePost {
        site: site_meta(&state, &site),
        slug: post.slug.clone(),
        title: post.title.clone(),
        date: render::format_date(&published_at),
        content_html: post.content.as_deref().map(crate::utils::markdown::to_html),
    };

    Ok(page(&state, &rendered).into_response())
}

/// `GET /{slug}/card.png`: social card image for a published post.
pub async fn post_card(
    State(state): State<AppState>,
    Extension(tenant): Extension<Option<Tenant>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(Tenant(site)) = tenant else {
        return Ok(fall_through(&state, &headers));
    };

    let post = match Post::find_by_slug(&state.pool, &site.id, &slug).await? {
        Some(post) if post.publicly_visible() => post,
        _ => return Err(AppError::NotFound),
    };

    let label = format!("{}.{}/{}", site.username, state.config.domain, post.slug);
    let title = post.title.as_deref().unwrap_or("Untitled Post");

    match state.cards.render(&label, title) {
        Some(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response()),
        None => Err(AppError::NotFound),
    }
}

/// `GET /logo.png`: main-site logo from the card collaborator.
pub async fn logo(State(state): State<AppState>) -> Result<Response, AppError> {
    match state.cards.logo() {
        Some(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response()),
        None => Err(AppError::NotFound),
    }
}
