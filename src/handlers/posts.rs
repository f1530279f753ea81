// src/handlers/posts.rs
//
// Owner-side post lifecycle: slug reservation, editing, the one-way publish
// transition and terminal soft delete. Deleted and unknown posts are
// indistinguishable: both bounce to the dashboard.

use axum::{
    extract::{Extension, Form, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{account::Account, post::Post, view::View},
    render::Page,
    state::AppState,
    utils::{markdown, validate},
};

use super::page;

/// Owner-scoped lookup that treats deleted posts as not-found.
async fn live_post(
    state: &AppState,
    account: &Account,
    slug: &str,
) -> Result<Option<Post>, AppError> {
    let post = Post::find_by_slug(&state.pool, &account.id, slug).await?;
    Ok(post.filter(Post::dashboard_visible))
}

#[derive(Debug, Deserialize)]
pub struct NewPostQuery {
    error: Option<String>,
}

pub async fn new_page(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Query(query): Query<NewPostQuery>,
) -> impl IntoResponse {
    page(&state, &Page::NewPost {
        username: account.username,
        error: query.error,
    })
}

#[derive(Debug, Deserialize)]
pub struct NewPostForm {
    slug: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Form(form): Form<NewPostForm>,
) -> Result<Response, AppError> {
    let Some(slug) = form.slug else {
        return Err(AppError::BadRequest("missing fields".into()));
    };

    let slug = validate::normalize_slug(&slug);
    if slug.is_empty() {
        return Ok(Redirect::to("/new").into_response());
    }
    if slug.chars().count() > validate::SLUG_MAX {
        return Ok(Redirect::to("/new?error=length").into_response());
    }
    if !validate::valid_slug(&slug) {
        return Ok(Redirect::to("/new?error=chars").into_response());
    }

    // Atomic reservation: winner goes to the editor, losers learn the slug
    // is taken without a separate existence check.
    let (post, created) = Post::create_if_slug_free(&state.pool, &account.id, &slug).await?;
    if created {
        Ok(Redirect::to(&format!("/post/{}/edit", post.slug)).into_response())
    } else {
        Ok(Redirect::to("/new?error=unique").into_response())
    }
}

pub async fn view(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let Some(post) = live_post(&state, &account, &slug).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    // Drafts never display a count.
    let views = match post.published_at {
        Some(_) => Some(View::count(&state.pool, &post.id).await?),
        None => None,
    };

    Ok(page(&state, &Page::ViewPost {
        slug: post.slug.clone(),
        username: account.username,
        title: post.title.clone(),
        content_html: post.content.as_deref().map(markdown::to_html),
        draft: post.published_at.is_none(),
        views,
    })
    .into_response())
}

/// One-way Draft -> Published. Publishing an already-published post is a
/// redirect, not an error, and leaves `published_at` untouched.
pub async fn publish(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let Some(post) = live_post(&state, &account, &slug).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    if post.published_at.is_some() {
        return Ok(Redirect::to(&format!("/post/{}", post.slug)).into_response());
    }

    Post::publish(&state.pool, &post.id).await?;

    Ok(Redirect::to(&format!("/post/{}", post.slug)).into_response())
}

pub async fn delete_page(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let Some(post) = live_post(&state, &account, &slug).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    Ok(page(&state, &Page::DeletePost { slug: post.slug }).into_response())
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let Some(post) = live_post(&state, &account, &slug).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    Post::soft_delete(&state.pool, &post.id).await?;

    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn edit_page(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let Some(post) = live_post(&state, &account, &slug).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    Ok(page(&state, &Page::EditPost {
        slug: post.slug,
        title: post.title,
        content: post.content,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct EditPostForm {
    title: Option<String>,
    content: Option<String>,
}

pub async fn edit(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(slug): Path<String>,
    Form(form): Form<EditPostForm>,
) -> Result<Response, AppError> {
    let (Some(title), Some(content)) = (form.title, form.content) else {
        return Err(AppError::BadRequest("missing fields".into()));
    };

    let Some(post) = live_post(&state, &account, &slug).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    let title = validate::truncate_chars(&title, validate::TITLE_MAX).trim().to_string();
    let content = content.trim().to_string();

    // Empty fields are stored as NULL, not "".
    Post::update_content(
        &state.pool,
        &post.id,
        (!title.is_empty()).then_some(title.as_str()),
        (!content.is_empty()).then_some(content.as_str()),
    )
    .await?;

    Ok(Redirect::to(&format!("/post/{}", post.slug)).into_response())
}
