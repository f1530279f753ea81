// src/handlers/dashboard.rs
//
// Owner dashboard and account settings. Every handler here sits behind the
// auth gate and receives the resolved account as an extension.

use axum::{
    extract::{Extension, Form, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{account::Account, post::Post},
    render::{DashboardPost, Page, format_date},
    state::AppState,
    utils::{
        hash::{hash_password, verify_password},
        validate,
    },
};

use super::page;

/// Ordered onboarding hint for the dashboard.
fn tip_for(account: &Account, posts: &[Post]) -> Option<String> {
    let tip = if account.picture.is_none() {
        "First of all, upload a profile picture by hitting that + button!"
    } else if account.about.is_none() {
        "Write a little something about yourself in the \"about\" section - use the \"Edit Profile\" button"
    } else if account.link.is_none() {
        "Help people find you elsewhere on the internet by adding a link to your youtube/twitter/discord/whatever profile (use the \"Edit Profile\" button)"
    } else if posts.is_empty() {
        "What's a blog without some posts? Hit \"New Post\" and start writing. Can't think of anything? How about a short post introducing yourself!"
    } else {
        return None;
    };
    Some(tip.to_string())
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<Response, AppError> {
    let posts = Post::list_for_dashboard(&state.pool, &account.id).await?;

    let tip = tip_for(&account, &posts);
    let posts = posts
        .iter()
        .map(|post| DashboardPost {
            slug: post.slug.clone(),
            title: post.title.clone(),
            date: format_date(&post.created_at),
            draft: post.published_at.is_none(),
        })
        .collect();

    let picture_url = account.picture.as_deref().map(|reference| {
        state
            .pictures
            .url_for(&state.config.web_origin, &account.id, reference)
    });

    Ok(page(&state, &Page::Dashboard {
        name: account.name,
        username: account.username,
        email: account.email,
        picture_url,
        link: account.link,
        posts,
        tip,
        activated: account.activated,
    })
    .into_response())
}

pub async fn profile_page(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> impl IntoResponse {
    page(&state, &Page::Profile {
        name: account.name,
        about: account.about,
        link: account.link,
    })
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    name: Option<String>,
    about: Option<String>,
    link: Option<String>,
}

pub async fn profile_update(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let (Some(name), Some(about), Some(link)) = (form.name, form.about, form.link) else {
        return Err(AppError::BadRequest("missing fields".into()));
    };

    let name = validate::truncate_chars(&name, validate::NAME_MAX).trim().to_string();
    let about = validate::truncate_chars(&about, validate::ABOUT_MAX).trim().to_string();
    let link = validate::normalize_link(validate::truncate_chars(&link, validate::LINK_MAX));

    // Empty inputs are normalized to unset, never stored as empty strings.
    // An empty name keeps the current one.
    Account::update_profile(
        &state.pool,
        &account.id,
        (!name.is_empty()).then_some(name.as_str()),
        (!about.is_empty()).then_some(about.as_str()),
        link.as_deref(),
    )
    .await?;

    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn email_page(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> impl IntoResponse {
    page(&state, &Page::Email { email: account.email })
}

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    email: Option<String>,
}

pub async fn email_update(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Form(form): Form<EmailForm>,
) -> Result<Response, AppError> {
    let Some(email) = form.email else {
        return Err(AppError::BadRequest("missing fields".into()));
    };

    let email = validate::truncate_chars(&email, validate::EMAIL_MAX)
        .trim()
        .to_lowercase();

    // Invalid input means no change, not an error.
    if email.is_empty() || !validate::valid_email(&email) {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    // Emails are globally unique; a collision sends the user back to retry.
    if !Account::update_email(&state.pool, &account.id, &email).await? {
        return Ok(Redirect::to("/email").into_response());
    }

    Ok(Redirect::to("/dashboard").into_response())
}

#[derive(Debug, Deserialize)]
pub struct PasswordQuery {
    error: Option<String>,
}

pub async fn password_page(
    State(state): State<AppState>,
    Extension(_account): Extension<Account>,
    Query(query): Query<PasswordQuery>,
) -> impl IntoResponse {
    page(&state, &Page::Password { error: query.error })
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    old: Option<String>,
    password: Option<String>,
    password2: Option<String>,
}

pub async fn password_update(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Form(form): Form<PasswordForm>,
) -> Result<Response, AppError> {
    let (Some(old), Some(password), Some(password2)) = (form.old, form.password, form.password2)
    else {
        return Err(AppError::BadRequest("missing fields".into()));
    };

    if old.trim().is_empty() || password.trim().is_empty() || password2.trim().is_empty() {
        return Ok(Redirect::to("/password").into_response());
    }

    if password != password2 {
        return Ok(Redirect::to("/password?error=match").into_response());
    }

    if !verify_password(&old, &account.password)? {
        return Ok(Redirect::to("/password?error=old").into_response());
    }

    let password_hash = hash_password(&password)?;
    Account::update_password(&state.pool, &account.id, &password_hash).await?;

    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn html_page(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> impl IntoResponse {
    page(&state, &Page::CustomHtml { html: account.html })
}

#[derive(Debug, Deserialize)]
pub struct HtmlForm {
    html: Option<String>,
}

pub async fn html_update(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Form(form): Form<HtmlForm>,
) -> Result<Response, AppError> {
    let Some(html) = form.html else {
        return Err(AppError::BadRequest("missing fields".into()));
    };

    let html = validate::truncate_chars(&html, validate::HTML_MAX).trim().to_string();

    Account::update_html(
        &state.pool,
        &account.id,
        (!html.is_empty()).then_some(html.as_str()),
    )
    .await?;

    Ok(Redirect::to("/dashboard").into_response())
}

#[derive(Debug, Deserialize)]
pub struct PictureForm {
    picture: Option<String>,
}

/// Accepts a base64 data URL and hands the bytes to the picture store.
/// Processing/storage failure is fatal to this request only; the client may
/// simply retry.
pub async fn picture_upload(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Form(form): Form<PictureForm>,
) -> Result<Response, AppError> {
    let Some(picture) = form.picture else {
        return Err(AppError::BadRequest("missing fields".into()));
    };

    let encoded = picture
        .split_once("base64,")
        .map(|(_, data)| data)
        .ok_or_else(|| AppError::InternalServerError("malformed picture data URL".into()))?;

    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| AppError::InternalServerError(format!("picture decode failed: {e}")))?;

    let reference = state
        .pictures
        .store(&account.id, &bytes)
        .await
        .map_err(|e| AppError::InternalServerError(format!("picture store failed: {e}")))?;

    Account::set_picture(&state.pool, &account.id, &reference).await?;

    Ok(Redirect::to("/dashboard").into_response())
}
