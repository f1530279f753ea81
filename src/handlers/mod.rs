// src/handlers/mod.rs

pub mod activate;
pub mod auth;
pub mod dashboard;
pub mod posts;
pub mod site;

use axum::response::Html;

use crate::{models::account::Account, render::Page, render::SiteMeta, state::AppState};

/// Render a page through the renderer collaborator.
pub(crate) fn page(state: &AppState, page: &Page) -> Html<String> {
    Html(state.renderer.render(page))
}

/// Percent-encoded query string for reason-coded redirects.
pub(crate) fn qs(pairs: &[(&str, &str)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Tenant metadata for the public templates, with the picture reference
/// resolved to a URL.
pub(crate) fn site_meta(state: &AppState, account: &Account) -> SiteMeta {
    SiteMeta {
        name: account.name.clone(),
        username: account.username.clone(),
        about: account.about.clone(),
        picture_url: account.picture.as_deref().map(|reference| {
            state
                .pictures
                .url_for(&state.config.web_origin, &account.id, reference)
        }),
        link: account.link.clone(),
        html: account.html.clone(),
    }
}
