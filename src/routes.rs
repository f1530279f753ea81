// src/routes.rs

use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    middleware,
    routing::{get, post},
};
use tower::ServiceExt;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{activate, auth, dashboard, posts, site},
    session,
    state::AppState,
    tenant::{self, Tenant},
};

/// Assembles the main application router.
///
/// Dispatch is host-first: the tenant resolver runs on every request, and a
/// request that resolved a tenant is answered entirely by the tenant surface,
/// even when its path collides with a main-site route (a published post may
/// legitimately be named `login` or `dashboard`). Only `/assets` is shared
/// across all hostnames.
pub fn create_router(state: AppState) -> Router {
    // The tenant subdomain surface. Unmatched paths chain-fall back to the
    // canonical origin, they are not errors.
    let tenant_site = Router::new()
        .route("/", get(site::index))
        .route("/feed.xml", get(site::feed))
        .route("/{slug}", get(site::post_page))
        .route("/{slug}/card.png", get(site::post_card))
        .fallback(site::unmatched)
        .with_state(state.clone());

    let dashboard_routes = Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/profile", get(dashboard::profile_page).post(dashboard::profile_update))
        .route("/email", get(dashboard::email_page).post(dashboard::email_update))
        .route("/password", get(dashboard::password_page).post(dashboard::password_update))
        .route("/html", get(dashboard::html_page).post(dashboard::html_update))
        .route("/picture", post(dashboard::picture_upload))
        .route("/logout", get(auth::logout_page).post(auth::logout))
        .route("/new", get(posts::new_page).post(posts::create))
        .route("/post/{slug}", get(posts::view))
        .route("/post/{slug}/publish", post(posts::publish))
        .route("/post/{slug}/delete", get(posts::delete_page).post(posts::delete))
        .route("/post/{slug}/edit", get(posts::edit_page).post(posts::edit))
        // Gate matched routes only: unknown paths must stay 404, not bounce
        // to the login page.
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::auth_middleware,
        ));

    // The apex surface. The gate wraps the fallback as well: on a foreign
    // hostname that resolved no tenant, every path goes back to the origin.
    let main_site = Router::new()
        .route("/", get(site::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        // GET checks its own session; POST is the unauthenticated webhook.
        .route("/activate", get(activate::checkout).post(activate::webhook))
        .route("/logo.png", get(site::logo))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .merge(dashboard_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tenant::main_site_gate,
        ))
        .with_state(state.clone());

    let dispatch = move |req: Request| {
        let tenant_site = tenant_site.clone();
        let main_site = main_site.clone();
        async move {
            let resolved = matches!(req.extensions().get::<Option<Tenant>>(), Some(Some(_)));
            let router = if resolved { tenant_site } else { main_site };
            match router.oneshot(req).await {
                Ok(response) => response,
                Err(infallible) => match infallible {},
            }
        }
    };

    Router::new()
        // Stylesheets are linked by every page shell, tenant pages included,
        // so they sit in front of the host dispatch.
        .nest_service("/assets", ServeDir::new("assets"))
        .fallback(dispatch)
        // Global middleware (applied from outside in)
        .layer(middleware::from_fn_with_state(state.clone(), tenant::resolve))
        .layer(TraceLayer::new_for_http())
        // Picture uploads arrive as base64 form bodies.
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
        .with_state(state)
}
