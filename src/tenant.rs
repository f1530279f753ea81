// src/tenant.rs
//
// Tenant resolution. Every request, including static asset and webhook
// requests, passes through `resolve`; downstream handlers receive
// `Option<Tenant>` and must tolerate the none case.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{error::AppError, models::account::Account, state::AppState};

/// An activated account resolved from the request hostname.
#[derive(Debug, Clone)]
pub struct Tenant(pub Account);

/// Hostname from the Host header, with any port stripped.
pub fn host_of(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|h| h.split(':').next().unwrap_or(h))
        .unwrap_or("")
}

/// Splits the hostname into a candidate subdomain label and the remainder.
/// The remainder must equal the apex domain exactly, else there is no
/// candidate at all.
fn subdomain_of<'a>(host: &'a str, domain: &str) -> Option<&'a str> {
    let (label, rest) = host.split_once('.')?;
    (rest == domain && !label.is_empty()).then_some(label)
}

/// Axum middleware: maps the request hostname to an activated tenant, or no
/// tenant (the request is then addressed to the main site). No side effects.
pub async fn resolve(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let host = host_of(req.headers()).to_string();

    let tenant = match subdomain_of(&host, &state.config.domain) {
        Some(label) => Account::find_by_username(&state.pool, label)
            .await?
            .filter(|account| account.activated)
            .map(Tenant),
        None => None,
    };

    req.extensions_mut().insert(tenant);
    Ok(next.run(req).await)
}

/// Axum middleware for main-site routes: anything addressed to a hostname
/// other than the apex domain is sent back to the canonical origin. This is
/// the chained fallback behind the tenant routes, not an error.
pub async fn main_site_gate(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if host_of(req.headers()) != state.config.domain {
        return Redirect::to(&state.config.web_origin).into_response();
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdomain_requires_exact_apex_match() {
        assert_eq!(subdomain_of("alice.example.com", "example.com"), Some("alice"));
        assert_eq!(subdomain_of("example.com", "example.com"), None);
        assert_eq!(subdomain_of("alice.other.com", "example.com"), None);
        assert_eq!(subdomain_of("a.b.example.com", "example.com"), None);
        assert_eq!(subdomain_of("localhost", "example.com"), None);
    }

    #[test]
    fn host_header_port_is_stripped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, "alice.example.com:8000".parse().unwrap());
        assert_eq!(host_of(&headers), "alice.example.com");
    }
}
