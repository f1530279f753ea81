// src/session.rs
//
// Credential/session plumbing: opaque token issuance, cookie handling, the
// identity resolver and the dashboard authorization gate.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite, time::Duration};
use rand::Rng;
use rand::rngs::OsRng;
use sqlx::SqlitePool;
use std::net::SocketAddr;

use crate::{
    error::AppError,
    models::{account::Account, session::Session},
    state::AppState,
};

pub const TOKEN_COOKIE: &str = "token";
pub const TOKEN_LEN: usize = 32;
const COOKIE_MAX_AGE_DAYS: i64 = 90;

const TOKEN_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates an opaque lowercase-alnum bearer token from the OS RNG.
pub fn generate_token() -> String {
    let mut rng = OsRng;
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARS[rng.gen_range(0..TOKEN_CHARS.len())] as char)
        .collect()
}

/// Creates a session row for the account and returns the fresh token.
pub async fn issue(
    pool: &SqlitePool,
    account_id: &str,
    address: &str,
) -> Result<String, AppError> {
    let token = generate_token();
    Session::create(pool, account_id, address, &token).await?;
    Ok(token)
}

/// Identity resolver: maps a bearer token to its account.
///
/// Absent or malformed tokens short-circuit without touching the store. On a
/// hit the session's `used_at` is refreshed before the account is returned.
/// Sessions are never expired server-side; the cookie max-age is the only
/// lifetime bound.
pub async fn auth(pool: &SqlitePool, token: Option<&str>) -> Result<Option<Account>, AppError> {
    let Some(token) = token else { return Ok(None) };
    if token.len() != TOKEN_LEN
        || !token
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return Ok(None);
    }

    let Some(session) = Session::find_by_token(pool, token).await? else {
        return Ok(None);
    };

    Session::touch(pool, &session.id).await?;

    Ok(Account::find_by_id(pool, &session.account_id).await?)
}

/// Extracts the session token from the Cookie header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .find_map(|kv| kv.trim().strip_prefix(&format!("{TOKEN_COOKIE}=")))
        .map(str::to_string)
}

/// Set-Cookie value for a fresh session. HttpOnly; the 90-day max-age is
/// advisory only, the store never purges.
pub fn session_cookie(token: &str) -> String {
    Cookie::build((TOKEN_COOKIE, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(COOKIE_MAX_AGE_DAYS))
        .build()
        .to_string()
}

/// Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    Cookie::build((TOKEN_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
        .to_string()
}

/// Best-effort client address: first X-Forwarded-For entry when present
/// (the service runs behind a trusted proxy), else the socket peer.
pub fn client_addr(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| peer.ip().to_string())
}

/// Axum middleware: the dashboard authorization gate.
///
/// Resolves the session cookie to an account and injects it as an extension.
/// No identity is a routine condition, answered with a redirect to the login
/// entry point rather than an error.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from_headers(req.headers());

    match auth(&state.pool, token.as_deref()).await? {
        Some(account) => {
            req.extensions_mut().insert(account);
            Ok(next.run(req).await)
        }
        None => Ok(Redirect::to("/login").into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_fixed_length_lowercase_alnum() {
        for _ in 0..20 {
            let token = generate_token();
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(
                token
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
            );
        }
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn cookie_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            "other=1; token=abcdefghijklmnopqrstuvwxyz012345".parse().unwrap(),
        );
        assert_eq!(
            token_from_headers(&headers).as_deref(),
            Some("abcdefghijklmnopqrstuvwxyz012345")
        );

        let empty = HeaderMap::new();
        assert_eq!(token_from_headers(&empty), None);
    }
}
