// src/handlers/activate.rs
//
// Activation is the one-time paid state that makes a tenant's subdomain
// public. The core only talks to the payment collaborator through its
// narrow interface and reacts to a successful checkout by flipping
// `activated`.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};

use crate::{error::AppError, models::account::Account, session, state::AppState};

const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// `GET /activate`: send the owner to checkout. Already-activated accounts
/// and collaborator failures both land back on the dashboard.
pub async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = session::token_from_headers(&headers);
    let Some(account) = session::auth(&state.pool, token.as_deref()).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    if account.activated {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    match state.payments.create_checkout(&account.id, &account.email).await {
        Ok(url) => Ok(Redirect::to(&url).into_response()),
        Err(e) => {
            tracing::warn!("checkout failed for account {}: {}", account.id, e.0);
            Ok(Redirect::to("/dashboard").into_response())
        }
    }
}

/// `POST /activate`: inbound payment webhook. A signature or payload
/// failure rejects the request; it is never silently ignored.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let outcome = match state.payments.verify_webhook(&body, signature) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("rejected payment webhook: {}", e.0);
            return Ok(StatusCode::BAD_REQUEST.into_response());
        }
    };

    if outcome.paid {
        Account::activate(&state.pool, &outcome.account_id).await?;
        tracing::info!("account {} activated", outcome.account_id);
    }

    Ok(StatusCode::OK.into_response())
}
