// src/services.rs
//
// Narrow interfaces to the external collaborators the core calls into:
// payment provider, picture storage and social-card imaging. The core never
// inspects what comes back beyond the types below.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use uuid::Uuid;

/// Result of a verified checkout webhook.
#[derive(Debug)]
pub struct CheckoutOutcome {
    pub account_id: String,
    pub paid: bool,
}

#[derive(Debug)]
pub struct PaymentError(pub String);

/// Payment provider contract. Activation is a one-time paid state; the core
/// reacts to a successful checkout only by flipping `activated`.
#[async_trait]
pub trait Payments: Send + Sync {
    /// Starts a checkout for the account and returns the URL to send the
    /// user to.
    async fn create_checkout(&self, account_id: &str, email: &str)
    -> Result<String, PaymentError>;

    /// Verifies a signed webhook payload. A signature failure must surface
    /// as an error (the webhook request is then rejected), never be
    /// silently ignored.
    fn verify_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<CheckoutOutcome, PaymentError>;
}

/// Placeholder wired when no payment configuration is present. Checkout
/// attempts fail softly (the caller redirects back to the dashboard) and
/// every webhook is rejected.
pub struct DisabledPayments;

#[async_trait]
impl Payments for DisabledPayments {
    async fn create_checkout(&self, _: &str, _: &str) -> Result<String, PaymentError> {
        Err(PaymentError("payments not configured".into()))
    }

    fn verify_webhook(&self, _: &[u8], _: Option<&str>) -> Result<CheckoutOutcome, PaymentError> {
        Err(PaymentError("payments not configured".into()))
    }
}

#[derive(Deserialize)]
struct WebhookEvent {
    account_id: String,
    paid: bool,
}

/// Thin glue for a provider that signs webhook calls with a shared secret
/// and hosts a fixed checkout page. The provider-specific protocol details
/// stay on the provider's side of this interface.
pub struct SharedSecretPayments {
    pub checkout_url: String,
    pub secret: String,
}

#[async_trait]
impl Payments for SharedSecretPayments {
    async fn create_checkout(
        &self,
        account_id: &str,
        email: &str,
    ) -> Result<String, PaymentError> {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("account", account_id)
            .append_pair("email", email)
            .finish();
        Ok(format!("{}?{}", self.checkout_url, query))
    }

    fn verify_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<CheckoutOutcome, PaymentError> {
        if signature != Some(self.secret.as_str()) {
            return Err(PaymentError("invalid webhook signature".into()));
        }

        let event: WebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| PaymentError(format!("malformed webhook payload: {e}")))?;

        Ok(CheckoutOutcome {
            account_id: event.account_id,
            paid: event.paid,
        })
    }
}

/// Profile picture storage: bytes go in under a per-account namespace, an
/// opaque reference comes out.
#[async_trait]
pub trait PictureStore: Send + Sync {
    async fn store(&self, account_id: &str, bytes: &[u8]) -> std::io::Result<String>;

    fn url_for(&self, web_origin: &str, account_id: &str, reference: &str) -> String {
        format!("{web_origin}/uploads/{account_id}/{reference}")
    }
}

/// Filesystem-backed store, served back via the static `/uploads` mount.
pub struct FsPictureStore {
    pub root: PathBuf,
}

#[async_trait]
impl PictureStore for FsPictureStore {
    async fn store(&self, account_id: &str, bytes: &[u8]) -> std::io::Result<String> {
        let reference = format!("{}.webp", Uuid::new_v4());
        let dir = self.root.join(account_id);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&reference), bytes).await?;
        Ok(reference)
    }
}

/// Social-card imaging. Pure: label and title in, PNG bytes out. `None`
/// means the collaborator declines (the route then answers 404).
pub trait CardRenderer: Send + Sync {
    fn render(&self, site_label: &str, title: &str) -> Option<Vec<u8>>;

    /// The main-site logo image.
    fn logo(&self) -> Option<Vec<u8>> {
        None
    }
}

/// Default when no imaging backend is wired in.
pub struct NoCards;

impl CardRenderer for NoCards {
    fn render(&self, _: &str, _: &str) -> Option<Vec<u8>> {
        None
    }
}
