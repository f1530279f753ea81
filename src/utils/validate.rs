// src/utils/validate.rs
//
// Boundary validation and normalization. Usernames and slugs are part of the
// public URL contract ({username}.{domain}/{slug}) so their charset rules are
// load-bearing: lowercase [0-9a-z] for usernames, plus hyphen for slugs.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;
use validator::ValidateEmail;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 16;
pub const NAME_MAX: usize = 32;
pub const EMAIL_MAX: usize = 64;
pub const ABOUT_MAX: usize = 512;
pub const LINK_MAX: usize = 128;
pub const HTML_MAX: usize = 1024;
pub const SLUG_MAX: usize = 32;
pub const TITLE_MAX: usize = 64;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-z]+$").unwrap());
static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-z\-]+$").unwrap());
static HYPHEN_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Usernames that can never be registered because they collide with
/// infrastructure hostnames or main-site surfaces.
const RESERVED_USERNAMES: &[&str] = &[
    "www", "api", "mail", "admin", "blog", "help", "support", "assets", "uploads", "static",
    "dashboard", "login", "register", "feed", "about", "status", "news", "dev", "app", "mta",
    "smtp", "docs", "shop", "store",
];

pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

pub fn reserved_username(username: &str) -> bool {
    RESERVED_USERNAMES.contains(&username)
}

/// Trim, case-fold and collapse hyphen runs. Charset is checked separately so
/// the caller can report a distinct reason code.
pub fn normalize_slug(raw: &str) -> String {
    let slug = raw.trim().to_lowercase();
    HYPHEN_RUN_RE.replace_all(&slug, "-").into_owned()
}

pub fn valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

pub fn valid_email(email: &str) -> bool {
    email.validate_email()
}

/// Normalize a profile link: the scheme is stripped, the remainder must
/// contain a dot and parse as a URL when prefixed with `https://`. Anything
/// else is treated as unset.
pub fn normalize_link(raw: &str) -> Option<String> {
    let mut link = raw.trim();
    if let Some((_, rest)) = link.split_once("://") {
        link = rest;
    }

    if link.is_empty() || !link.contains('.') {
        return None;
    }

    match Url::parse(&format!("https://{link}")) {
        Ok(_) => Some(link.to_string()),
        Err(_) => None,
    }
}

/// Character-wise truncation for form fields (byte truncation could split a
/// UTF-8 sequence).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_normalization_is_idempotent() {
        for raw in ["  Alice ", "BOB", "carol123", "d-ash"] {
            let once = normalize_username(raw);
            assert_eq!(normalize_username(&once), once);
        }
    }

    #[test]
    fn username_charset() {
        assert!(valid_username("alice99"));
        assert!(!valid_username("al ice"));
        assert!(!valid_username("al-ice"));
        assert!(!valid_username("Alice"));
        assert!(!valid_username(""));
    }

    #[test]
    fn reserved_usernames_blocked() {
        assert!(reserved_username("www"));
        assert!(reserved_username("dashboard"));
        assert!(!reserved_username("alice"));
    }

    #[test]
    fn slug_normalization_collapses_hyphens() {
        assert_eq!(normalize_slug(" Hello--World "), "hello-world");
        assert_eq!(normalize_slug("a---b--c"), "a-b-c");
        let once = normalize_slug("A--B");
        assert_eq!(normalize_slug(&once), once);
    }

    #[test]
    fn slug_charset() {
        assert!(valid_slug("hello-world"));
        assert!(valid_slug("2024"));
        assert!(!valid_slug("hello world"));
        assert!(!valid_slug("héllo"));
    }

    #[test]
    fn link_normalization() {
        assert_eq!(
            normalize_link("https://example.com/me"),
            Some("example.com/me".to_string())
        );
        assert_eq!(normalize_link("example.com"), Some("example.com".to_string()));
        assert_eq!(normalize_link("no-dot"), None);
        assert_eq!(normalize_link(""), None);
    }

    #[test]
    fn email_validation() {
        assert!(valid_email("a@b.co"));
        assert!(!valid_email("not-an-email"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
