// tests/account_tests.rs
//
// End-to-end tests for registration, login, sessions and account settings.
// Each test spawns the real router on a random port over a fresh in-memory
// database and drives it with reqwest (redirects off, cookies on).

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::net::SocketAddr;
use wisp::{config::Config, routes, state::AppState};

const DOMAIN: &str = "example.test";

struct TestApp {
    address: String,
    pool: SqlitePool,
}

async fn spawn_app() -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        domain: DOMAIN.to_string(),
        web_origin: format!("http://{DOMAIN}"),
        rust_log: "error".to_string(),
        upload_dir: std::env::temp_dir()
            .join("wisp-test-uploads")
            .to_string_lossy()
            .into_owned(),
        checkout_url: Some("https://pay.example.test/checkout".to_string()),
        webhook_secret: Some("whsec_test".to_string()),
    };

    let state = AppState::new(pool.clone(), config);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        pool,
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap()
}

fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Register an account. Every account needs its own client address because
/// of the one-account-per-address-per-day rule.
async fn register(
    client: &reqwest::Client,
    app: &TestApp,
    username: &str,
    email: &str,
    address: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/register", app.address))
        .header("host", DOMAIN)
        .header("x-forwarded-for", address)
        .form(&[
            ("name", "Test User"),
            ("username", username),
            ("email", email),
            ("password", "password123"),
        ])
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app().await;

    let response = client()
        .get(format!("{}/nope/not/here", app.address))
        .header("host", DOMAIN)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works_and_opens_a_session() {
    let app = spawn_app().await;
    let client = client();

    let response = register(&client, &app, "alice", "alice@x.com", "10.0.0.1").await;
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), "/dashboard");

    // The cookie from the redirect authenticates the dashboard.
    let dashboard = client
        .get(format!("{}/dashboard", app.address))
        .header("host", DOMAIN)
        .send()
        .await
        .unwrap();
    assert_eq!(dashboard.status().as_u16(), 200);
    assert!(dashboard.text().await.unwrap().contains("alice"));
}

#[tokio::test]
async fn register_validation_reason_codes() {
    let app = spawn_app().await;
    let client = client();

    let cases = [
        ("yo", "yo@x.com", "username_min_length"),
        ("thisusernameiswaytoolong", "a@x.com", "username_max_length"),
        ("has space", "a@x.com", "username_chars"),
        ("under_score", "a@x.com", "username_chars"),
        ("okname", "not-an-email", "email_chars"),
    ];

    for (i, (username, email, code)) in cases.iter().enumerate() {
        let response = register(&client, &app, username, email, &format!("10.1.0.{i}")).await;
        assert_eq!(response.status().as_u16(), 303);
        assert!(
            location(&response).contains(&format!("error={code}")),
            "expected {code} for username {username:?}, got {}",
            location(&response)
        );
    }

    // Empty field short-circuits first.
    let response = register(&client, &app, "", "a@x.com", "10.1.1.1").await;
    assert!(location(&response).contains("error=fields_empty"));
}

#[tokio::test]
async fn duplicate_username_is_rejected_case_insensitively() {
    let app = spawn_app().await;

    let response = register(&client(), &app, "alice", "alice@x.com", "10.0.0.1").await;
    assert_eq!(location(&response), "/dashboard");

    let response = register(&client(), &app, "Alice", "other@x.com", "10.0.0.2").await;
    assert!(location(&response).contains("error=username_taken"));

    // Exactly one row exists.
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE username = 'alice'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = spawn_app().await;

    register(&client(), &app, "alice", "alice@x.com", "10.0.0.1").await;
    let response = register(&client(), &app, "bob", "alice@x.com", "10.0.0.2").await;

    assert!(location(&response).contains("error=email_taken"));
}

#[tokio::test]
async fn reserved_usernames_are_taken() {
    let app = spawn_app().await;

    let response = register(&client(), &app, "www", "w@x.com", "10.0.0.1").await;
    assert!(location(&response).contains("error=username_taken"));
}

#[tokio::test]
async fn second_account_from_same_address_fails_generically() {
    let app = spawn_app().await;

    register(&client(), &app, "alice", "alice@x.com", "10.0.0.1").await;
    let response = register(&client(), &app, "bob", "bob@x.com", "10.0.0.1").await;

    assert!(location(&response).contains("error=generic"));
}

#[tokio::test]
async fn login_works_with_username_or_email() {
    let app = spawn_app().await;
    register(&client(), &app, "alice", "alice@x.com", "10.0.0.1").await;

    for identifier in ["alice", "alice@x.com", "ALICE"] {
        let client = client();
        let response = client
            .post(format!("{}/login", app.address))
            .header("host", DOMAIN)
            .form(&[("username", identifier), ("password", "password123")])
            .send()
            .await
            .unwrap();
        assert_eq!(location(&response), "/dashboard", "identifier {identifier}");
    }
}

#[tokio::test]
async fn login_with_wrong_password_redirects_back() {
    let app = spawn_app().await;
    register(&client(), &app, "alice", "alice@x.com", "10.0.0.1").await;

    let response = client()
        .post(format!("{}/login", app.address))
        .header("host", DOMAIN)
        .form(&[("username", "alice"), ("password", "wrong")])
        .send()
        .await
        .unwrap();

    let location = location(&response);
    assert!(location.starts_with("/login?"));
    assert!(location.contains("error"));
}

#[tokio::test]
async fn dashboard_requires_a_session() {
    let app = spawn_app().await;

    let response = client()
        .get(format!("{}/dashboard", app.address))
        .header("host", DOMAIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let app = spawn_app().await;
    let client = client();
    register(&client, &app, "alice", "alice@x.com", "10.0.0.1").await;

    let response = client
        .post(format!("{}/logout", app.address))
        .header("host", DOMAIN)
        .form(&[("noop", "1")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/");

    let dashboard = client
        .get(format!("{}/dashboard", app.address))
        .header("host", DOMAIN)
        .send()
        .await
        .unwrap();
    assert_eq!(location(&dashboard), "/login");
}

#[tokio::test]
async fn email_change_conflict_redirects_back_to_form() {
    let app = spawn_app().await;
    register(&client(), &app, "alice", "alice@x.com", "10.0.0.1").await;

    let bob = client();
    register(&bob, &app, "bob", "bob@x.com", "10.0.0.2").await;

    let response = bob
        .post(format!("{}/email", app.address))
        .header("host", DOMAIN)
        .form(&[("email", "alice@x.com")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/email");

    // A free address goes through.
    let response = bob
        .post(format!("{}/email", app.address))
        .header("host", DOMAIN)
        .form(&[("email", "bob2@x.com")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn password_change_flow() {
    let app = spawn_app().await;
    let client = client();
    register(&client, &app, "alice", "alice@x.com", "10.0.0.1").await;

    let post = |form: Vec<(&'static str, &'static str)>| {
        let client = &client;
        let address = &app.address;
        async move {
            client
                .post(format!("{address}/password"))
                .header("host", DOMAIN)
                .form(&form)
                .send()
                .await
                .unwrap()
        }
    };

    let response = post(vec![
        ("old", "password123"),
        ("password", "newpass"),
        ("password2", "different"),
    ])
    .await;
    assert_eq!(location(&response), "/password?error=match");

    let response = post(vec![
        ("old", "wrong"),
        ("password", "newpass"),
        ("password2", "newpass"),
    ])
    .await;
    assert_eq!(location(&response), "/password?error=old");

    let response = post(vec![
        ("old", "password123"),
        ("password", "newpass"),
        ("password2", "newpass"),
    ])
    .await;
    assert_eq!(location(&response), "/dashboard");

    // The new password logs in.
    let response = client
        .post(format!("{}/login", app.address))
        .header("host", DOMAIN)
        .form(&[("username", "alice"), ("password", "newpass")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn webhook_rejects_bad_signatures_and_activates_on_good_ones() {
    let app = spawn_app().await;
    let client = client();
    register(&client, &app, "alice", "alice@x.com", "10.0.0.1").await;

    let (account_id,): (String,) =
        sqlx::query_as("SELECT id FROM accounts WHERE username = 'alice'")
            .fetch_one(&app.pool)
            .await
            .unwrap();

    let payload = serde_json::json!({ "account_id": account_id, "paid": true }).to_string();

    // Missing and wrong signatures are rejected.
    let response = client
        .post(format!("{}/activate", app.address))
        .header("host", DOMAIN)
        .body(payload.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(format!("{}/activate", app.address))
        .header("host", DOMAIN)
        .header("x-webhook-signature", "nope")
        .body(payload.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let (activated,): (bool,) =
        sqlx::query_as("SELECT activated FROM accounts WHERE username = 'alice'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert!(!activated);

    // A properly signed event activates the account.
    let response = client
        .post(format!("{}/activate", app.address))
        .header("host", DOMAIN)
        .header("x-webhook-signature", "whsec_test")
        .body(payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let (activated,): (bool,) =
        sqlx::query_as("SELECT activated FROM accounts WHERE username = 'alice'")
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert!(activated);

    // The tenant site now resolves.
    let response = client
        .get(format!("{}/", app.address))
        .header("host", format!("alice.{DOMAIN}"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn checkout_redirects_to_the_payment_collaborator() {
    let app = spawn_app().await;
    let client = client();
    register(&client, &app, "alice", "alice@x.com", "10.0.0.1").await;

    let response = client
        .get(format!("{}/activate", app.address))
        .header("host", DOMAIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 303);
    assert!(location(&response).starts_with("https://pay.example.test/checkout?"));
}
