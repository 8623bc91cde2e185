use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn read_session(home: &Path) -> Value {
    let contents = fs::read_to_string(home.join("session.json")).unwrap();
    serde_json::from_str(&contents).unwrap()
}

fn write_session(home: &Path, token: &str, role: &str) {
    fs::write(
        home.join("session.json"),
        json!({"token": token, "role": role}).to_string(),
    )
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_writes_session_file() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "admin@admin.com", "password": "Admin123!"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "jwt-admin", "user": {"id": 1, "role": "admin"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .env("RATEDESK_API_URL", format!("{}/api", server.uri()))
        .args(["login", "--email", "admin@admin.com", "--password", "Admin123!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/dashboard/admin"));

    assert_eq!(
        read_session(dir.path()),
        json!({"token": "jwt-admin", "role": "admin"})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_login_leaves_session_unchanged() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "previous", "user");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .env("RATEDESK_API_URL", format!("{}/api", server.uri()))
        .args(["login", "--email", "a@b.c", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));

    assert_eq!(
        read_session(dir.path()),
        json!({"token": "previous", "role": "user"})
    );
}

#[test]
fn test_logout_clears_session() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "jwt", "store_owner");

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));

    assert!(!dir.path().join("session.json").exists());

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn test_whoami_prints_role() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "jwt", "store_owner");

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("store_owner"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_signup_does_not_log_in() {
    let dir = tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .env("RATEDESK_API_URL", format!("{}/api", server.uri()))
        .args([
            "signup",
            "--name",
            "A Sufficiently Long Name",
            "--email",
            "new@x.com",
            "--address",
            "1 Main St",
            "--password",
            "Pass123!",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signup successful, please login."));

    assert!(!dir.path().join("session.json").exists());
}
