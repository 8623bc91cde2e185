use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_session(home: &Path, token: &str, role: &str) {
    fs::write(
        home.join("session.json"),
        json!({"token": token, "role": role}).to_string(),
    )
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rate_sends_store_id_and_rating() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "jwt-user", "user");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ratings"))
        .and(header("authorization", "Bearer jwt-user"))
        .and(body_json(json!({"storeId": 42, "rating": 5})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .env("RATEDESK_API_URL", format!("{}/api", server.uri()))
        .args(["stores", "rate", "42", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rated store 42: 5/5"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_password_mismatch_sends_nothing() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "jwt-user", "user");
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/password"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .env("RATEDESK_API_URL", format!("{}/api", server.uri()))
        .args([
            "password",
            "--current",
            "Old123!x",
            "--new",
            "New123!x",
            "--confirm",
            "New123!y",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("New passwords don't match"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_admin_users_sends_query_and_prints_table() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "jwt-admin", "admin");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .and(query_param("search", "ali"))
        .and(query_param("sortBy", "email"))
        .and(query_param("sortOrder", "desc"))
        .and(header("authorization", "Bearer jwt-admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "name": "Alice Owner", "email": "alice@x.com", "address": "A",
             "role": "store_owner", "rating": "4.50"},
            {"id": 3, "name": "Alina User", "email": "alina@x.com", "address": "B",
             "role": "user"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .env("RATEDESK_API_URL", format!("{}/api", server.uri()))
        .args([
            "admin", "users", "--search", "ali", "--sort-by", "email", "--order", "desc",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Email ↓"))
        .stdout(predicate::str::contains("4.5/5"))
        .stdout(predicate::str::contains("N/A"));
}

#[test]
fn test_admin_command_requires_admin_session() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "jwt-user", "user");

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .env("RATEDESK_API_URL", "http://127.0.0.1:9/api")
        .args(["admin", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs the admin role"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_owner_dashboard_without_ratings() {
    let dir = tempdir().unwrap();
    write_session(dir.path(), "jwt-owner", "store_owner");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/store-owner/dashboard"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"averageRating": null, "ratings": []})),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("ratedesk")
        .env("RATEDESK_HOME", dir.path())
        .env("RATEDESK_API_URL", format!("{}/api", server.uri()))
        .args(["owner", "dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total ratings: 0"))
        .stdout(predicate::str::contains("No ratings submitted yet."));
}
