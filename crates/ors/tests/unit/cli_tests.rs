//! CLI parsing and end-to-end lookup tests

use clap::Parser;
use ors::cli::{Cli, Command, LookupKind, lookup};
use ors::domain::RequestContext;
use ors::infrastructure::AppConfig;
use std::path::PathBuf;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    for upstream in [&mut config.upstreams.users, &mut config.upstreams.products] {
        upstream.base_url = server.uri();
        upstream.policy.retry_count = 0;
    }
    config
}

#[test]
fn test_parse_serve_with_config() {
    let cli = Cli::try_parse_from(["ors", "serve", "--config", "/etc/ors/ors.toml"]).unwrap();
    assert_eq!(cli.command, Command::Serve);
    assert_eq!(cli.config, Some(PathBuf::from("/etc/ors/ors.toml")));
}

#[test]
fn test_parse_lookup() {
    let id = Uuid::new_v4();
    let cli = Cli::try_parse_from([
        "ors",
        "lookup",
        "product",
        &id.to_string(),
        "--authorization",
        "Bearer abc",
    ])
    .unwrap();

    assert!(cli.config.is_none());
    assert_eq!(
        cli.command,
        Command::Lookup {
            kind: LookupKind::Product,
            id,
            authorization: Some("Bearer abc".to_string()),
        }
    );
}

#[test]
fn test_parse_rejects_bad_input() {
    assert!(Cli::try_parse_from(["ors", "lookup", "order", &Uuid::new_v4().to_string()]).is_err());
    assert!(Cli::try_parse_from(["ors", "lookup", "user", "not-a-uuid"]).is_err());
    assert!(Cli::try_parse_from(["ors"]).is_err());
}

#[tokio::test]
async fn test_lookup_prints_found_user() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();
    Mock::given(method("GET"))
        .and(path(format!("/gateway/users/{id}")))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"userID":"{id}","email":"ana@example.com","name":"Ana","gender":"Female"}}"#
        )))
        .mount(&server)
        .await;

    let output = lookup(
        &config_for(&server),
        LookupKind::User,
        id,
        &RequestContext::with_authorization("Bearer abc"),
    )
    .await
    .unwrap();

    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["status"], "found");
    assert_eq!(json["entity"]["name"], "Ana");
}

#[tokio::test]
async fn test_lookup_prints_not_found_and_degraded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/gateway/products/{}", Uuid::nil())))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let config = config_for(&server);

    let output = lookup(&config, LookupKind::Product, Uuid::nil(), &RequestContext::new())
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["status"], "not_found");

    let output = lookup(&config, LookupKind::Product, Uuid::new_v4(), &RequestContext::new())
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["entity"]["category"], "Unavailable");
}

#[tokio::test]
async fn test_lookup_surfaces_caller_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_string("malformed id"))
        .mount(&server)
        .await;

    let error = lookup(
        &config_for(&server),
        LookupKind::User,
        Uuid::new_v4(),
        &RequestContext::new(),
    )
    .await
    .unwrap_err();
    assert!(error.to_string().contains("malformed id"));
}
