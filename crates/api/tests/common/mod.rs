//! Common test utilities for integration tests.
//!
//! HTTP tests run against the in-memory store. Repository tests that need a
//! real PostgreSQL instance use [`try_create_test_pool`] and skip when
//! `TEST_DATABASE_URL` is not set.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use domain::ports::InMemoryInvitationRepository;
use referrals_api::{app::create_app, config::Config};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_BASE_URL: &str = "https://dl.example.app/invite/";

/// Connect to `TEST_DATABASE_URL` and apply migrations, or `None` when unset.
pub async fn try_create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    persistence::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

/// Memory-backed configuration with the test base URL.
pub fn test_config() -> Config {
    Config::load_for_test(&[
        ("storage.backend", "memory"),
        ("logging.level", "debug"),
        ("logging.format", "pretty"),
        ("external_urls.referral_base_url", TEST_BASE_URL),
    ])
    .expect("Failed to build test config")
}

/// App over a fresh in-memory store. The store is returned for inspection.
pub fn create_test_app() -> (Router, InMemoryInvitationRepository) {
    let repository = InMemoryInvitationRepository::new();
    let app = create_app(test_config(), Arc::new(repository.clone()));
    (app, repository)
}

/// App over a store whose every operation fails.
pub fn create_failing_test_app() -> Router {
    create_app(
        test_config(),
        Arc::new(InMemoryInvitationRepository::failing()),
    )
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_empty_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Invitation payload as clients send it.
pub fn invitation_body(channel: &str, referral_code: &str, referrer: &str) -> serde_json::Value {
    serde_json::json!({
        "channel": channel,
        "recipient_name": "Jane Doe",
        "recipient_contact": "555-0100",
        "referral_code": referral_code,
        "referrer_user_id": referrer,
    })
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

pub async fn response_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
