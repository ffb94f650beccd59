//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests: a wiremock server standing in
//! for the remote task collection.

#![allow(dead_code)]

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rota_engine::App;

/// Start a mock server standing in for the remote collection.
pub async fn start_collection() -> MockServer {
    MockServer::start().await
}

/// Collection base address on the mock server.
pub fn collection_url(server: &MockServer) -> String {
    format!("{}/todos", server.uri())
}

/// Mount the bulk-read response (GET on the collection root).
pub async fn mount_list(server: &MockServer, tasks: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tasks))
        .mount(server)
        .await;
}

/// Mount the creation response (POST on the collection root).
pub async fn mount_create(server: &MockServer, created: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(created))
        .mount(server)
        .await;
}

/// Mount the full-replace response (PUT on one element).
pub async fn mount_update(server: &MockServer, id: u64, updated: serde_json::Value) {
    Mock::given(method("PUT"))
        .and(path(format!("/todos/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .mount(server)
        .await;
}

/// Mount the deletion response (DELETE on one element, empty body).
pub async fn mount_delete(server: &MockServer, id: u64) {
    Mock::given(method("DELETE"))
        .and(path(format!("/todos/{id}")))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

/// Pump completion events until `done` holds or the deadline passes.
pub async fn settle(app: &mut App, done: impl Fn(&App) -> bool) {
    for _ in 0..200 {
        app.process_api_events();
        if done(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("coordinator did not settle");
}

/// Give in-flight actions time to land, then apply whatever arrived.
pub async fn drain(app: &mut App) {
    tokio::time::sleep(Duration::from_millis(100)).await;
    app.process_api_events();
}

/// Number of requests the server has seen with the given method.
pub async fn requests_with_method(server: &MockServer, wanted: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| req.method.as_str() == wanted)
        .count()
}
