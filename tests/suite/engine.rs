//! End-to-end coordinator scenarios against a mock collection.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rota_engine::{App, SyncPhase, TaskApi, UiOptions};
use rota_types::TaskId;

use crate::common;
use crate::common::{drain, settle};

fn app_for(server: &MockServer) -> App {
    let base = Url::parse(&common::collection_url(server)).unwrap();
    App::new(TaskApi::new(base).unwrap(), UiOptions::default())
}

#[tokio::test]
async fn initial_load_renders_the_collection() {
    let server = common::start_collection().await;
    common::mount_list(&server, json!([{"id": 1, "title": "A", "completed": false}])).await;

    let mut app = app_for(&server);
    assert_eq!(app.phase(), SyncPhase::Loading);

    app.start();
    settle(&mut app, |app| app.phase() == SyncPhase::Ready).await;

    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.tasks()[0].title, "A");
    assert!(!app.tasks()[0].completed);
}

#[tokio::test]
async fn add_task_appends_server_record_and_clears_draft() {
    let server = common::start_collection().await;
    common::mount_list(&server, json!([{"id": 1, "title": "A", "completed": false}])).await;
    common::mount_create(&server, json!({"id": 2, "title": "B", "completed": false})).await;

    let mut app = app_for(&server);
    app.start();
    settle(&mut app, |app| app.phase() == SyncPhase::Ready).await;

    for c in "B".chars() {
        app.draft_mut().enter_char(c);
    }
    app.add_task();
    settle(&mut app, |app| app.tasks().len() == 2).await;

    assert_eq!(app.tasks()[0].id, TaskId::new(1));
    assert_eq!(app.tasks()[1].id, TaskId::new(2));
    assert_eq!(app.tasks()[1].title, "B");
    assert_eq!(app.draft().text(), "");
}

#[tokio::test]
async fn toggle_replaces_matching_element_in_place() {
    let server = common::start_collection().await;
    common::mount_list(
        &server,
        json!([
            {"id": 1, "title": "A", "completed": false},
            {"id": 2, "title": "B", "completed": false},
        ]),
    )
    .await;
    common::mount_update(&server, 1, json!({"id": 1, "title": "A", "completed": true})).await;

    let mut app = app_for(&server);
    app.start();
    settle(&mut app, |app| app.phase() == SyncPhase::Ready).await;

    app.toggle_selected();
    settle(&mut app, |app| app.tasks()[0].completed).await;

    // Same length, same id order; only the toggled element changed.
    assert_eq!(app.tasks().len(), 2);
    assert_eq!(app.tasks()[0].id, TaskId::new(1));
    assert_eq!(app.tasks()[1].id, TaskId::new(2));
    assert!(!app.tasks()[1].completed);
}

#[tokio::test]
async fn delete_drops_the_confirmed_element() {
    let server = common::start_collection().await;
    common::mount_list(
        &server,
        json!([
            {"id": 1, "title": "A", "completed": false},
            {"id": 2, "title": "B", "completed": false},
        ]),
    )
    .await;
    common::mount_delete(&server, 2).await;

    let mut app = app_for(&server);
    app.start();
    settle(&mut app, |app| app.phase() == SyncPhase::Ready).await;

    app.select_next();
    app.delete_selected();
    settle(&mut app, |app| app.tasks().len() == 1).await;

    assert_eq!(app.tasks()[0].id, TaskId::new(1));
    assert_eq!(app.selected(), 0);
}

#[tokio::test]
async fn empty_draft_submit_sends_no_request() {
    let server = common::start_collection().await;
    common::mount_list(&server, json!([])).await;

    let mut app = app_for(&server);
    app.start();
    settle(&mut app, |app| app.phase() == SyncPhase::Ready).await;

    app.add_task();
    drain(&mut app).await;

    assert_eq!(common::requests_with_method(&server, "POST").await, 0);
    assert!(app.is_empty());
}

#[tokio::test]
async fn failed_action_leaves_state_at_last_consistent_value() {
    let server = common::start_collection().await;
    common::mount_list(&server, json!([{"id": 1, "title": "A", "completed": false}])).await;
    Mock::given(method("PUT"))
        .and(path("/todos/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut app = app_for(&server);
    app.start();
    settle(&mut app, |app| app.phase() == SyncPhase::Ready).await;

    app.toggle_selected();
    drain(&mut app).await;

    // No rollback needed: mutation only ever happens after success.
    assert_eq!(app.tasks().len(), 1);
    assert!(!app.tasks()[0].completed);
}

#[tokio::test]
async fn reload_rereads_the_whole_collection() {
    let server = common::start_collection().await;
    common::mount_list(&server, json!([{"id": 1, "title": "A", "completed": false}])).await;

    let mut app = app_for(&server);
    app.start();
    settle(&mut app, |app| app.phase() == SyncPhase::Ready).await;

    app.reload();
    drain(&mut app).await;

    assert_eq!(common::requests_with_method(&server, "GET").await, 2);
    assert_eq!(app.tasks().len(), 1);
}
