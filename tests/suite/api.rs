//! Data-access tests against a mock collection.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use rota_engine::TaskApi;
use rota_types::TaskId;

use crate::common;

fn api_for(server: &wiremock::MockServer) -> TaskApi {
    let base = Url::parse(&common::collection_url(server)).unwrap();
    TaskApi::new(base).unwrap()
}

#[tokio::test]
async fn fetch_all_decodes_the_collection() {
    let server = common::start_collection().await;
    common::mount_list(
        &server,
        json!([
            {"id": 1, "title": "A", "completed": false},
            {"id": 2, "title": "B", "completed": true},
        ]),
    )
    .await;

    let tasks = api_for(&server).fetch_all().await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, TaskId::new(1));
    assert_eq!(tasks[0].title, "A");
    assert!(tasks[1].completed);
}

#[tokio::test]
async fn fetch_all_tolerates_extra_record_fields() {
    let server = common::start_collection().await;
    common::mount_list(
        &server,
        json!([{"userId": 1, "id": 1, "title": "A", "completed": false}]),
    )
    .await;

    let tasks = api_for(&server).fetch_all().await.unwrap();
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn create_posts_title_with_completed_false() {
    let server = common::start_collection().await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(body_json(json!({"title": "B", "completed": false})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 2, "title": "B", "completed": false})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let task = api_for(&server).create("B").await.unwrap();

    assert_eq!(task.id, TaskId::new(2));
    assert_eq!(task.title, "B");
    assert!(!task.completed);
}

#[tokio::test]
async fn update_puts_full_body_to_the_element() {
    let server = common::start_collection().await;
    Mock::given(method("PUT"))
        .and(path("/todos/1"))
        .and(body_json(json!({"title": "A", "completed": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "title": "A", "completed": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let task = api_for(&server)
        .update(TaskId::new(1), "A", true)
        .await
        .unwrap();

    assert!(task.completed);
}

#[tokio::test]
async fn remove_issues_one_delete_and_ignores_the_body() {
    let server = common::start_collection().await;
    common::mount_delete(&server, 7).await;

    api_for(&server).remove(TaskId::new(7)).await.unwrap();

    assert_eq!(common::requests_with_method(&server, "DELETE").await, 1);
}

#[tokio::test]
async fn server_error_propagates_as_failure() {
    let server = common::start_collection().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(api_for(&server).fetch_all().await.is_err());
}

#[tokio::test]
async fn malformed_body_propagates_as_failure() {
    let server = common::start_collection().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(api_for(&server).fetch_all().await.is_err());
}
