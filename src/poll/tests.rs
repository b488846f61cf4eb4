use super::*;
use crate::error::Error;
use crate::model::TaskStatus;
use crate::rest::{RestClient, RestConfig};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(base: String) -> RestClient {
    RestClient::new(RestConfig::builder().base_url(base).no_throttle().build()).unwrap()
}

fn fast<T: Send>(future: FutureResult<T>) -> FutureResult<T> {
    future.with_cadence(Duration::from_millis(5), Duration::from_millis(10))
}

#[tokio::test]
async fn test_get_polls_until_terminal_status() {
    let mock_server = MockServer::start().await;

    // Two in-progress responses, then terminal success: exactly three polls
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "OK"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let handler = TaskPollHandler::new("test task", |status: TaskStatus| Ok(status.status));
    let future = fast(FutureResult::new(
        client(mock_server.uri()),
        "/api/tasks/t1",
        handler,
    ));

    let state = future.get().await.unwrap();
    assert!(state.is_success());
}

#[tokio::test]
async fn test_running_status_body_is_pending() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "RUNNING"})),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "OK"})),
        )
        .mount(&mock_server)
        .await;

    let mut future = fast(FutureResult::new(
        client(mock_server.uri()),
        "/api/tasks/t1",
        TaskPollHandler::unit("test task"),
    ));

    assert!(!future.poll().await.unwrap());
    assert!(future.poll().await.unwrap());
    assert!(future.is_done());
    assert_eq!(future.polls(), 2);
    future.get().await.unwrap();
}

#[tokio::test]
async fn test_failed_task_carries_server_messages() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ERROR",
            "messages": ["invalid object", "missing dataset"]
        })))
        .mount(&mock_server)
        .await;

    let future = fast(FutureResult::new(
        client(mock_server.uri()),
        "/api/tasks/t1",
        TaskPollHandler::unit("partial export"),
    ));

    let err = future.get().await.unwrap_err();
    match err {
        Error::TaskFailed {
            operation,
            messages,
        } => {
            assert_eq!(operation, "partial export");
            assert_eq!(messages, vec!["invalid object", "missing dataset"]);
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_canceled_task_without_messages_reports_state() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "CANCELED"})),
        )
        .mount(&mock_server)
        .await;

    let future = fast(FutureResult::new(
        client(mock_server.uri()),
        "/api/tasks/t1",
        TaskPollHandler::unit("project creation"),
    ));

    let err = future.get().await.unwrap_err();
    match err {
        Error::TaskFailed { messages, .. } => {
            assert_eq!(messages.len(), 1);
            assert!(messages[0].contains("Canceled"));
        }
        other => panic!("expected TaskFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_location_header_migrates_polling_uri() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/old"))
        .respond_with(ResponseTemplate::new(202).insert_header("Location", "/api/tasks/new"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/new"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "OK"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut future = fast(FutureResult::new(
        client(mock_server.uri()),
        "/api/tasks/old",
        TaskPollHandler::unit("test task"),
    ));

    assert!(!future.poll().await.unwrap());
    assert_eq!(future.polling_uri(), "/api/tasks/new");
    assert!(future.poll().await.unwrap());
}

#[tokio::test]
async fn test_transport_error_mapping() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let handler = TaskPollHandler::unit("project creation").map_transport_error(|e| {
        if e.is_not_found_status() {
            Error::ProjectNotFound {
                uri: "/api/projects/p1".to_string(),
            }
        } else {
            e
        }
    });
    let future = fast(FutureResult::new(
        client(mock_server.uri()),
        "/api/tasks/t1",
        handler,
    ));

    let err = future.get().await.unwrap_err();
    assert!(matches!(err, Error::ProjectNotFound { .. }));
}

#[tokio::test]
async fn test_get_within_times_out() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&mock_server)
        .await;

    let future = fast(FutureResult::new(
        client(mock_server.uri()),
        "/api/tasks/t1",
        TaskPollHandler::unit("test task"),
    ));

    let err = future.get_within(Duration::from_millis(40)).await.unwrap_err();
    match err {
        Error::PollTimeout { uri, timeout_ms } => {
            assert_eq!(uri, "/api/tasks/t1");
            assert_eq!(timeout_ms, 40);
        }
        other => panic!("expected PollTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_within_returns_result_before_deadline() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/t1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "OK"})),
        )
        .mount(&mock_server)
        .await;

    let future = fast(FutureResult::new(
        client(mock_server.uri()),
        "/api/tasks/t1",
        TaskPollHandler::unit("test task"),
    ));

    future.get_within(Duration::from_secs(5)).await.unwrap();
}

#[tokio::test]
async fn test_json_handler_polls_domain_document() {
    let mock_server = MockServer::start().await;

    #[derive(serde::Deserialize)]
    struct RunDoc {
        code: String,
    }

    Mock::given(method("GET"))
        .and(path("/api/runs/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "DOWNLOADING"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/runs/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "SYNCHRONIZED"
        })))
        .mount(&mock_server)
        .await;

    let handler = JsonPollHandler::new(
        "process run",
        |doc: &RunDoc| doc.code == "SYNCHRONIZED",
        |doc| Ok(doc.code),
    );
    let future = fast(FutureResult::new(
        client(mock_server.uri()),
        "/api/runs/r1",
        handler,
    ));

    assert_eq!(future.get().await.unwrap(), "SYNCHRONIZED");
}

#[test]
fn test_poll_response_helpers() {
    let response = PollResponse {
        status: reqwest::StatusCode::ACCEPTED,
        location: None,
        body: serde_json::Value::Null,
    };
    assert!(response.is_accepted());

    let response = PollResponse {
        status: reqwest::StatusCode::OK,
        location: None,
        body: serde_json::json!({"status": "OK"}),
    };
    let status: TaskStatus = response.json().unwrap();
    assert!(status.is_success());
}
