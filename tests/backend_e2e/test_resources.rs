//! E2E tests: resource clients, error normalization and request headers.

use secrecy::SecretString;
use tcm_lib::api::ApiClient;
use tcm_lib::config::Config;
use tcm_lib::error::AppError;
use tcm_lib::models::TestRunStatus;

use super::fixtures::*;
use super::mock_backend::{BROKEN_SUITE_ID, MockBackend, MockState};

/// (1) Existing product is decoded from the JSON body.
#[actix_rt::test]
async fn test_get_product() {
    let mock = MockBackend::start(MockState {
        products: vec![product(PRODUCT_ID, "Payments")],
        ..Default::default()
    })
    .await;
    let client = client_for(&mock);

    let found = client.products().get(PRODUCT_ID).await.unwrap();

    assert_eq!(found.id, PRODUCT_ID);
    assert_eq!(found.name, "Payments");
}

/// (2) A 404 with a JSON body surfaces the server's message and status.
#[actix_rt::test]
async fn test_unknown_product_carries_server_message() {
    let mock = MockBackend::start(MockState::default()).await;
    let client = client_for(&mock);

    let err = client.products().get("missing").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Product not found");
}

/// (3) A plain-text 500 body becomes the error message.
#[actix_rt::test]
async fn test_plain_text_error_body() {
    let mock = MockBackend::start(MockState::default()).await;
    let client = client_for(&mock);

    let err = client
        .test_suites()
        .test_cases(BROKEN_SUITE_ID)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), "database unavailable");
}

/// (4) Blank identifiers are rejected before any request is sent.
#[actix_rt::test]
async fn test_blank_ids_never_reach_the_server() {
    let mock = MockBackend::start(MockState::default()).await;
    let client = client_for(&mock);

    let err = client.products().get(" ").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = client
        .test_runs()
        .update_status(PRODUCT_ID, "", TestRunStatus::Completed)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    assert_eq!(mock.request_count(), 0);
}

/// (5) Language preference and session token travel on every request.
#[actix_rt::test]
async fn test_language_and_session_headers() {
    let mock = MockBackend::start(MockState {
        products: vec![product(PRODUCT_ID, "Payments")],
        ..Default::default()
    })
    .await;
    let mut config = Config::for_api_url(&mock.base_url);
    config.language = "fr".to_string();
    config.session_token = Some(SecretString::from("session-abc".to_string()));
    let client = ApiClient::new(&config).unwrap();

    client.products().get(PRODUCT_ID).await.unwrap();
    let _ = client.products().get("missing").await;

    let state = mock.state();
    assert_eq!(state.requests.len(), 2);
    for seen in &state.requests {
        assert_eq!(seen.language.as_deref(), Some("fr"));
        assert_eq!(seen.authorization.as_deref(), Some("Bearer session-abc"));
    }
}

/// (6) Without a session token no Authorization header is sent.
#[actix_rt::test]
async fn test_no_token_no_authorization_header() {
    let mock = MockBackend::start(MockState::default()).await;
    let client = client_for(&mock);

    let _ = client.products().get("missing").await;

    let state = mock.state();
    assert_eq!(state.requests[0].authorization, None);
    assert_eq!(state.requests[0].language.as_deref(), Some("en"));
}

/// (7) Run status is stored as a bare JSON string.
#[actix_rt::test]
async fn test_status_body_is_bare_string() {
    let mock = MockBackend::start(MockState::default()).await;
    let client = client_for(&mock);

    client
        .test_runs()
        .update_status(PRODUCT_ID, "r1", TestRunStatus::InProgress)
        .await
        .unwrap();

    let state = mock.state();
    assert_eq!(state.status_writes.len(), 1);
    let (product_id, run_id, body) = &state.status_writes[0];
    assert_eq!(product_id, PRODUCT_ID);
    assert_eq!(run_id, "r1");
    assert_eq!(body, "\"In Progress\"");
    assert_eq!(state.requests[0].method, "PUT");
}

/// (8) Uploads download as raw bytes.
#[actix_rt::test]
async fn test_download_upload_bytes() {
    let mut initial = MockState::default();
    initial
        .uploads
        .insert("u1".to_string(), vec![0x89, b'P', b'N', b'G']);
    let mock = MockBackend::start(initial).await;
    let client = client_for(&mock);

    let bytes = client.uploads().download("u1").await.unwrap();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);

    let err = client.uploads().download("u2").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Upload not found");
}

/// (9) An unreachable backend is a transport error without a status.
#[actix_rt::test]
async fn test_unreachable_backend() {
    let mut config = Config::for_api_url("http://127.0.0.1:9");
    config.connect_timeout_secs = 1;
    config.request_timeout_secs = 2;
    let client = ApiClient::new(&config).unwrap();

    let err = client.products().get(PRODUCT_ID).await.unwrap_err();

    assert!(matches!(err, AppError::Request { status: None, .. }));
}
