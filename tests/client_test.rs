use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use kor_gec::domain::ai::{maybe_retrying, CompletionClient, UpstageClient};
use kor_gec::utils::AppError;

const TEST_API_KEY: &str = "test-api-key";

// ===== Helper Functions =====

#[derive(Clone)]
struct MockApi {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn completions(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> (StatusCode, String) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    api.requests.lock().unwrap().push((auth, payload));
    (api.status, api.body.clone())
}

/// 고정 응답을 돌려주는 로컬 서버를 띄우고 (엔드포인트 URL, 받은 요청 목록)을 돌려줍니다.
async fn spawn_mock_api(
    status: StatusCode,
    body: &str,
) -> (String, Arc<Mutex<Vec<(Option<String>, Value)>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let api = MockApi {
        status,
        body: body.to_string(),
        requests: requests.clone(),
    };
    let app = Router::new()
        .route("/v1/solar/chat/completions", post(completions))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1/solar/chat/completions", addr), requests)
}

fn client(url: &str) -> UpstageClient {
    UpstageClient::new(url, TEST_API_KEY, "solar-pro", Duration::from_secs(5)).unwrap()
}

// ===== Success =====

mod success {
    use super::*;

    #[tokio::test]
    async fn should_return_first_choice_content() {
        // Arrange
        let (url, _) = spawn_mock_api(
            StatusCode::OK,
            r#"{"choices":[{"message":{"role":"assistant","content":"foo"}}]}"#,
        )
        .await;

        // Act
        let result = client(&url).complete("hello").await;

        // Assert
        assert_eq!(result.unwrap(), "foo");
    }

    #[tokio::test]
    async fn should_send_bearer_key_and_single_user_message() {
        // Arrange
        let (url, requests) = spawn_mock_api(
            StatusCode::OK,
            r#"{"choices":[{"message":{"content":"ok"}}]}"#,
        )
        .await;

        // Act
        client(&url).complete("교정해 주세요").await.unwrap();

        // Assert
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let (auth, body) = &requests[0];
        assert_eq!(auth.as_deref(), Some("Bearer test-api-key"));
        assert_eq!(
            body,
            &json!({
                "model": "solar-pro",
                "messages": [{ "role": "user", "content": "교정해 주세요" }]
            })
        );
    }

    #[tokio::test]
    async fn should_send_temperature_only_when_set() {
        let (url, requests) = spawn_mock_api(
            StatusCode::OK,
            r#"{"choices":[{"message":{"content":"ok"}}]}"#,
        )
        .await;

        client(&url)
            .with_temperature(Some(0.0))
            .complete("hi")
            .await
            .unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].1["temperature"], json!(0.0));
    }
}

// ===== Failures =====

mod failure {
    use super::*;

    #[tokio::test]
    async fn should_fail_once_on_client_error() {
        // Arrange
        let (url, requests) = spawn_mock_api(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Invalid API key"}}"#,
        )
        .await;

        // Act
        let result = client(&url).complete("hi").await;

        // Assert
        assert!(matches!(result, Err(AppError::Api { status: 401, .. })));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_not_retry_server_error_by_default() {
        let (url, requests) =
            spawn_mock_api(StatusCode::INTERNAL_SERVER_ERROR, "internal error").await;
        let client = maybe_retrying(client(&url), false);

        let result = client.complete("hi").await;

        assert!(matches!(result, Err(AppError::Api { status: 500, .. })));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_reject_body_without_choices() {
        let (url, _) = spawn_mock_api(StatusCode::OK, r#"{"result":"foo"}"#).await;

        let result = client(&url).complete("hi").await;

        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn should_reject_empty_choices() {
        let (url, _) = spawn_mock_api(StatusCode::OK, r#"{"choices":[]}"#).await;

        let result = client(&url).complete("hi").await;

        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn should_report_transport_error_for_unreachable_endpoint() {
        // 바인딩 후 바로 닫아 아무도 듣지 않는 포트
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(&format!("http://{}/v1/solar/chat/completions", addr))
            .complete("hi")
            .await;

        assert!(matches!(result, Err(AppError::ApiTransport { .. })));
    }
}
