use dana::api::{AnalystBackend, ApiClient, ApiError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri())
}

// ============================================================================
// Chat Endpoint Tests
// ============================================================================

#[tokio::test]
async fn chat_posts_exact_message_exactly_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(serde_json::json!({"message": "Hello"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"response":"**hi**"}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let reply = client.chat("Hello").await.unwrap();

    assert_eq!(reply.response, "**hi**");
    assert_eq!(reply.image, None);
}

#[tokio::test]
async fn chat_reply_with_image_path_survives() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"response":"Here is the distribution.","image":"/static/plot_2.png"}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let reply = client.chat("Plot the distribution of X").await.unwrap();

    assert_eq!(reply.image.as_deref(), Some("/static/plot_2.png"));

    // The resolved URL carries the server base plus a cache-busting stamp.
    let url = client.image_url(reply.image.as_deref().unwrap());
    assert!(url.contains("/static/plot_2.png"));
    assert!(url.contains("t="), "missing cache-bust parameter: {url}");
    assert!(url.starts_with(&mock_server.uri()));
}

#[tokio::test]
async fn chat_null_image_is_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"response":"no plot this time","image":null}"#),
        )
        .mount(&mock_server)
        .await;

    let reply = client_for(&mock_server).chat("describe").await.unwrap();
    assert_eq!(reply.image, None);
}

#[tokio::test]
async fn chat_ignores_unknown_response_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"response":"ok","usage":{"tokens":12},"model":"internal"}"#,
        ))
        .mount(&mock_server)
        .await;

    let reply = client_for(&mock_server).chat("hi").await.unwrap();
    assert_eq!(reply.response, "ok");
}

#[tokio::test]
async fn chat_http_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"detail":"sandbox exploded"}"#),
        )
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).chat("hi").await;

    match result {
        Err(ApiError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("sandbox exploded"));
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_bad_request_maps_to_api_error() {
    // The backend answers 400 until a CSV has been uploaded.
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"detail":"Please upload a CSV first."}"#),
        )
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).chat("hi").await;
    assert!(matches!(result, Err(ApiError::Api { status: 400, .. })));
}

#[tokio::test]
async fn chat_malformed_json_maps_to_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server).chat("hi").await;
    assert!(matches!(result, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn chat_connection_refused_maps_to_network_error() {
    // Start a server only to learn a free port, then shut it down.
    let dead_uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let client = ApiClient::new(dead_uri);
    let result = client.chat("hi").await;
    assert!(matches!(result, Err(ApiError::Network(_))));
}

// ============================================================================
// Upload Endpoint Tests
// ============================================================================

#[tokio::test]
async fn upload_posts_multipart_file_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"status":"success","message":"Data loaded. Shape: (3, 2)","filename":"tiny.csv"}"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let csv = b"a,b\n1,2\n3,4\n".to_vec();
    let reply = client.upload("tiny.csv", csv).await.unwrap();

    // The server's message text comes through verbatim.
    assert_eq!(reply.message, "Data loaded. Shape: (3, 2)");

    // The request really was multipart form data with a `file` field.
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .expect("content-type header")
        .to_str()
        .unwrap();
    assert!(
        content_type.starts_with("multipart/form-data"),
        "got content-type: {content_type}"
    );
    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"tiny.csv\""));
    assert!(body.contains("a,b"));
}

#[tokio::test]
async fn upload_http_error_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .upload("data.csv", b"a,b\n".to_vec())
        .await;
    assert!(matches!(result, Err(ApiError::Api { status: 500, .. })));
}

#[tokio::test]
async fn upload_malformed_json_maps_to_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .upload("data.csv", b"a,b\n".to_vec())
        .await;
    assert!(matches!(result, Err(ApiError::Parse(_))));
}
