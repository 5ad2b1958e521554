use axum::extract::Multipart;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use voicebook_client::{BookingApi, ClientError, HttpBookingClient, ServiceConfig};

/// Serves `router` on an ephemeral port and returns the API base URL.
async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api/", addr)
}

async fn welcome(headers: HeaderMap) -> Json<Value> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    Json(json!({
        "message": format!("Hi, I'm Rachel ({content_type})"),
        "result_audio_path": "audio/welcome.mp3"
    }))
}

/// Echoes what arrived in the upload back through the transcription field.
async fn book(mut multipart: Multipart) -> Result<Json<Value>, (StatusCode, String)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
        .ok_or((StatusCode::BAD_REQUEST, "no field".to_string()))?;

    let name = field.name().unwrap_or_default().to_string();
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(json!({
        "transcription": format!("{name}|{file_name}|{content_type}|{}", data.len()),
        "booking_result": {
            "message": "Monday is full",
            "result_audio_path": "audio/reply.mp3",
            "alternatives": [{ "day": "Tuesday", "times": ["09:00", "15:30"] }]
        }
    })))
}

fn mock_service() -> Router {
    Router::new()
        .route("/api/welcome-doctor", get(welcome))
        .route("/api/voice-chat/book-appointment", post(book))
}

#[tokio::test]
async fn greet_fetches_welcome_message() {
    let base = spawn_backend(mock_service()).await;
    let client = HttpBookingClient::new(&ServiceConfig::new(&base)).unwrap();

    let greeting = client.greet().await.unwrap();
    assert_eq!(greeting.message, "Hi, I'm Rachel (application/json)");
    assert_eq!(greeting.result_audio_path, "audio/welcome.mp3");
    assert_eq!(
        client.resolve_audio_url(&greeting.result_audio_path),
        format!("{base}audio/welcome.mp3")
    );
}

#[tokio::test]
async fn booking_uploads_multipart_audio() {
    let base = spawn_backend(mock_service()).await;
    let client = HttpBookingClient::new(&ServiceConfig::new(&base)).unwrap();

    let reply = client.book_appointment(vec![7u8; 1234]).await.unwrap();
    assert_eq!(reply.transcription, "file|myFile.wav|audio/mpeg|1234");
    assert_eq!(reply.booking_result.message, "Monday is full");

    let alternatives = reply.booking_result.alternatives.unwrap();
    assert_eq!(alternatives.len(), 1);
    assert_eq!(alternatives[0].day, "Tuesday");
    assert_eq!(alternatives[0].times, vec!["09:00", "15:30"]);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let router = Router::new().route(
        "/api/welcome-doctor",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "speech backend down") }),
    );
    let base = spawn_backend(router).await;
    let client = HttpBookingClient::new(&ServiceConfig::new(&base)).unwrap();

    match client.greet().await {
        Err(ClientError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "speech backend down");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_endpoint_is_a_status_error() {
    let base = spawn_backend(Router::new()).await;
    let client = HttpBookingClient::new(&ServiceConfig::new(&base)).unwrap();

    let result = client.book_appointment(vec![1, 2, 3]).await;
    assert!(matches!(result, Err(ClientError::Status { status: 404, .. })));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let router = Router::new().route(
        "/api/welcome-doctor",
        get(|| async { Json(json!({ "greeting": "wrong shape" })) }),
    );
    let base = spawn_backend(router).await;
    let client = HttpBookingClient::new(&ServiceConfig::new(&base)).unwrap();

    let result = client.greet().await;
    assert!(matches!(result, Err(ClientError::Decode(_))), "got {:?}", result);
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    // Bind and immediately drop a listener so the port is closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpBookingClient::new(&ServiceConfig::new(format!("http://{}/", addr))).unwrap();
    let result = client.greet().await;
    assert!(matches!(result, Err(ClientError::Transport(_))));
}

#[tokio::test]
async fn slow_service_times_out() {
    let router = Router::new().route(
        "/api/welcome-doctor",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            "too late"
        }),
    );
    let base = spawn_backend(router).await;
    let config = ServiceConfig {
        api_url: base,
        request_timeout_secs: 1,
    };
    let client = HttpBookingClient::new(&config).unwrap();

    match client.greet().await {
        Err(ClientError::Transport(e)) => assert!(e.is_timeout(), "got: {}", e),
        other => panic!("Expected timeout, got {:?}", other),
    }
}
