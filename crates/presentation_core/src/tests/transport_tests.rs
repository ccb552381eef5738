use std::sync::Arc;

use super::*;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use shared::domain::ContactFields;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct EndpointState {
    status: StatusCode,
    body: Value,
    received: Arc<Mutex<Vec<SubmissionRequest>>>,
}

async fn handle_submit(
    State(state): State<EndpointState>,
    Json(request): Json<SubmissionRequest>,
) -> (StatusCode, Json<Value>) {
    state.received.lock().await.push(request);
    (state.status, Json(state.body.clone()))
}

async fn spawn_endpoint(
    status: StatusCode,
    body: Value,
) -> anyhow::Result<(String, Arc<Mutex<Vec<SubmissionRequest>>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = EndpointState {
        status,
        body,
        received: Arc::clone(&received),
    };
    let app = Router::new()
        .route("/submit", post(handle_submit))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/submit"), received))
}

fn request() -> SubmissionRequest {
    SubmissionRequest::from_fields(
        "test-access-key",
        &ContactFields {
            name: "Grace".into(),
            email: "grace@example.com".into(),
            message: "Let's talk".into(),
        },
    )
}

#[tokio::test]
async fn posts_json_body_and_accepts_success() {
    let (endpoint, received) = spawn_endpoint(StatusCode::OK, json!({ "success": true }))
        .await
        .expect("spawn endpoint");
    let transport =
        HttpSubmissionTransport::new(endpoint, DEFAULT_REQUEST_TIMEOUT).expect("transport");

    let ack = transport.deliver(&request()).await.expect("delivered");
    assert_eq!(ack, SubmissionAck::default());

    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].access_key, "test-access-key");
    assert_eq!(received[0].subject, "Portfolio Contact: Message from Grace");
}

#[tokio::test]
async fn success_false_is_a_rejection() {
    let (endpoint, _) = spawn_endpoint(
        StatusCode::OK,
        json!({ "success": false, "message": "x" }),
    )
    .await
    .expect("spawn endpoint");
    let transport =
        HttpSubmissionTransport::new(endpoint, DEFAULT_REQUEST_TIMEOUT).expect("transport");

    let err = transport.deliver(&request()).await.expect_err("rejected");
    assert_eq!(
        err,
        DeliveryError::Rejected {
            message: "x".to_string()
        }
    );
}

#[tokio::test]
async fn error_status_without_body_is_transport_failure() {
    let (endpoint, _) = spawn_endpoint(StatusCode::BAD_GATEWAY, json!("upstream down"))
        .await
        .expect("spawn endpoint");
    let transport =
        HttpSubmissionTransport::new(endpoint, DEFAULT_REQUEST_TIMEOUT).expect("transport");

    let err = transport.deliver(&request()).await.expect_err("failed");
    assert!(matches!(err, DeliveryError::Transport(reason) if reason.contains("502")));
}

#[tokio::test]
async fn error_status_with_rejection_body_keeps_message() {
    let (endpoint, _) = spawn_endpoint(
        StatusCode::BAD_REQUEST,
        json!({ "success": false, "message": "invalid access key" }),
    )
    .await
    .expect("spawn endpoint");
    let transport =
        HttpSubmissionTransport::new(endpoint, DEFAULT_REQUEST_TIMEOUT).expect("transport");

    let err = transport.deliver(&request()).await.expect_err("rejected");
    assert_eq!(
        err,
        DeliveryError::Rejected {
            message: "invalid access key".to_string()
        }
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let transport =
        HttpSubmissionTransport::new(format!("http://{addr}/submit"), Duration::from_secs(2))
            .expect("transport");
    let err = transport.deliver(&request()).await.expect_err("unreachable");
    assert!(matches!(err, DeliveryError::Transport(_)));
}

#[tokio::test]
async fn simulated_transport_records_requests() {
    let transport = SimulatedTransport::new(SimulatedOutcome::Reject("nope".into()));
    let err = transport.deliver(&request()).await.expect_err("rejected");
    assert_eq!(
        err,
        DeliveryError::Rejected {
            message: "nope".into()
        }
    );

    transport.set_outcome(SimulatedOutcome::Accept);
    transport.deliver(&request()).await.expect("accepted");
    assert_eq!(transport.calls(), 2);
    assert_eq!(transport.requests()[1].name, "Grace");
}
