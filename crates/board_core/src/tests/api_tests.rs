use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::IntoResponse,
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api::ActivityDirectoryApi, error::BoardError, HttpDirectoryClient};

#[derive(Clone)]
struct MockState {
    seen: Arc<Mutex<Vec<(String, String)>>>,
    status: StatusCode,
    body: &'static str,
}

async fn record(State(state): State<MockState>, request: Request) -> impl IntoResponse {
    let uri = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    state
        .seen
        .lock()
        .await
        .push((request.method().to_string(), uri));
    (state.status, state.body)
}

async fn spawn_mock(
    status: StatusCode,
    body: &'static str,
) -> Result<(String, Arc<Mutex<Vec<(String, String)>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(MockState {
        seen: seen.clone(),
        status,
        body,
    });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("http://{addr}"), seen))
}

async fn mock_client(
    status: StatusCode,
    body: &'static str,
) -> Result<(HttpDirectoryClient, Arc<Mutex<Vec<(String, String)>>>)> {
    let (base_url, seen) = spawn_mock(status, body).await?;
    Ok((HttpDirectoryClient::new(&base_url)?, seen))
}

#[tokio::test]
async fn unregister_sends_encoded_delete() -> Result<()> {
    let (client, seen) = mock_client(StatusCode::OK, r#"{"message":"Unregistered"}"#).await?;

    let resp = client.unregister("Chess Club", "a@x.com").await?;

    assert_eq!(resp.message, "Unregistered");
    assert_eq!(
        seen.lock().await.as_slice(),
        &[(
            "DELETE".to_string(),
            "/activities/Chess%20Club/participants?email=a%40x.com".to_string()
        )]
    );
    Ok(())
}

#[tokio::test]
async fn signup_sends_encoded_post() -> Result<()> {
    let (client, seen) = mock_client(StatusCode::OK, r#"{"message":"Signed up!"}"#).await?;

    let resp = client.signup("Art & Craft", "a+b@x.com").await?;

    assert_eq!(resp.message, "Signed up!");
    assert_eq!(
        seen.lock().await.as_slice(),
        &[(
            "POST".to_string(),
            "/activities/Art%20%26%20Craft/signup?email=a%2Bb%40x.com".to_string()
        )]
    );
    Ok(())
}

#[tokio::test]
async fn rejection_carries_detail() -> Result<()> {
    let (client, _) = mock_client(StatusCode::BAD_REQUEST, r#"{"detail":"Already registered"}"#)
        .await?;

    let err = client
        .signup("Chess Club", "a@x.com")
        .await
        .expect_err("should be rejected");

    assert!(matches!(err, BoardError::Application { status: 400, .. }));
    assert_eq!(err.detail(), Some("Already registered"));
    Ok(())
}

#[tokio::test]
async fn rejection_with_unreadable_body_has_no_detail() -> Result<()> {
    let (client, _) = mock_client(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").await?;

    let err = client
        .unregister("Chess Club", "a@x.com")
        .await
        .expect_err("should be rejected");

    assert!(err.is_application());
    assert_eq!(err.detail(), None);
    Ok(())
}

#[tokio::test]
async fn success_with_garbage_body_is_decode_error() -> Result<()> {
    let (client, _) = mock_client(StatusCode::OK, "not json").await?;

    let err = client
        .signup("Chess Club", "a@x.com")
        .await
        .expect_err("should not parse");

    assert!(matches!(err, BoardError::Decode(_)));
    assert!(!err.is_application());
    Ok(())
}

#[tokio::test]
async fn fetch_reads_directory_in_service_order() -> Result<()> {
    let (client, seen) = mock_client(
        StatusCode::OK,
        r#"{"Zumba":{"description":"Dance","schedule":"Mon","max_participants":5,"participants":["a@x.com"]},
            "Archery":{"description":"Bows","schedule":"Tue","max_participants":8,"participants":null}}"#,
    )
    .await?;

    let directory = client.fetch_activities().await?;

    let names: Vec<_> = directory.names().collect();
    assert_eq!(names, vec!["Zumba", "Archery"]);
    assert_eq!(directory.get("Zumba").map(|a| a.spots_left()), Some(4));
    assert!(directory
        .get("Archery")
        .map(|a| a.participants.is_empty())
        .unwrap_or(false));
    assert_eq!(
        seen.lock().await.as_slice(),
        &[("GET".to_string(), "/activities".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn fetch_rejects_non_object_directory() -> Result<()> {
    let (client, _) = mock_client(StatusCode::OK, "[]").await?;

    let err = client.fetch_activities().await.expect_err("array root");

    assert!(matches!(err, BoardError::Decode(_)));
    Ok(())
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() -> Result<()> {
    let (base_url, seen) = spawn_mock(StatusCode::OK, "{}").await?;
    let client = HttpDirectoryClient::new(&format!("{base_url}/api/"))?;

    let directory = client.fetch_activities().await?;

    assert!(directory.is_empty());
    assert_eq!(
        seen.lock().await.as_slice(),
        &[("GET".to_string(), "/api/activities".to_string())]
    );
    Ok(())
}

#[tokio::test]
async fn unreachable_service_is_transport_error() -> Result<()> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = HttpDirectoryClient::new(&format!("http://{addr}"))?;
    let err = client
        .fetch_activities()
        .await
        .expect_err("nothing listening");

    assert!(matches!(err, BoardError::Transport(_)));
    Ok(())
}
