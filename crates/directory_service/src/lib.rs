//! In-memory Activity Directory Service. Rosters live only as long as the
//! process.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use shared::{
    domain::{Activity, ActivityDirectory},
    error::ErrorResponse,
    protocol::{EmailQuery, MessageResponse},
};
use tokio::sync::RwLock;
use tracing::info;

pub mod config;

#[derive(Clone, Default)]
pub struct DirectoryState {
    activities: Arc<RwLock<ActivityDirectory>>,
}

impl DirectoryState {
    pub fn new(directory: ActivityDirectory) -> Self {
        Self {
            activities: Arc::new(RwLock::new(directory)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_directory())
    }

    pub async fn snapshot(&self) -> ActivityDirectory {
        self.activities.read().await.clone()
    }
}

pub fn seed_directory() -> ActivityDirectory {
    ActivityDirectory::new(vec![
        Activity::new(
            "Chess Club",
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
            vec![
                "michael@mergington.edu".into(),
                "daniel@mergington.edu".into(),
            ],
        ),
        Activity::new(
            "Programming Class",
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
            vec![
                "emma@mergington.edu".into(),
                "sophia@mergington.edu".into(),
            ],
        ),
        Activity::new(
            "Gym Class",
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
            vec![
                "john@mergington.edu".into(),
                "olivia@mergington.edu".into(),
            ],
        ),
    ])
}

pub fn build_router(state: DirectoryState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/activities", get(list_activities))
        .route("/activities/:activity/signup", post(signup))
        .route("/activities/:activity/participants", delete(unregister))
        .with_state(state)
}

pub struct DirectoryFailure {
    status: StatusCode,
    detail: String,
}

impl DirectoryFailure {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn activity_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Activity not found")
    }
}

impl IntoResponse for DirectoryFailure {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.detail))).into_response()
    }
}

impl From<QueryRejection> for DirectoryFailure {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

async fn list_activities(State(state): State<DirectoryState>) -> Json<ActivityDirectory> {
    Json(state.snapshot().await)
}

async fn signup(
    State(state): State<DirectoryState>,
    Path(activity): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, DirectoryFailure> {
    let Query(EmailQuery { email }) = query?;
    let mut directory = state.activities.write().await;
    let entry = directory
        .get_mut(&activity)
        .ok_or_else(DirectoryFailure::activity_not_found)?;

    if entry.has_participant(&email) {
        return Err(DirectoryFailure::new(
            StatusCode::BAD_REQUEST,
            "Student is already signed up",
        ));
    }
    if entry.is_full() {
        return Err(DirectoryFailure::new(
            StatusCode::BAD_REQUEST,
            "Activity is full",
        ));
    }

    entry.participants.push(email.clone());
    info!(activity = %activity, email = %email, "participant signed up");
    Ok(Json(MessageResponse::new(format!(
        "Signed up {email} for {activity}"
    ))))
}

async fn unregister(
    State(state): State<DirectoryState>,
    Path(activity): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, DirectoryFailure> {
    let Query(EmailQuery { email }) = query?;
    let mut directory = state.activities.write().await;
    let entry = directory
        .get_mut(&activity)
        .ok_or_else(DirectoryFailure::activity_not_found)?;

    let Some(position) = entry.participants.iter().position(|p| *p == email) else {
        return Err(DirectoryFailure::new(
            StatusCode::NOT_FOUND,
            "Student is not signed up for this activity",
        ));
    };

    entry.participants.remove(position);
    info!(activity = %activity, email = %email, "participant unregistered");
    Ok(Json(MessageResponse::new(format!(
        "Unregistered {email} from {activity}"
    ))))
}

#[cfg(test)]
#[path = "tests/routes_tests.rs"]
mod tests;
