use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    api::ActivityDirectoryApi,
    error::BoardError,
    feedback::{Feedback, FeedbackTimer},
    render::{render, RemoveControl, LOAD_FAILED_NOTICE},
    surface::BoardSurface,
};

const SIGNUP_REJECTED_FALLBACK: &str = "An error occurred";
const SIGNUP_TRANSPORT_FAILURE: &str = "Failed to sign up. Please try again.";
const UNREGISTER_REJECTED_FALLBACK: &str = "Failed to unregister";
const UNREGISTER_TRANSPORT_FAILURE: &str = "Failed to unregister. Please try again.";
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub signup_feedback: Duration,
    pub unregister_feedback: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            signup_feedback: Duration::from_secs(5),
            unregister_feedback: Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    Refreshed { ticket: u64, activities: usize },
    RefreshFailed { ticket: u64, reason: String },
    StaleRefreshDiscarded { ticket: u64 },
    FeedbackShown(Feedback),
    FeedbackHidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { activities: usize },
    Failed,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded,
    Rejected,
    TransportFailed,
    /// A required field was empty; nothing was sent.
    Blocked,
}

pub struct ActivityBoard {
    api: Arc<dyn ActivityDirectoryApi>,
    surface: Arc<dyn BoardSurface>,
    config: BoardConfig,
    timer: FeedbackTimer,
    issued: AtomicU64,
    applied: Mutex<u64>,
    events: broadcast::Sender<BoardEvent>,
}

impl ActivityBoard {
    pub fn new(
        api: Arc<dyn ActivityDirectoryApi>,
        surface: Arc<dyn BoardSurface>,
        config: BoardConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            api,
            surface,
            config,
            timer: FeedbackTimer::new(),
            issued: AtomicU64::new(0),
            applied: Mutex::new(0),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub async fn mount(&self) -> RefreshOutcome {
        debug!("mounting activity board");
        self.surface.show_loading().await;
        self.refresh().await
    }

    /// Cancels the pending auto-hide and invalidates every refresh still in
    /// flight.
    pub async fn unmount(&self) {
        self.timer.cancel().await;
        let mut applied = self.applied.lock().await;
        *applied = (*applied).max(self.issued.load(Ordering::SeqCst));
        debug!(ticket = *applied, "activity board unmounted");
    }

    /// Fetches the whole directory and re-renders from it. A completion whose
    /// ticket is older than the last applied one is dropped.
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.fetch_activities().await;

        let mut applied = self.applied.lock().await;
        if ticket <= *applied {
            debug!(ticket, applied = *applied, "discarding stale refresh");
            let _ = self.events.send(BoardEvent::StaleRefreshDiscarded { ticket });
            return RefreshOutcome::Stale;
        }
        *applied = ticket;

        match result {
            Ok(directory) => {
                let board = render(&directory);
                let activities = board.cards.len();
                self.surface.render_board(board).await;
                info!(ticket, activities, "activity board refreshed");
                let _ = self
                    .events
                    .send(BoardEvent::Refreshed { ticket, activities });
                RefreshOutcome::Applied { activities }
            }
            Err(err) => {
                error!(ticket, error = %err, "error fetching activities");
                self.surface.show_load_failure(LOAD_FAILED_NOTICE).await;
                let _ = self.events.send(BoardEvent::RefreshFailed {
                    ticket,
                    reason: err.to_string(),
                });
                RefreshOutcome::Failed
            }
        }
    }

    /// Submits whatever the signup form currently holds.
    pub async fn submit_form(&self) -> ActionOutcome {
        let form = self.surface.form().await;
        self.submit_signup(&form.activity, &form.email).await
    }

    pub async fn submit_signup(&self, activity: &str, email: &str) -> ActionOutcome {
        if activity.trim().is_empty() || email.trim().is_empty() {
            warn!(activity, email, "signup blocked: required field is empty");
            return ActionOutcome::Blocked;
        }
        let email = email.trim();

        match self.api.signup(activity, email).await {
            Ok(resp) => {
                info!(activity, email, "signup accepted");
                self.present(Feedback::success(resp.message), self.config.signup_feedback)
                    .await;
                self.surface.reset_form().await;
                self.refresh().await;
                ActionOutcome::Succeeded
            }
            Err(err) => {
                let outcome = report_failure(&err, "signing up", activity, email);
                let feedback =
                    failure_feedback(&err, SIGNUP_REJECTED_FALLBACK, SIGNUP_TRANSPORT_FAILURE);
                self.present(feedback, self.config.signup_feedback).await;
                outcome
            }
        }
    }

    /// Removes a participant. There is no confirmation step.
    pub async fn submit_unregister(&self, activity: &str, email: &str) -> ActionOutcome {
        match self.api.unregister(activity, email).await {
            Ok(resp) => {
                info!(activity, email, "unregister accepted");
                self.present(
                    Feedback::success(resp.message),
                    self.config.unregister_feedback,
                )
                .await;
                self.refresh().await;
                ActionOutcome::Succeeded
            }
            Err(err) => {
                let outcome = report_failure(&err, "unregistering", activity, email);
                let feedback = failure_feedback(
                    &err,
                    UNREGISTER_REJECTED_FALLBACK,
                    UNREGISTER_TRANSPORT_FAILURE,
                );
                self.present(feedback, self.config.unregister_feedback)
                    .await;
                outcome
            }
        }
    }

    /// Activation of a participant's removal control.
    pub async fn activate(&self, control: &RemoveControl) -> ActionOutcome {
        self.submit_unregister(&control.activity, &control.email)
            .await
    }

    async fn present(&self, feedback: Feedback, delay: Duration) {
        let hide_surface = Arc::clone(&self.surface);
        let events = self.events.clone();
        let shown = feedback.clone();

        self.timer
            .restart(
                async {
                    self.surface.show_feedback(feedback).await;
                    let _ = self.events.send(BoardEvent::FeedbackShown(shown));
                },
                delay,
                async move {
                    hide_surface.hide_feedback().await;
                    let _ = events.send(BoardEvent::FeedbackHidden);
                },
            )
            .await;
    }
}

fn failure_feedback(err: &BoardError, rejected_fallback: &str, transport_text: &str) -> Feedback {
    if err.is_application() {
        Feedback::error(err.detail().unwrap_or(rejected_fallback))
    } else {
        Feedback::error(transport_text)
    }
}

fn report_failure(err: &BoardError, action: &str, activity: &str, email: &str) -> ActionOutcome {
    if err.is_application() {
        warn!(activity, email, error = %err, detail = ?err.detail(), "{action} rejected");
        ActionOutcome::Rejected
    } else {
        error!(activity, email, error = %err, "error {action}");
        ActionOutcome::TransportFailed
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
