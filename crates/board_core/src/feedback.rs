use std::{future::Future, sync::Arc, time::Duration};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{sleep_until, Instant},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
}

impl Feedback {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FeedbackKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: FeedbackKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            FeedbackKind::Success => "message success",
            FeedbackKind::Error => "message error",
        }
    }
}

/// Holds the single pending auto-hide task for the feedback element.
#[derive(Default)]
pub struct FeedbackTimer {
    state: Arc<Mutex<TimerState>>,
}

#[derive(Default)]
struct TimerState {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl FeedbackTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aborts the pending hide, runs `show`, then schedules `expire` after
    /// `delay`.
    ///
    /// `show` and a firing `expire` both run under the timer lock, and
    /// `expire` only runs while its generation is still current. A timer
    /// that was already running when a newer message arrived therefore
    /// finishes before that message is shown, or not at all.
    pub async fn restart<Show, Expire>(&self, show: Show, delay: Duration, expire: Expire)
    where
        Show: Future<Output = ()>,
        Expire: Future<Output = ()> + Send + 'static,
    {
        let mut state = self.state.lock().await;
        if let Some(previous) = state.pending.take() {
            previous.abort();
        }
        state.generation += 1;
        let generation = state.generation;

        show.await;

        let deadline = Instant::now() + delay;
        let shared = Arc::clone(&self.state);
        state.pending = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            let mut state = shared.lock().await;
            if state.generation != generation {
                return;
            }
            expire.await;
            state.pending = None;
        }));
    }

    pub async fn cancel(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        if let Some(previous) = state.pending.take() {
            previous.abort();
        }
    }
}
