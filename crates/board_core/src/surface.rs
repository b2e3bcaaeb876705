//! Render target the board writes into. [`PageState`] is the in-memory page
//! used by the command-line front end and the tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    feedback::Feedback,
    render::{page_html, ActivityCard, RenderedBoard, SelectOption},
};

#[async_trait]
pub trait BoardSurface: Send + Sync {
    async fn show_loading(&self);
    /// Replaces the list area and the select options in one step.
    async fn render_board(&self, board: RenderedBoard);
    /// Replaces the list area only; the select keeps its options.
    async fn show_load_failure(&self, notice: &str);
    async fn show_feedback(&self, feedback: Feedback);
    async fn hide_feedback(&self);
    async fn form(&self) -> FormState;
    async fn reset_form(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListArea {
    Loading,
    Cards(Vec<ActivityCard>),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub email: String,
    pub activity: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub list: ListArea,
    pub options: Vec<SelectOption>,
    pub form: FormState,
    pub feedback: Option<Feedback>,
    pub feedback_visible: bool,
}

impl Default for PageSnapshot {
    fn default() -> Self {
        Self {
            list: ListArea::Loading,
            options: vec![SelectOption::placeholder()],
            form: FormState::default(),
            feedback: None,
            feedback_visible: false,
        }
    }
}

impl PageSnapshot {
    pub fn cards(&self) -> &[ActivityCard] {
        match &self.list {
            ListArea::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// The feedback currently on screen, if any.
    pub fn visible_feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref().filter(|_| self.feedback_visible)
    }
}

#[derive(Debug, Default)]
pub struct PageState {
    inner: RwLock<PageSnapshot>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> PageSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn html(&self) -> askama::Result<String> {
        page_html(&*self.inner.read().await)
    }

    pub async fn fill_form(&self, email: impl Into<String>, activity: impl Into<String>) {
        let mut page = self.inner.write().await;
        page.form.email = email.into();
        page.form.activity = activity.into();
    }
}

#[async_trait]
impl BoardSurface for PageState {
    async fn show_loading(&self) {
        self.inner.write().await.list = ListArea::Loading;
    }

    async fn render_board(&self, board: RenderedBoard) {
        let mut page = self.inner.write().await;
        page.list = ListArea::Cards(board.cards);
        page.options = board.options;
    }

    async fn show_load_failure(&self, notice: &str) {
        self.inner.write().await.list = ListArea::Failed(notice.to_string());
    }

    async fn show_feedback(&self, feedback: Feedback) {
        let mut page = self.inner.write().await;
        page.feedback = Some(feedback);
        page.feedback_visible = true;
    }

    async fn hide_feedback(&self) {
        self.inner.write().await.feedback_visible = false;
    }

    async fn form(&self) -> FormState {
        self.inner.read().await.form.clone()
    }

    async fn reset_form(&self) {
        self.inner.write().await.form = FormState::default();
    }
}
