pub mod api;
pub mod board;
pub mod error;
pub mod feedback;
pub mod render;
pub mod surface;

pub use api::{ActivityDirectoryApi, HttpDirectoryClient};
pub use board::{ActionOutcome, ActivityBoard, BoardConfig, BoardEvent, RefreshOutcome};
pub use error::BoardError;
pub use feedback::{Feedback, FeedbackKind};
pub use surface::{BoardSurface, PageSnapshot, PageState};

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod api_tests;
