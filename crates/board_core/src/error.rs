use shared::error::DirectoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("request to activity directory failed: {0}")]
    Transport(String),
    #[error("unreadable response from activity directory: {0}")]
    Decode(String),
    #[error("activity directory rejected request with status {status}")]
    Application { status: u16, detail: Option<String> },
    #[error("invalid activity directory url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BoardError {
    /// Transport-class failures get the generic try-again message; only
    /// application rejections carry text worth showing.
    pub fn is_application(&self) -> bool {
        matches!(self, BoardError::Application { .. })
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            BoardError::Application { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for BoardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BoardError::Decode(e.to_string())
        } else {
            BoardError::Transport(e.to_string())
        }
    }
}

impl From<DirectoryError> for BoardError {
    fn from(e: DirectoryError) -> Self {
        BoardError::Decode(e.to_string())
    }
}
