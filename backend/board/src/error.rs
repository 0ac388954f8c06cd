pub use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Board API unreachable: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid board API URL: {0}")]
    BaseUrl(String),

    #[error("Board API responded {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl RemoteError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RemoteError::Request(error) => error.status(),
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::BaseUrl(_) => None,
        }
    }
}
