use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use board::RemoteError;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(&'static str),

    #[error("Viewport has no area")]
    DegenerateViewport,

    #[error("Click is outside the tree")]
    OutsideTree,

    #[error("Missing or invalid x-user-id header")]
    Unidentified,

    #[error("User has not joined this tree")]
    NotMember,

    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) | AppError::DegenerateViewport => StatusCode::BAD_REQUEST,
            AppError::OutsideTree => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unidentified => StatusCode::UNAUTHORIZED,
            AppError::NotMember => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Remote(error) => match error.status() {
                // Upstream 4xx pass through.
                Some(status) if status.is_client_error() => status,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            warn!("{self}");
        }

        (status, self.to_string()).into_response()
    }
}
