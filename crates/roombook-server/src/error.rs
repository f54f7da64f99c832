use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roombook_types::ErrorBody;
use tracing::error;

use crate::store::StoreError;

/// Every way a request can fail. Rendered as `{ "message": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("Unknown room code: {0}")]
    UnknownRoom(String),
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnknownRoom(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidBody { status, .. } => *status,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
