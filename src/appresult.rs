use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::res::Envelope;

pub type AppResult<T> = Result<T, AppError>;

/// Handler failure. The client only ever sees `message`; the cause goes to the log.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    cause: Option<anyhow::Error>,
}

impl AppError {
    pub fn internal<E>(message: &'static str, cause: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
            cause: Some(cause.into()),
        }
    }

    pub fn not_found(message: &'static str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message,
            cause: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(cause) = &self.cause {
            error!("{}: {cause:#}", self.message);
        }

        (self.status, Json(Envelope::<()>::message(self.message))).into_response()
    }
}
