use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use caixinha_core::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::Account(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
                CoreError::NotFound(_) => StatusCode::NOT_FOUND,
                CoreError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                CoreError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                CoreError::Persistence(_) | CoreError::Unexpected(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the user. Server-side failures are logged and
    /// replaced by a generic text.
    pub fn public_message(&self) -> String {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
            self.to_string()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.public_message(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(msg) => ApiError::Internal(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
