use serde_json::json;
use std::fmt::Display;

use anyhow::Error as anyhowError;
use axum::{http::StatusCode, response::IntoResponse};

use crate::membership::MembershipError;

#[derive(Debug)]
pub enum AppError {
    // 400 bad request
    BadRequest(anyhowError),
    // 401 unauthorized
    Unauthorized(anyhowError),
    // 403 forbidden
    Forbidden(anyhowError),
    // 404 not found
    NotFound(anyhowError),
    // 500 internal server error
    InternalServerError(anyhowError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::BadRequest(e) => write!(f, "BadRequest: {}", e),
            AppError::Unauthorized(e) => write!(f, "Unauthorized: {}", e),
            AppError::Forbidden(e) => write!(f, "Forbidden: {}", e),
            AppError::NotFound(e) => write!(f, "NotFound: {}", e),
            AppError::InternalServerError(e) => write!(f, "InternalServerError: {}", e),
        }
    }
}

impl From<anyhowError> for AppError {
    fn from(e: anyhowError) -> Self {
        AppError::InternalServerError(e)
    }
}

impl From<MembershipError> for AppError {
    fn from(e: MembershipError) -> Self {
        match e {
            MembershipError::NotFound => AppError::NotFound(anyhow::anyhow!("Group not found")),
            MembershipError::NoAccess => {
                AppError::Forbidden(anyhow::anyhow!("No access to this action"))
            }
            MembershipError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                AppError::InternalServerError(anyhow::anyhow!("Storage failure: {}", e))
            }
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        #[cfg(debug_assertions)]
        let error_response = {
            let error_message = match &self {
                Self::BadRequest(err)
                | Self::Unauthorized(err)
                | Self::Forbidden(err)
                | Self::NotFound(err)
                | Self::InternalServerError(err) => err.to_string(),
            };
            json!({
                "error": {
                    "message": error_message,
                    "type": format!("{:?}", self),
                }
            })
        };

        #[cfg(not(debug_assertions))]
        let error_response = json!({
            "error": {
                "message": status.canonical_reason().unwrap_or("An error occurred"),
            }
        });
        (status, axum::Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
