use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::inference::InferenceError;

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing 'amount' or 'category'")]
    MissingField,

    #[error("{0}")]
    MalformedBody(String),

    #[error("could not convert amount to a number: {0}")]
    InvalidAmount(String),

    #[error("category must be a string, got {0}")]
    InvalidCategory(String),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("failed to render prompt: {0}")]
    Prompt(#[from] serde_json::Error),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::Inference(InferenceError::Upstream { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if self.is_internal_failure() {
            error!("request failed: {self}");
        }
        HttpResponse::build(status).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

impl AppError {
    // Upstream rejections are already logged by the inference client.
    fn is_internal_failure(&self) -> bool {
        !matches!(self, AppError::Inference(InferenceError::Upstream { .. }))
            && self.status_code().is_server_error()
    }
}

/// Renders body extraction failures in the same `{"error": ...}` shape as handler errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::MalformedBody(err.to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::MalformedBody(err.to_string()).into()
}
