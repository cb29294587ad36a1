//! API Errors
//!
//! Every failure that reaches a route ends up here and is rendered as
//! `{"error": ..., "details"?: ...}` with a status that tells client
//! mistakes (4xx) apart from server problems (5xx).

use crate::guidance::{AnswerError, ModelError};
use crate::llm::LlmError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// JSON error body
#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
            details: None,
        }
    }

    pub fn with_details(error: &str, details: &str) -> Self {
        Self {
            error: error.to_string(),
            details: Some(details.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Model or label encoder not loaded on server. Check server logs.")]
    ModelsUnavailable,

    #[error(transparent)]
    InvalidAnswers(#[from] AnswerError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Language model request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ApiError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        ApiError::Internal(err.to_string())
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::ModelsUnavailable | ApiError::InvalidAnswers(_) => ErrorBody::new(&self.to_string()),
            ApiError::BadRequest(details) => ErrorBody::with_details("Bad request", details),
            ApiError::NotFound => ErrorBody::new("Not found"),
            ApiError::Template(e) => ErrorBody::with_details("Failed to render page", &e.to_string()),
            ApiError::Llm(e) => ErrorBody::with_details("Language model request failed", &e.to_string()),
            ApiError::Internal(details) => ErrorBody::with_details("Internal server error", details),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidAnswers(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::ModelsUnavailable
            | ApiError::Template(_)
            | ApiError::Llm(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}
