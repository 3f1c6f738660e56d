use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Invalid date '{0}', expected format YYYY-MM-DD")]
    InvalidDate(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to query climate store")]
    Store(#[from] db::Error),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(e) = &self {
            error!("error querying climate store: {}", e);
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
