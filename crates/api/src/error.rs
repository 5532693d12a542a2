use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use powergrid_core::error::ForecastError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    Forecast(ForecastError),
    /// Request did not carry a usable `file` part.
    MissingUpload(String),
    Upload(MultipartError),
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        Self::Forecast(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Upload(err)
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::MissingUpload(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::Forecast(err) if err.is_client_error() => {
                tracing::warn!(error = %err, "rejected upload");
                (StatusCode::BAD_REQUEST, err.detail())
            }
            ApiError::Forecast(err) => {
                sentry::capture_error(err);
                tracing::error!(error = %err, "forecast failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.detail())
            }
            ApiError::MissingUpload(msg) => {
                tracing::warn!(detail = %msg, "no upload in request");
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            ApiError::Upload(err) => {
                tracing::warn!(error = %err, "failed to read multipart body");
                (err.status(), err.body_text())
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}
