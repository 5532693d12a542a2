use std::sync::Arc;

use anyhow::Context;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use powergrid_core::config::{CorsPolicy, Settings};
use powergrid_core::domain::forecast::ForecastResponse;
use powergrid_core::error::ForecastError;
use powergrid_core::ingest::UploadedFile;
use powergrid_core::predict::DeltaSource;

use crate::error::ApiError;

const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    pub deltas: Arc<dyn DeltaSource>,
}

pub fn router(state: AppState, settings: &Settings) -> anyhow::Result<Router> {
    Ok(Router::new()
        .route("/healthz", get(healthz))
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::max(settings.max_upload_bytes))
        .with_state(state)
        .layer(cors_layer(&settings.cors)?)
        .layer(TraceLayer::new_for_http()))
}

pub fn cors_layer(policy: &CorsPolicy) -> anyhow::Result<CorsLayer> {
    let origin = match policy {
        CorsPolicy::AllowAll => AllowOrigin::any(),
        CorsPolicy::AllowList(origins) => {
            let values = origins
                .iter()
                .map(|o| {
                    HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {o}"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            AllowOrigin::list(values)
        }
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("predict", %request_id);

    async move {
        let upload = read_upload(multipart?).await?;
        let filename = upload.filename.clone();
        let bytes = upload.bytes.len();

        let deltas = state.deltas.clone();
        let response = tokio::task::spawn_blocking(move || {
            powergrid_core::service::predict_demand(&upload, deltas.as_ref())
        })
        .await
        .map_err(|e| ForecastError::Processing(format!("forecast task failed: {e}")))??;

        tracing::info!(%filename, bytes, count = response.count, "forecast generated");
        Ok::<_, ApiError>(Json(response))
    }
    .instrument(span)
    .await
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(UploadedFile::new(filename, bytes.to_vec()));
    }

    Err(ApiError::MissingUpload(format!(
        "Field '{UPLOAD_FIELD}' is required."
    )))
}
