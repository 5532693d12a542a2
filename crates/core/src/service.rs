use crate::domain::forecast::ForecastResponse;
use crate::error::ForecastError;
use crate::ingest::{decode_utf8, parse_demand_csv, UploadedFile};
use crate::predict::{generate_mock_prediction, DeltaSource};

/// Runs one upload through decode, parse, and the mock forecast. Stateless; nothing is retained.
pub fn predict_demand(
    upload: &UploadedFile,
    deltas: &dyn DeltaSource,
) -> Result<ForecastResponse, ForecastError> {
    if !upload.has_csv_extension() {
        return Err(ForecastError::InvalidFileType);
    }

    let text = decode_utf8(&upload.bytes).map_err(ForecastError::processing)?;
    let table = parse_demand_csv(&text).map_err(ForecastError::processing)?;
    let forecasts = generate_mock_prediction(table, deltas)?;

    Ok(ForecastResponse::success(forecasts))
}
