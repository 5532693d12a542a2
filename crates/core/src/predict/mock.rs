use crate::domain::forecast::{
    ForecastRecord, ACTUAL_DEMAND_QUANTITY, DEMAND_QUANTITY, PREDICTED_DEMAND_QUANTITY,
};
use crate::error::ForecastError;
use crate::ingest::DemandTable;
use crate::predict::DeltaSource;
use serde_json::{Map, Value};
use std::ops::RangeInclusive;

/// Closed range the mock perturbation is drawn from.
pub const PREDICTION_DELTA: RangeInclusive<i64> = -15..=15;

/// Mock forecast: every row gets `max(0, DemandQuantity + delta)`, and `DemandQuantity` is
/// renamed to `Actual_DemandQuantity` in place. All rows succeed or the whole batch fails.
pub fn generate_mock_prediction(
    table: DemandTable,
    deltas: &dyn DeltaSource,
) -> Result<Vec<ForecastRecord>, ForecastError> {
    let quantity_idx = table
        .column_index(DEMAND_QUANTITY)
        .ok_or(ForecastError::MissingColumn(DEMAND_QUANTITY))?;

    for generated in [ACTUAL_DEMAND_QUANTITY, PREDICTED_DEMAND_QUANTITY] {
        if table.column_index(generated).is_some() {
            return Err(ForecastError::Processing(format!(
                "input column '{generated}' conflicts with a generated column"
            )));
        }
    }

    let mut out = Vec::with_capacity(table.records.len());
    for record in table.records {
        let raw = record.fields.get(quantity_idx).map(String::as_str).unwrap_or("");
        let actual = parse_quantity(raw).ok_or_else(|| {
            ForecastError::Processing(format!(
                "invalid {DEMAND_QUANTITY} value '{raw}' on line {}",
                record.line
            ))
        })?;

        let delta = deltas.draw(PREDICTION_DELTA);
        let predicted = actual.saturating_add(delta).max(0);

        let mut fields = Map::with_capacity(table.columns.len() + 1);
        for (idx, (column, value)) in table.columns.iter().zip(record.fields).enumerate() {
            if idx == quantity_idx {
                fields.insert(ACTUAL_DEMAND_QUANTITY.to_string(), Value::from(actual));
            } else {
                fields.insert(column.clone(), Value::String(value));
            }
        }
        fields.insert(PREDICTED_DEMAND_QUANTITY.to_string(), Value::from(predicted));

        out.push(ForecastRecord::from_fields(fields));
    }

    Ok(out)
}

// Integers, or decimals with no fractional part ("100.0").
fn parse_quantity(raw: &str) -> Option<i64> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(n) = t.parse::<i64>() {
        return Some(n);
    }

    let f = t.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
