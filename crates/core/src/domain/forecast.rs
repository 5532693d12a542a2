use serde::Serialize;
use serde_json::{Map, Value};

pub const DEMAND_QUANTITY: &str = "DemandQuantity";
pub const ACTUAL_DEMAND_QUANTITY: &str = "Actual_DemandQuantity";
pub const PREDICTED_DEMAND_QUANTITY: &str = "Predicted_DemandQuantity";

pub const STATUS_SUCCESS: &str = "success";

/// One output row. Keys keep the input column order; extra columns pass through.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ForecastRecord(Map<String, Value>);

impl ForecastRecord {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn actual(&self) -> Option<i64> {
        self.0.get(ACTUAL_DEMAND_QUANTITY).and_then(Value::as_i64)
    }

    pub fn predicted(&self) -> Option<i64> {
        self.0.get(PREDICTED_DEMAND_QUANTITY).and_then(Value::as_i64)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResponse {
    pub status: String,
    pub count: usize,
    pub forecasts: Vec<ForecastRecord>,
}

impl ForecastResponse {
    pub fn success(forecasts: Vec<ForecastRecord>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            count: forecasts.len(),
            forecasts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_counts_forecasts() {
        let record = ForecastRecord::from_fields(
            json!({"Month": "2024-01", "Actual_DemandQuantity": 10, "Predicted_DemandQuantity": 12})
                .as_object()
                .cloned()
                .unwrap(),
        );
        let resp = ForecastResponse::success(vec![record.clone(), record]);
        assert_eq!(resp.status, "success");
        assert_eq!(resp.count, 2);
        assert_eq!(resp.count, resp.forecasts.len());
    }

    #[test]
    fn record_serializes_flat_in_insertion_order() {
        let mut fields = Map::new();
        fields.insert("Month".to_string(), json!("2024-01"));
        fields.insert("Project_ID".to_string(), json!("P1"));
        fields.insert(ACTUAL_DEMAND_QUANTITY.to_string(), json!(100));
        fields.insert(PREDICTED_DEMAND_QUANTITY.to_string(), json!(97));
        let record = ForecastRecord::from_fields(fields);

        assert_eq!(record.actual(), Some(100));
        assert_eq!(record.predicted(), Some(97));
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"Month":"2024-01","Project_ID":"P1","Actual_DemandQuantity":100,"Predicted_DemandQuantity":97}"#
        );
    }

    #[test]
    fn empty_envelope_is_success() {
        let resp = ForecastResponse::success(Vec::new());
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"status": "success", "count": 0, "forecasts": []})
        );
    }
}
