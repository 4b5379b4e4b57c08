//! Decoded GRIB message parsing.
//!
//! The decoder prints `{"messages": [[{"key": k, "value": v}, ...], ...]}`.
//! Only the first message is used. Its records are folded into a map, later
//! records overriding earlier ones with the same key.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use forecast_common::{ForecastError, ForecastResult, GridField, VariableSelector};

#[derive(Debug, Deserialize)]
struct DecodedDocument {
    messages: Vec<Vec<KeyValue>>,
}

#[derive(Debug, Deserialize)]
struct KeyValue {
    key: String,
    #[serde(default)]
    value: Value,
}

/// Parse decoder stdout into a [`GridField`] for `selector`.
pub fn parse_grid_field(output: &[u8], selector: VariableSelector) -> ForecastResult<GridField> {
    let document: DecodedDocument = serde_json::from_slice(output)
        .map_err(|e| ForecastError::Decode(format!("malformed decoder output: {}", e)))?;

    let first = document
        .messages
        .into_iter()
        .next()
        .ok_or_else(|| ForecastError::Decode("decoder output holds no messages".to_string()))?;

    let record: HashMap<String, Value> = first.into_iter().map(|kv| (kv.key, kv.value)).collect();

    let width = dimension(&record, "Ni")?;
    let height = dimension(&record, "Nj")?;
    let minimum = number(&record, "minimum")? as f32;
    let maximum = number(&record, "maximum")? as f32;
    let values = values(&record)?;

    let field = GridField {
        selector,
        width,
        height,
        minimum,
        maximum,
        values,
    };

    if !field.is_consistent() {
        return Err(ForecastError::Decode(format!(
            "{} grid declares {}x{} but holds {} values",
            selector.variable.code(),
            width,
            height,
            field.values.len()
        )));
    }

    Ok(field)
}

fn require<'a>(record: &'a HashMap<String, Value>, key: &str) -> ForecastResult<&'a Value> {
    record
        .get(key)
        .ok_or_else(|| ForecastError::MissingGridKey(key.to_string()))
}

fn number(record: &HashMap<String, Value>, key: &str) -> ForecastResult<f64> {
    require(record, key)?
        .as_f64()
        .ok_or_else(|| ForecastError::Decode(format!("'{}' is not a number", key)))
}

fn dimension(record: &HashMap<String, Value>, key: &str) -> ForecastResult<usize> {
    require(record, key)?
        .as_u64()
        .map(|n| n as usize)
        .ok_or_else(|| ForecastError::Decode(format!("'{}' is not a grid dimension", key)))
}

/// Non-numeric entries (missing points) become NaN.
fn values(record: &HashMap<String, Value>) -> ForecastResult<Vec<f32>> {
    let array = require(record, "values")?
        .as_array()
        .ok_or_else(|| ForecastError::Decode("'values' is not an array".to_string()))?;

    Ok(array
        .iter()
        .map(|v| v.as_f64().map(|n| n as f32).unwrap_or(f32::NAN))
        .collect())
}
