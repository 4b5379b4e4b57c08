//! Request parameter resolution.
//!
//! Queries arrive untyped from the HTTP layer. Resolution never fails: any
//! value that cannot be understood is replaced by its default.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::product::{Product, VariableSelector};
use crate::time::{parse_iso8601, ModelRun, RunSlot};

/// Raw query as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastQuery {
    #[serde(rename = "dateTime", default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub forecast: Option<String>,
    #[serde(default)]
    pub colors: Option<String>,
}

/// Published GFS grid spacings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Resolution {
    /// 1.00 degree
    #[default]
    Low,
    /// 0.50 degree
    Medium,
    /// 0.25 degree
    High,
}

impl Resolution {
    /// Parse `low|medium|high` (any case) or a grid code such as `0p25`.
    pub fn from_query(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" | "1P00" => Some(Resolution::Low),
            "MEDIUM" | "0P50" => Some(Resolution::Medium),
            "HIGH" | "0P25" => Some(Resolution::High),
            _ => None,
        }
    }

    /// Grid code used by the GFS filter and in cache filenames.
    pub fn code(&self) -> &'static str {
        match self {
            Resolution::Low => "1p00",
            Resolution::Medium => "0p50",
            Resolution::High => "0p25",
        }
    }
}

/// Last published GFS forecast step (384 forecast hours).
pub const MAX_FORECAST_STEP: u32 = 128;

/// Fully resolved, immutable parameters for one build.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchParameters {
    pub date: NaiveDate,
    pub run: RunSlot,
    pub resolution: Resolution,
    /// Forecast step in `1..=MAX_FORECAST_STEP`. Each step is three forecast
    /// hours.
    pub forecast_step: u32,
    pub variables: &'static [VariableSelector],
}

impl FetchParameters {
    pub fn model_run(&self) -> ModelRun {
        ModelRun {
            date: self.date,
            slot: self.run,
        }
    }

    pub fn date_code(&self) -> String {
        self.model_run().date_code()
    }

    /// Forecast hour offset requested from upstream.
    pub fn forecast_hour(&self) -> u32 {
        self.forecast_step.saturating_mul(3)
    }
}

/// Resolve `query` for `product` against the current time.
pub fn parse(query: &ForecastQuery, product: Product) -> FetchParameters {
    parse_at(query, product, Utc::now())
}

/// Resolve `query` for `product` as if the current time were `now`.
pub fn parse_at(query: &ForecastQuery, product: Product, now: DateTime<Utc>) -> FetchParameters {
    let run = query
        .date_time
        .as_deref()
        .and_then(parse_iso8601)
        .map(ModelRun::containing)
        .unwrap_or_else(|| ModelRun::latest_published(now));

    let resolution = query
        .resolution
        .as_deref()
        .and_then(Resolution::from_query)
        .unwrap_or_default();

    let forecast_step = query
        .forecast
        .as_deref()
        .and_then(|f| f.trim().parse::<u64>().ok())
        .filter(|step| *step >= 1)
        .map(|step| step.min(u64::from(MAX_FORECAST_STEP)) as u32)
        .unwrap_or(1);

    FetchParameters {
        date: run.date,
        run: run.slot,
        resolution,
        forecast_step,
        variables: product.variables(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 14, 25, 0).unwrap()
    }

    fn query(date_time: Option<&str>, resolution: Option<&str>, forecast: Option<&str>) -> ForecastQuery {
        ForecastQuery {
            date_time: date_time.map(String::from),
            resolution: resolution.map(String::from),
            forecast: forecast.map(String::from),
            colors: None,
        }
    }

    #[test]
    fn test_defaults() {
        let params = parse_at(&ForecastQuery::default(), Product::Wind, now());
        // 14:25 - 6h = 08:25 -> 06Z run
        assert_eq!(params.date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(params.run, RunSlot::Z06);
        assert_eq!(params.resolution, Resolution::Low);
        assert_eq!(params.forecast_step, 1);
        assert_eq!(params.variables.len(), 2);
    }

    #[test]
    fn test_high_resolution_without_date() {
        let params = parse_at(&query(None, Some("HIGH"), None), Product::Wind, now());
        assert_eq!(params.resolution, Resolution::High);
        assert_eq!(params.run, RunSlot::Z06);
        assert_eq!(params.date_code(), "20240310");
    }

    #[test]
    fn test_resolution_is_case_insensitive_and_accepts_codes() {
        let p = parse_at(&query(None, Some("medium"), None), Product::Cloud, now());
        assert_eq!(p.resolution, Resolution::Medium);
        let p = parse_at(&query(None, Some("0p25"), None), Product::Cloud, now());
        assert_eq!(p.resolution, Resolution::High);
        let p = parse_at(&query(None, Some("ultra"), None), Product::Cloud, now());
        assert_eq!(p.resolution, Resolution::Low);
    }

    #[test]
    fn test_explicit_date_time() {
        let p = parse_at(&query(Some("2023-12-31T19:00:00Z"), None, None), Product::Wind, now());
        assert_eq!(p.date_code(), "20231231");
        assert_eq!(p.run, RunSlot::Z18);
    }

    #[test]
    fn test_malformed_date_time_falls_back() {
        let p = parse_at(&query(Some("not-a-date"), None, None), Product::Wind, now());
        let default = parse_at(&ForecastQuery::default(), Product::Wind, now());
        assert_eq!(p, default);
    }

    #[test]
    fn test_forecast_step_is_at_least_one() {
        for raw in ["0", "-4", "abc", "", "4.5"] {
            let p = parse_at(&query(None, None, Some(raw)), Product::Wind, now());
            assert_eq!(p.forecast_step, 1, "forecast={:?}", raw);
        }
        let p = parse_at(&query(None, None, Some("8")), Product::Wind, now());
        assert_eq!(p.forecast_step, 8);
        assert_eq!(p.forecast_hour(), 24);
    }

    #[test]
    fn test_forecast_step_is_capped() {
        for raw in ["129", "2000000000", "18446744073709551615"] {
            let p = parse_at(&query(None, None, Some(raw)), Product::Wind, now());
            assert_eq!(p.forecast_step, MAX_FORECAST_STEP, "forecast={:?}", raw);
            assert_eq!(p.forecast_hour(), 384);
        }
        let p = parse_at(&query(None, None, Some("128")), Product::Wind, now());
        assert_eq!(p.forecast_step, 128);
    }

    #[test]
    fn test_forecast_hour_saturates() {
        let mut p = parse_at(&ForecastQuery::default(), Product::Wind, now());
        p.forecast_step = u32::MAX;
        assert_eq!(p.forecast_hour(), u32::MAX);
    }

    #[test]
    fn test_query_deserializes_camel_case_date_time() {
        let q: ForecastQuery =
            serde_json::from_str(r#"{"dateTime":"2024-01-01","forecast":"3"}"#).unwrap();
        assert_eq!(q.date_time.as_deref(), Some("2024-01-01"));
        assert_eq!(q.forecast.as_deref(), Some("3"));
        assert!(q.resolution.is_none());
    }
}
