//! Time handling for GFS model runs.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Hours between the time a run starts and the time its output is assumed
/// to be published.
pub const PUBLICATION_DELAY_HOURS: i64 = 6;

/// Model run slots (GFS runs 4x daily).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RunSlot {
    /// 00Z run
    Z00,
    /// 06Z run
    Z06,
    /// 12Z run
    Z12,
    /// 18Z run
    Z18,
}

impl RunSlot {
    /// Slot that contains the given hour of day (rounds down to 6 hours).
    pub fn containing_hour(hour: u32) -> Self {
        match hour / 6 {
            0 => RunSlot::Z00,
            1 => RunSlot::Z06,
            2 => RunSlot::Z12,
            _ => RunSlot::Z18,
        }
    }

    pub fn hour(&self) -> u32 {
        match self {
            RunSlot::Z00 => 0,
            RunSlot::Z06 => 6,
            RunSlot::Z12 => 12,
            RunSlot::Z18 => 18,
        }
    }

    /// Two-digit code used in upstream paths and cache filenames.
    pub fn code(&self) -> &'static str {
        match self {
            RunSlot::Z00 => "00",
            RunSlot::Z06 => "06",
            RunSlot::Z12 => "12",
            RunSlot::Z18 => "18",
        }
    }
}

impl std::fmt::Display for RunSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A model run: calendar day plus run slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRun {
    pub date: NaiveDate,
    pub slot: RunSlot,
}

impl ModelRun {
    /// The run whose slot contains `time`.
    pub fn containing(time: DateTime<Utc>) -> Self {
        Self {
            date: time.date_naive(),
            slot: RunSlot::containing_hour(time.hour()),
        }
    }

    /// Most recent run assumed to be published at `now`.
    pub fn latest_published(now: DateTime<Utc>) -> Self {
        Self::containing(now - Duration::hours(PUBLICATION_DELAY_HOURS))
    }

    /// Date formatted as `yyyymmdd`.
    pub fn date_code(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }
}

/// Parse an ISO 8601 timestamp. Naive forms are taken as UTC.
pub fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Some(Utc.from_utc_datetime(&ndt));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}
