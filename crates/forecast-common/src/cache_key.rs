//! Cache key naming. The key doubles as the on-disk filename.

use serde::{Deserialize, Serialize};

use crate::params::FetchParameters;
use crate::product::ArtifactKind;

/// Cache key for one artifact of one build.
///
/// Format: `{prefix}_{yyyymmdd}_{run}_{resolution}_{step}.{ext}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(params: &FetchParameters, prefix: &str, kind: ArtifactKind) -> Self {
        Self(format!(
            "{}.{}",
            Self::stem(params, prefix),
            kind.extension()
        ))
    }

    /// Key without the extension, shared by the PNG and JSON of one build.
    pub fn stem(params: &FetchParameters, prefix: &str) -> String {
        format!(
            "{}_{}_{}_{}_{}",
            prefix,
            params.date_code(),
            params.run.code(),
            params.resolution.code(),
            params.forecast_step
        )
    }

    /// Sibling key for another artifact kind of the same build.
    pub fn with_kind(&self, kind: ArtifactKind) -> Self {
        let stem = self
            .0
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.0);
        Self(format!("{}.{}", stem, kind.extension()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{parse_at, ForecastQuery};
    use crate::product::Product;
    use chrono::{TimeZone, Utc};

    fn params(resolution: &str, forecast: &str) -> FetchParameters {
        let query = ForecastQuery {
            date_time: Some("2024-01-15T13:00:00Z".to_string()),
            resolution: Some(resolution.to_string()),
            forecast: Some(forecast.to_string()),
            colors: None,
        };
        parse_at(&query, Product::Wind, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_cache_key_format() {
        let key = CacheKey::new(&params("high", "2"), "wind", ArtifactKind::Png);
        assert_eq!(key.as_str(), "wind_20240115_12_0p25_2.png");
    }

    #[test]
    fn test_cache_key_is_by_value() {
        let a = CacheKey::new(&params("low", "1"), "cloud", ArtifactKind::Json);
        let b = CacheKey::new(&params("low", "1"), "cloud", ArtifactKind::Json);
        assert_eq!(a, b);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_with_kind() {
        let png = CacheKey::new(&params("medium", "3"), "wind", ArtifactKind::Png);
        let json = png.with_kind(ArtifactKind::Json);
        assert_eq!(json.as_str(), "wind_20240115_12_0p50_3.json");
        assert_eq!(json, CacheKey::new(&params("medium", "3"), "wind", ArtifactKind::Json));
    }
}
