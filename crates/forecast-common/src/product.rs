//! Products, artifact kinds and GRIB variable selectors.

use serde::{Deserialize, Serialize};

/// GRIB parameter short names requested from the GFS filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variable {
    WindU,
    WindV,
    Precipitation,
    CloudCover,
    SnowPercentage,
}

impl Variable {
    pub fn code(&self) -> &'static str {
        match self {
            Variable::WindU => "UGRD",
            Variable::WindV => "VGRD",
            Variable::Precipitation => "APCP",
            Variable::CloudCover => "TCDC",
            Variable::SnowPercentage => "CPOFP",
        }
    }
}

/// Vertical levels, named by their filter query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    AboveGround10m,
    EntireAtmosphere,
    ConvectiveCloudLayer,
    Surface,
}

impl Level {
    pub fn query_param(&self) -> &'static str {
        match self {
            Level::AboveGround10m => "lev_10_m_above_ground",
            Level::EntireAtmosphere => {
                "lev_entire_atmosphere_%5C%28considered_as_a_single_layer%5C%29"
            }
            Level::ConvectiveCloudLayer => "lev_convective_cloud_layer",
            Level::Surface => "lev_surface",
        }
    }
}

/// One variable at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableSelector {
    pub variable: Variable,
    pub level: Level,
}

impl VariableSelector {
    pub const fn new(variable: Variable, level: Level) -> Self {
        Self { variable, level }
    }
}

const WIND_VARIABLES: &[VariableSelector] = &[
    VariableSelector::new(Variable::WindU, Level::AboveGround10m),
    VariableSelector::new(Variable::WindV, Level::AboveGround10m),
];

const CLOUD_VARIABLES: &[VariableSelector] = &[
    VariableSelector::new(Variable::CloudCover, Level::ConvectiveCloudLayer),
    VariableSelector::new(Variable::Precipitation, Level::Surface),
    VariableSelector::new(Variable::SnowPercentage, Level::Surface),
];

/// The closed set of products served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    Wind,
    Cloud,
    ColorRamp,
}

impl Product {
    /// Resolve a product from its URL id. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "wind" => Some(Product::Wind),
            "cloud" => Some(Product::Cloud),
            "colorramp" => Some(Product::ColorRamp),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Product::Wind => "wind",
            Product::Cloud => "cloud",
            Product::ColorRamp => "colorramp",
        }
    }

    /// Filename prefix for cached artifacts.
    pub fn prefix(&self) -> &'static str {
        self.id()
    }

    /// Upstream variables that make up this product, in channel order.
    pub fn variables(&self) -> &'static [VariableSelector] {
        match self {
            Product::Wind => WIND_VARIABLES,
            Product::Cloud => CLOUD_VARIABLES,
            Product::ColorRamp => &[],
        }
    }

    pub fn all() -> &'static [Product] {
        &[Product::Wind, Product::Cloud, Product::ColorRamp]
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// The two artifact kinds produced per build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    Png,
    Json,
}

impl ArtifactKind {
    /// Accepts `png`, `.png`, `json`, `.json`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.') {
            "png" => Some(ArtifactKind::Png),
            "json" => Some(ArtifactKind::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Png => "png",
            ArtifactKind::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ArtifactKind::Png => "image/png",
            ArtifactKind::Json => "application/json",
        }
    }

    pub fn all() -> &'static [ArtifactKind] {
        &[ArtifactKind::Png, ArtifactKind::Json]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_ids_roundtrip() {
        for product in Product::all() {
            assert_eq!(Product::from_id(product.id()), Some(*product));
        }
        assert_eq!(Product::from_id("temperature"), None);
        assert_eq!(Product::from_id("Wind"), None);
    }

    #[test]
    fn test_product_variables() {
        let wind: Vec<_> = Product::Wind.variables().iter().map(|s| s.variable.code()).collect();
        assert_eq!(wind, vec!["UGRD", "VGRD"]);

        let cloud: Vec<_> = Product::Cloud.variables().iter().map(|s| s.variable.code()).collect();
        assert_eq!(cloud, vec!["TCDC", "APCP", "CPOFP"]);

        assert!(Product::ColorRamp.variables().is_empty());
    }

    #[test]
    fn test_artifact_kind_from_extension() {
        assert_eq!(ArtifactKind::from_extension(".png"), Some(ArtifactKind::Png));
        assert_eq!(ArtifactKind::from_extension("json"), Some(ArtifactKind::Json));
        assert_eq!(ArtifactKind::from_extension(".webp"), None);
        assert_eq!(ArtifactKind::Json.mime_type(), "application/json");
    }
}
