//! Decoded grid fields.

use serde::{Deserialize, Serialize};

use crate::product::VariableSelector;

/// One decoded scalar variable on a global lat/lon grid.
///
/// Values are row-major exactly as decoded: row 0 is 90°N, column 0 is 0°E.
/// The antimeridian shift is applied when sampling, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridField {
    pub selector: VariableSelector,
    /// Number of points along a parallel (Ni)
    pub width: usize,
    /// Number of points along a meridian (Nj)
    pub height: usize,
    pub minimum: f32,
    pub maximum: f32,
    pub values: Vec<f32>,
}

impl GridField {
    /// Value at raw grid position. Out-of-range positions read as `minimum`.
    #[inline]
    pub fn value(&self, column: usize, row: usize) -> f32 {
        self.values
            .get(row * self.width + column)
            .copied()
            .unwrap_or(self.minimum)
    }

    /// Value range, zero for constant fields.
    pub fn range(&self) -> f32 {
        self.maximum - self.minimum
    }

    /// Whether the value array matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.width > 0 && self.height > 1 && self.values.len() == self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Level, Variable};

    #[test]
    fn test_value_lookup() {
        let field = GridField {
            selector: VariableSelector::new(Variable::WindU, Level::AboveGround10m),
            width: 3,
            height: 2,
            minimum: 0.0,
            maximum: 5.0,
            values: vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        };
        assert_eq!(field.value(2, 0), 2.0);
        assert_eq!(field.value(0, 1), 3.0);
        assert_eq!(field.value(7, 7), 0.0);
        assert!(field.is_consistent());
        assert_eq!(field.range(), 5.0);
    }
}
