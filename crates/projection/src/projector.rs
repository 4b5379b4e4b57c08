//! Output-raster to source-grid mapping.

use forecast_common::GridField;

use crate::latitude::{LatitudeResampling, RowSample};
use crate::longitude::source_column;

/// Maps output raster pixels onto a decoded grid.
///
/// Output rasters are `width` x `height - 1`: the last source row (the south
/// pole) is not emitted.
#[derive(Debug, Clone)]
pub struct GridProjector {
    width: usize,
    source_height: usize,
    rows: Vec<RowSample>,
}

impl GridProjector {
    pub fn new(width: usize, source_height: usize, resampling: LatitudeResampling) -> Self {
        let output_height = source_height.saturating_sub(1);
        Self {
            width,
            source_height,
            rows: resampling.samples(output_height, source_height),
        }
    }

    /// Projector sized for `field`.
    pub fn for_field(field: &GridField, resampling: LatitudeResampling) -> Self {
        Self::new(field.width, field.height, resampling)
    }

    pub fn output_width(&self) -> usize {
        self.width
    }

    pub fn output_height(&self) -> usize {
        self.rows.len()
    }

    pub fn source_height(&self) -> usize {
        self.source_height
    }

    /// Raw column read for output column `x`.
    #[inline]
    pub fn source_column(&self, x: usize) -> usize {
        source_column(x, self.width)
    }

    /// Source rows blended for output row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> RowSample {
        self.rows
            .get(y)
            .copied()
            .unwrap_or_else(|| RowSample::exact(self.source_height.saturating_sub(1)))
    }

    /// Value of `field` at output pixel (x, y).
    #[inline]
    pub fn sample(&self, field: &GridField, x: usize, y: usize) -> f32 {
        let column = self.source_column(x);
        let row = self.row(y);
        row.blend(field.value(column, row.lower), field.value(column, row.upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_common::{Level, Variable, VariableSelector};

    fn field(width: usize, height: usize) -> GridField {
        // value encodes position: row * 1000 + col
        let values = (0..height)
            .flat_map(|row| (0..width).map(move |col| (row * 1000 + col) as f32))
            .collect();
        GridField {
            selector: VariableSelector::new(Variable::CloudCover, Level::ConvectiveCloudLayer),
            width,
            height,
            minimum: 0.0,
            maximum: ((height - 1) * 1000 + width - 1) as f32,
            values,
        }
    }

    #[test]
    fn test_output_dimensions() {
        let f = field(8, 5);
        let projector = GridProjector::for_field(&f, LatitudeResampling::Identity);
        assert_eq!(projector.output_width(), 8);
        assert_eq!(projector.output_height(), 4);
    }

    #[test]
    fn test_identity_sample_is_shifted_by_half_width() {
        let f = field(8, 5);
        let projector = GridProjector::for_field(&f, LatitudeResampling::Identity);
        assert_eq!(projector.sample(&f, 0, 0), 4.0);
        assert_eq!(projector.sample(&f, 4, 2), 2000.0);
        assert_eq!(projector.sample(&f, 7, 3), 3003.0);
    }

    #[test]
    fn test_wrap_column_for_any_row() {
        let f = field(10, 7);
        let projector = GridProjector::for_field(&f, LatitudeResampling::Mercator);
        for y in 0..projector.output_height() {
            assert_eq!(projector.source_column(0), projector.source_column(10));
            assert_eq!(projector.sample(&f, 0, y), projector.sample(&f, 10, y));
        }
    }
}
