use geo::Coord;
use ndarray::{Array2, ShapeBuilder};
use serde::{Deserialize, Serialize};
use shrinkwraprs::Shrinkwrap;

use crate::components::bounds::BoundingBox;

/// Affine map from pixel `(col, row)` to world coordinates, in GDAL
/// coefficient order `[origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height]`.
#[derive(Shrinkwrap, Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    /// Origin at `(0, 0)`, unit pixels, no rotation.
    pub const IDENTITY: GeoTransform = GeoTransform([0., 1., 0., 0., 0., 1.]);

    pub fn new(coefficients: [f64; 6]) -> Self {
        Self(coefficients)
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    pub fn origin_x(&self) -> f64 {
        self.0[0]
    }

    pub fn pixel_width(&self) -> f64 {
        self.0[1]
    }

    pub fn origin_y(&self) -> f64 {
        self.0[3]
    }

    pub fn pixel_height(&self) -> f64 {
        self.0[5]
    }

    /// Extent of a `cols x rows` raster.
    ///
    /// Assumes a north-up raster: with a positive pixel height the
    /// min/max labels of the y axis come out swapped.
    pub fn bounds(&self, cols: usize, rows: usize) -> BoundingBox {
        let min_x = self.origin_x();
        let max_y = self.origin_y();
        BoundingBox {
            min_x,
            min_y: max_y + self.pixel_height() * rows as f64,
            max_x: min_x + self.pixel_width() * cols as f64,
            max_y,
        }
    }

    /// Center of pixel `(row, col)`, ignoring rotation.
    pub fn pixel_center(&self, row: usize, col: usize) -> Coord<f64> {
        let (width, height) = (self.pixel_width(), self.pixel_height());
        Coord {
            x: self.origin_x() + col as f64 * width + width / 2.,
            y: self.origin_y() + row as f64 * height + height / 2.,
        }
    }

    /// `(center_x, center_y)` grids for a `rows x cols` raster, column-major
    /// like the band data.
    pub fn pixel_centers(&self, rows: usize, cols: usize) -> (Array2<f64>, Array2<f64>) {
        let center_x = Array2::from_shape_fn((rows, cols).f(), |(row, col)| {
            self.pixel_center(row, col).x
        });
        let center_y = Array2::from_shape_fn((rows, cols).f(), |(row, col)| {
            self.pixel_center(row, col).y
        });
        (center_x, center_y)
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(value: [f64; 6]) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn north_up() -> GeoTransform {
        GeoTransform::new([100., 10., 0., 500., 0., -10.])
    }

    #[test]
    fn bounds_of_north_up_raster() {
        let bbox = north_up().bounds(5, 5);
        assert_eq!(bbox.to_grid(), array![[100., 450.], [150., 500.]]);
    }

    #[test]
    fn bounds_keep_swapped_labels_for_south_up() {
        let bbox = GeoTransform::new([0., 1., 0., 0., 0., 2.]).bounds(3, 4);
        assert_eq!(bbox.min_y, 8.);
        assert_eq!(bbox.max_y, 0.);
    }

    #[test]
    fn first_pixel_center() {
        assert_eq!(north_up().pixel_center(0, 0), Coord { x: 105., y: 495. });
    }

    #[test]
    fn center_grids_follow_data_addressing() {
        let (center_x, center_y) = north_up().pixel_centers(2, 3);
        assert_eq!(center_x, array![[105., 115., 125.], [105., 115., 125.]]);
        assert_eq!(center_y, array![[495., 495., 495.], [485., 485., 485.]]);
        assert!(center_x.t().is_standard_layout());
    }

    #[test]
    fn identity_is_default() {
        assert_eq!(GeoTransform::default().coefficients(), [0., 1., 0., 0., 0., 1.]);
    }
}
