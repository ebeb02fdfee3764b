use geo::Coord;
use ndarray::{array, Array2};
use serde::{Deserialize, Serialize};

/// World-coordinate extent of a band.
///
/// Labels are taken from the geotransform as-is and are not normalised,
/// so `min_y > max_y` for rasters with a positive pixel height.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn min(&self) -> Coord<f64> {
        Coord {
            x: self.min_x,
            y: self.min_y,
        }
    }

    pub fn max(&self) -> Coord<f64> {
        Coord {
            x: self.max_x,
            y: self.max_y,
        }
    }

    /// `[[min_x, min_y], [max_x, max_y]]`
    pub fn to_grid(&self) -> Array2<f64> {
        array![[self.min_x, self.min_y], [self.max_x, self.max_y]]
    }

    pub fn from_grid(grid: &Array2<f64>) -> Option<Self> {
        (grid.dim() == (2, 2)).then(|| Self {
            min_x: grid[[0, 0]],
            min_y: grid[[0, 1]],
            max_x: grid[[1, 0]],
            max_y: grid[[1, 1]],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_layout() {
        let bbox = BoundingBox {
            min_x: 1.,
            min_y: 2.,
            max_x: 3.,
            max_y: 4.,
        };
        let grid = bbox.to_grid();
        assert_eq!(grid, array![[1., 2.], [3., 4.]]);
        assert_eq!(BoundingBox::from_grid(&grid), Some(bbox));
        assert_eq!(bbox.max() - bbox.min(), Coord { x: 2., y: 2. });
    }

    #[test]
    fn rejects_wrong_shape() {
        assert_eq!(BoundingBox::from_grid(&Array2::zeros((1, 4))), None);
    }
}
