use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    components::{bounds::BoundingBox, PixelBuffer, PixelType},
    errors::Result,
};

/// Band pixels in one of the encodings a host hands over.
///
/// `Float64` is also the generic numeric grid.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BandGrid {
    UInt8(Array2<u8>),
    Int16(Array2<i16>),
    Float64(Array2<f64>),
}

impl BandGrid {
    /// `(rows, cols)`
    pub fn dim(&self) -> (usize, usize) {
        match self {
            BandGrid::UInt8(array) => array.dim(),
            BandGrid::Int16(array) => array.dim(),
            BandGrid::Float64(array) => array.dim(),
        }
    }

    pub fn as_f64(&self) -> Option<&Array2<f64>> {
        match self {
            BandGrid::Float64(array) => Some(array),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> Array2<f64> {
        match self {
            BandGrid::UInt8(array) => array.mapv(f64::from),
            BandGrid::Int16(array) => array.mapv(f64::from),
            BandGrid::Float64(array) => array.clone(),
        }
    }
}

impl From<Array2<u8>> for BandGrid {
    fn from(value: Array2<u8>) -> Self {
        BandGrid::UInt8(value)
    }
}

impl From<Array2<i16>> for BandGrid {
    fn from(value: Array2<i16>) -> Self {
        BandGrid::Int16(value)
    }
}

impl From<Array2<f64>> for BandGrid {
    fn from(value: Array2<f64>) -> Self {
        BandGrid::Float64(value)
    }
}

/// One band as handed to the host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BandRecord {
    pub data: BandGrid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_x: Option<Array2<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_y: Option<Array2<f64>>,
    /// `[[min_x, min_y], [max_x, max_y]]`
    pub bbox: Array2<f64>,
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_data_value: Option<f64>,
}

impl BandRecord {
    /// Record for host-built pixels, with extrema taken from the grid.
    pub fn new(data: impl Into<BandGrid>, bbox: BoundingBox) -> Self {
        let data = data.into();
        let (min, max) = scan_min_max(data.to_f64().iter().copied(), None);
        Self {
            data,
            center_x: None,
            center_y: None,
            bbox: bbox.to_grid(),
            min,
            max,
            no_data_value: None,
        }
    }

    pub fn with_no_data_value(mut self, no_data_value: f64) -> Self {
        self.no_data_value = Some(no_data_value);
        self
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_grid(&self.bbox)
    }
}

/// Extrema of `values`, skipping NaN and `no_data_value`. NaN for both
/// when nothing is left.
pub fn scan_min_max(values: impl Iterator<Item = f64>, no_data_value: Option<f64>) -> (f64, f64) {
    use itertools::{Itertools, MinMaxResult};

    match values
        .filter(|value| !value.is_nan() && Some(*value) != no_data_value)
        .minmax_by(f64::total_cmp)
    {
        MinMaxResult::NoElements => (f64::NAN, f64::NAN),
        MinMaxResult::OneElement(value) => (value, value),
        MinMaxResult::MinMax(min, max) => (min, max),
    }
}

/// Read side of one band of an open raster.
pub trait BandSource {
    fn pixel_type(&self) -> PixelType;
    /// `(x, y)` natural block size.
    fn block_size(&self) -> (usize, usize);
    /// Minimum and maximum as recorded by the store, if any.
    fn reported_min_max(&self) -> (Option<f64>, Option<f64>);
    fn no_data_value(&self) -> Option<f64>;
    /// Whole band as `f64`, row-major.
    fn read_f64(&self, cols: usize, rows: usize) -> Result<Vec<f64>>;
}

/// Write side of one band of a freshly created raster.
pub trait BandSink {
    fn set_no_data_value(&mut self, no_data_value: f64) -> Result<()>;
    fn write(&mut self, buffer: PixelBuffer) -> Result<()>;
    fn compute_statistics(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn scan_skips_nan_and_no_data() {
        let values = [3., f64::NAN, -9999., 7., 1.];
        assert_eq!(scan_min_max(values.into_iter(), Some(-9999.)), (1., 7.));
        assert_eq!(scan_min_max(values.into_iter(), None), (-9999., 7.));
    }

    #[test]
    fn scan_of_empty_band_is_nan() {
        let (min, max) = scan_min_max([-1., -1.].into_iter(), Some(-1.));
        assert!(min.is_nan() && max.is_nan());
    }

    #[test]
    fn host_built_record() {
        let bbox = BoundingBox {
            min_x: 0.,
            min_y: -2.,
            max_x: 2.,
            max_y: 0.,
        };
        let record = BandRecord::new(array![[4i16, -2], [9, 0]], bbox).with_no_data_value(0.);
        assert_eq!(record.data.dim(), (2, 2));
        assert_eq!((record.min, record.max), (-2., 9.));
        assert_eq!(record.bounding_box(), Some(bbox));
        assert_eq!(record.no_data_value, Some(0.));
        assert!(record.data.as_f64().is_none());
        assert_eq!(record.data.to_f64()[[1, 0]], 9.);
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let bbox = BoundingBox {
            min_x: 0.,
            min_y: 0.,
            max_x: 1.,
            max_y: 1.,
        };
        let record = BandRecord::new(array![[1.]], bbox);
        let json = serde_json::to_value(&record).unwrap();
        let fields = json.as_object().unwrap();
        assert!(!fields.contains_key("no_data_value"));
        assert!(!fields.contains_key("center_x"));
        assert!(!fields.contains_key("center_y"));
        assert_eq!(fields["min"], 1.);

        let record = record.with_no_data_value(-1.);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["no_data_value"], -1.);
        assert_eq!(serde_json::from_value::<BandRecord>(json).unwrap(), record);
    }
}
