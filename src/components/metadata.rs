use serde::{Deserialize, Serialize};

use crate::{
    components::{band::BandRecord, transforms::GeoTransform, PixelType},
    errors::{MarshalError, Result},
};

/// Dataset-level record shared by all bands.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RasterMetadata {
    pub geo_transform: GeoTransform,
    pub pixel_type: PixelType,
    /// Reference system WKT, passed through untouched.
    pub projection: String,
    pub cols: usize,
    pub rows: usize,
    pub band_count: usize,
}

impl RasterMetadata {
    /// Checks the record describes `bands` before anything is written.
    pub fn validate(&self, bands: &[BandRecord]) -> Result<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(MarshalError::MalformedMetadata(format!(
                "raster size {}x{} is empty",
                self.cols, self.rows
            )));
        }
        if self.band_count == 0 || self.band_count != bands.len() {
            return Err(MarshalError::MalformedMetadata(format!(
                "band count {} does not match {} band records",
                self.band_count,
                bands.len()
            )));
        }
        if self.geo_transform.pixel_width() == 0. {
            return Err(MarshalError::MalformedMetadata(
                "geotransform has a zero pixel width".into(),
            ));
        }
        for (index, band) in (1..).zip(bands) {
            if band.data.dim() != (self.rows, self.cols) {
                return Err(MarshalError::MalformedMetadata(format!(
                    "band {index} is {:?}, expected ({}, {})",
                    band.data.dim(),
                    self.rows,
                    self.cols
                )));
            }
        }
        Ok(())
    }
}

/// Result of reading a whole raster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RasterDataset {
    pub bands: Vec<BandRecord>,
    pub metadata: RasterMetadata,
}
