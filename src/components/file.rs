use std::{fmt::Debug, path::Path};

use crate::{
    components::{
        band::{BandSink, BandSource},
        transforms::GeoTransform,
        PixelType,
    },
    errors::Result,
};

/// An opened raster dataset.
pub trait File: Debug {
    type Band<'a>: BandSource
    where
        Self: 'a;

    /// `(cols, rows)`
    fn size(&self) -> (usize, usize);
    fn num_bands(&self) -> usize;
    /// `Err` when the dataset carries no georeferencing.
    fn transform(&self) -> Result<GeoTransform>;
    fn crs(&self) -> String;
    /// 1-based, like the store.
    fn band(&self, index: usize) -> Result<Self::Band<'_>>;
}

/// A freshly created raster dataset.
pub trait FileSink {
    type Band<'a>: BandSink
    where
        Self: 'a;

    fn set_transform(&mut self, transform: &GeoTransform) -> Result<()>;
    fn set_crs(&mut self, wkt: &str) -> Result<()>;
    /// 1-based, like the store.
    fn band(&mut self, index: usize) -> Result<Self::Band<'_>>;
}

/// Creates (or overwrites) raster datasets.
pub trait Store {
    type Sink<'a>: FileSink
    where
        Self: 'a;

    fn create(
        &mut self,
        path: &Path,
        size: (usize, usize),
        num_bands: usize,
        pixel_type: PixelType,
    ) -> Result<Self::Sink<'_>>;
}
