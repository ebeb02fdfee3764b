//! Marshaling between GDAL-style raster/vector stores and plain in-memory records.
//!
//! Rasters come out as one [BandRecord] per band plus [RasterMetadata];
//! vector layers as one [FeatureRecord] per feature. Store access goes
//! through the traits in [components::file] and [components::vector], with
//! GDAL implementations behind the `gdal` feature.

pub mod buffer;
pub mod components;
pub mod errors;

pub use components::{
    extract_features, read_raster, write_raster, BandGrid, BandRecord, BoundingBox,
    FeatureRecord, GeoTransform, GeometryType, PixelType, RasterDataset, RasterMetadata,
    ReadOptions, VectorLayer, WriteOptions,
};
#[cfg(feature = "gdal")]
pub use components::backends::gdal_backend::{read_raster_file, read_vector_file, write_raster_file};
pub use errors::{MarshalError, Result};
