pub mod backends;
pub mod band;
pub mod bounds;
pub mod file;
pub mod metadata;
pub mod options;
pub mod pixel;
pub mod reader;
pub mod transforms;
pub mod vector;
pub mod writer;

pub use band::{BandGrid, BandRecord, BandSink, BandSource};
pub use bounds::BoundingBox;
pub use file::{File, FileSink, Store};
pub use metadata::{RasterDataset, RasterMetadata};
pub use options::{GdalStoreOptions, ReadOptions, WriteOptions};
pub use pixel::{PixelBuffer, PixelType};
pub use reader::read_raster;
pub use transforms::GeoTransform;
pub use vector::{extract_features, FeatureRecord, FeatureSource, GeometryType, VectorLayer};
pub use writer::write_raster;
