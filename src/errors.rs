use std::path::PathBuf;

use crate::components::PixelType;

pub type Result<T> = std::result::Result<T, MarshalError>;

#[derive(thiserror::Error, Debug)]
pub enum MarshalError {
    #[error("could not open {}: {reason}", path.display())]
    SourceUnavailable { path: PathBuf, reason: String },
    #[error("failed to read band {band}: {reason}")]
    BandRead { band: usize, reason: String },
    #[error("failed to read feature {index}: {reason}")]
    FeatureRead { index: usize, reason: String },
    #[error("band {band} can not be written as {pixel_type:?}")]
    UnsupportedPixelType { band: usize, pixel_type: PixelType },
    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),
    #[error("store rejected the write: {0}")]
    Store(String),
    #[error(transparent)]
    NdarrayError(#[from] ndarray::ShapeError),
    #[cfg(feature = "gdal")]
    #[error(transparent)]
    GdalError(#[from] gdal::errors::GdalError),
}

impl MarshalError {
    /// Status reported to the host alongside an empty payload. `0` means success.
    pub fn status_code(&self) -> i32 {
        match self {
            MarshalError::SourceUnavailable { .. } => -1,
            MarshalError::BandRead { .. }
            | MarshalError::FeatureRead { .. }
            | MarshalError::NdarrayError(_) => -2,
            MarshalError::UnsupportedPixelType { .. } => -3,
            MarshalError::MalformedMetadata(_) => -4,
            MarshalError::Store(_) => -5,
            #[cfg(feature = "gdal")]
            MarshalError::GdalError(_) => -5,
        }
    }
}
