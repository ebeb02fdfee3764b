use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ReadOptions {
    /// Also produce world-coordinate pixel center grids.
    pub compute_centers: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct WriteOptions {
    /// Ask the store to recompute band statistics after writing.
    pub compute_statistics: bool,
}

/// How the GDAL store creates datasets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GdalStoreOptions {
    pub driver: String,
    /// `KEY=VALUE` creation options handed to the driver.
    pub creation_options: Vec<String>,
}

impl Default for GdalStoreOptions {
    fn default() -> Self {
        Self {
            driver: "GTiff".into(),
            creation_options: Vec::new(),
        }
    }
}
