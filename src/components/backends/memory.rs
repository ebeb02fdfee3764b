//! Datasets held entirely in memory.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use geo::Geometry;

use crate::{
    components::{
        band::{scan_min_max, BandSink, BandSource},
        file::{File, FileSink, Store},
        transforms::GeoTransform,
        vector::{FeatureSource, SourceFeature},
        PixelBuffer, PixelType,
    },
    errors::{MarshalError, Result},
};

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryBand {
    pub pixel_type: PixelType,
    /// Row-major
    pub pixels: Vec<f64>,
    pub no_data_value: Option<f64>,
    /// `(min, max)` as recorded by the last statistics run.
    pub statistics: Option<(f64, f64)>,
    pub block_size: (usize, usize),
}

impl MemoryBand {
    pub fn new(pixel_type: PixelType, pixels: Vec<f64>) -> Self {
        Self {
            pixel_type,
            pixels,
            no_data_value: None,
            statistics: None,
            block_size: (0, 0),
        }
    }

    pub fn with_no_data_value(mut self, no_data_value: f64) -> Self {
        self.no_data_value = Some(no_data_value);
        self
    }

    pub fn with_statistics(mut self, min: f64, max: f64) -> Self {
        self.statistics = Some((min, max));
        self
    }
}

impl BandSource for &MemoryBand {
    fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    fn block_size(&self) -> (usize, usize) {
        self.block_size
    }

    fn reported_min_max(&self) -> (Option<f64>, Option<f64>) {
        self.statistics.unzip()
    }

    fn no_data_value(&self) -> Option<f64> {
        self.no_data_value
    }

    fn read_f64(&self, _cols: usize, _rows: usize) -> Result<Vec<f64>> {
        Ok(self.pixels.clone())
    }
}

impl BandSink for &mut MemoryBand {
    fn set_no_data_value(&mut self, no_data_value: f64) -> Result<()> {
        self.no_data_value = Some(no_data_value);
        Ok(())
    }

    fn write(&mut self, buffer: PixelBuffer) -> Result<()> {
        self.pixel_type = buffer.pixel_type();
        self.pixels = buffer.to_f64().into_vec();
        Ok(())
    }

    fn compute_statistics(&mut self) -> Result<()> {
        let (min, max) = scan_min_max(self.pixels.iter().copied(), self.no_data_value);
        if min.is_nan() {
            return Err(MarshalError::Store("band has no valid pixels".into()));
        }
        self.statistics = Some((min, max));
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRaster {
    /// `(cols, rows)`
    pub size: (usize, usize),
    pub transform: Option<GeoTransform>,
    pub crs: String,
    pub bands: Vec<MemoryBand>,
}

impl MemoryRaster {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            size: (cols, rows),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: GeoTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = crs.into();
        self
    }

    pub fn with_band(mut self, band: MemoryBand) -> Self {
        self.bands.push(band);
        self
    }
}

fn band_index(index: usize, num_bands: usize) -> Result<usize> {
    (1..=num_bands)
        .contains(&index)
        .then(|| index - 1)
        .ok_or_else(|| MarshalError::BandRead {
            band: index,
            reason: format!("dataset has {num_bands} bands"),
        })
}

impl File for MemoryRaster {
    type Band<'a> = &'a MemoryBand where Self: 'a;

    fn size(&self) -> (usize, usize) {
        self.size
    }

    fn num_bands(&self) -> usize {
        self.bands.len()
    }

    fn transform(&self) -> Result<GeoTransform> {
        self.transform
            .ok_or_else(|| MarshalError::Store("dataset is not georeferenced".into()))
    }

    fn crs(&self) -> String {
        self.crs.clone()
    }

    fn band(&self, index: usize) -> Result<&MemoryBand> {
        Ok(&self.bands[band_index(index, self.bands.len())?])
    }
}

impl FileSink for &mut MemoryRaster {
    type Band<'a> = &'a mut MemoryBand where Self: 'a;

    fn set_transform(&mut self, transform: &GeoTransform) -> Result<()> {
        self.transform = Some(*transform);
        Ok(())
    }

    fn set_crs(&mut self, wkt: &str) -> Result<()> {
        self.crs = wkt.to_string();
        Ok(())
    }

    fn band(&mut self, index: usize) -> Result<&mut MemoryBand> {
        let index = band_index(index, self.bands.len())?;
        Ok(&mut self.bands[index])
    }
}

/// Rasters keyed by the path they were created at.
#[derive(Debug, Default)]
pub struct MemoryStore {
    datasets: HashMap<PathBuf, MemoryRaster>,
}

impl MemoryStore {
    pub fn get(&self, path: &Path) -> Option<&MemoryRaster> {
        self.datasets.get(path)
    }

    pub fn remove(&mut self, path: &Path) -> Option<MemoryRaster> {
        self.datasets.remove(path)
    }
}

impl Store for MemoryStore {
    type Sink<'a> = &'a mut MemoryRaster where Self: 'a;

    fn create(
        &mut self,
        path: &Path,
        (cols, rows): (usize, usize),
        num_bands: usize,
        pixel_type: PixelType,
    ) -> Result<&mut MemoryRaster> {
        let mut raster = MemoryRaster::new(cols, rows);
        raster.bands = vec![MemoryBand::new(pixel_type, vec![0.; cols * rows]); num_bands];
        let slot = self.datasets.entry(path.to_path_buf()).or_default();
        *slot = raster;
        Ok(slot)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFeature {
    pub fid: Option<u64>,
    pub geometry: Option<Geometry<f64>>,
}

/// Simple-feature layer; `Err` entries stand for records that fail to decode.
#[derive(Debug, Clone, Default)]
pub struct MemoryLayer {
    features: Vec<std::result::Result<MemoryFeature, String>>,
}

impl MemoryLayer {
    pub fn with_feature(mut self, geometry: impl Into<Geometry<f64>>) -> Self {
        let fid = Some(self.features.len() as u64);
        self.features.push(Ok(MemoryFeature {
            fid,
            geometry: Some(geometry.into()),
        }));
        self
    }

    pub fn with_empty_feature(mut self) -> Self {
        let fid = Some(self.features.len() as u64);
        self.features.push(Ok(MemoryFeature {
            fid,
            geometry: None,
        }));
        self
    }

    pub fn with_corrupt_feature(mut self, reason: impl Into<String>) -> Self {
        self.features.push(Err(reason.into()));
        self
    }
}

impl FeatureSource for MemoryLayer {
    type Geometry = Geometry<f64>;

    fn feature_count(&mut self) -> u64 {
        self.features.len() as u64
    }

    fn features(&mut self) -> impl Iterator<Item = Result<SourceFeature<Geometry<f64>>>> + '_ {
        self.features.iter().enumerate().map(|(index, feature)| match feature {
            Ok(MemoryFeature { fid, geometry }) => Ok(SourceFeature {
                fid: *fid,
                geometry: geometry.clone(),
            }),
            Err(reason) => Err(MarshalError::FeatureRead {
                index,
                reason: reason.clone(),
            }),
        })
    }
}
