pub mod memory;

/// Implementations for gdal
#[cfg(feature = "gdal")]
pub mod gdal_backend {
    use std::{
        path::{Path, PathBuf},
        sync::Once,
    };

    use gdal::{
        cpl::CslStringList,
        raster::{Buffer as GdalBuffer, GdalType, RasterBand},
        vector::{Layer, LayerAccess},
        Dataset as GdalDataset, DriverManager, Metadata as GdalMetadata,
    };
    use geo::Geometry;
    use log::{debug, warn};

    use crate::{
        buffer::Buffer,
        components::{
            band::{BandSink, BandSource},
            extract_features,
            file::{File, FileSink, Store},
            options::{GdalStoreOptions, ReadOptions, WriteOptions},
            read_raster,
            vector::{FeatureSource, SourceFeature},
            write_raster, BandRecord, GeoTransform, PixelBuffer, PixelType, RasterDataset,
            RasterMetadata, VectorLayer,
        },
        errors::{MarshalError, Result},
    };

    static REGISTER: Once = Once::new();

    /// Registers every GDAL driver once per process. Safe to call repeatedly.
    pub fn register_drivers() {
        REGISTER.call_once(|| {
            DriverManager::register_all();
            debug!("registered {} gdal drivers", DriverManager::count());
        });
    }

    #[derive(Debug)]
    pub struct GdalFile {
        path: PathBuf,
        dataset: GdalDataset,
    }

    impl GdalFile {
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            register_drivers();
            let path = path.as_ref().to_path_buf();
            let dataset =
                GdalDataset::open(&path).map_err(|err| MarshalError::SourceUnavailable {
                    path: path.clone(),
                    reason: err.to_string(),
                })?;
            Ok(GdalFile { path, dataset })
        }
    }

    fn band_error(index: usize, err: gdal::errors::GdalError) -> MarshalError {
        MarshalError::BandRead {
            band: index,
            reason: err.to_string(),
        }
    }

    impl File for GdalFile {
        type Band<'a> = RasterBand<'a>;

        fn size(&self) -> (usize, usize) {
            self.dataset.raster_size()
        }
        fn num_bands(&self) -> usize {
            self.dataset.raster_count()
        }
        fn transform(&self) -> Result<GeoTransform> {
            Ok(GeoTransform::new(self.dataset.geo_transform()?))
        }
        fn crs(&self) -> String {
            self.dataset.projection()
        }
        fn band(&self, index: usize) -> Result<RasterBand<'_>> {
            self.dataset
                .rasterband(index)
                .map_err(|err| band_error(index, err))
        }
    }

    fn statistics_item(band: &RasterBand, key: &str) -> Option<f64> {
        band.metadata_item(key, "")
            .and_then(|value| value.trim().parse().ok())
    }

    impl BandSource for RasterBand<'_> {
        fn pixel_type(&self) -> PixelType {
            PixelType::from_gdal_ordinal(self.band_type() as u32)
        }

        fn block_size(&self) -> (usize, usize) {
            RasterBand::block_size(self)
        }

        fn reported_min_max(&self) -> (Option<f64>, Option<f64>) {
            (
                statistics_item(self, "STATISTICS_MINIMUM"),
                statistics_item(self, "STATISTICS_MAXIMUM"),
            )
        }

        fn no_data_value(&self) -> Option<f64> {
            RasterBand::no_data_value(self)
        }

        fn read_f64(&self, cols: usize, rows: usize) -> Result<Vec<f64>> {
            let buffer = self.read_as::<f64>((0, 0), (cols, rows), (cols, rows), None)?;
            Ok(buffer.data().to_vec())
        }
    }

    fn write_buffer<T: GdalType + Copy>(band: &mut RasterBand, buffer: Buffer<T>) -> Result<()> {
        let [rows, cols] = buffer.shape();
        let mut buffer = GdalBuffer::new((cols, rows), buffer.into_vec());
        Ok(band.write((0, 0), (cols, rows), &mut buffer)?)
    }

    impl BandSink for RasterBand<'_> {
        fn set_no_data_value(&mut self, no_data_value: f64) -> Result<()> {
            Ok(RasterBand::set_no_data_value(self, Some(no_data_value))?)
        }

        fn write(&mut self, buffer: PixelBuffer) -> Result<()> {
            match buffer {
                PixelBuffer::UInt8(buffer) => write_buffer(self, buffer),
                // i8 is only a GdalType when built against GDAL >= 3.7
                PixelBuffer::Int8(_) => Err(MarshalError::UnsupportedPixelType {
                    band: 1,
                    pixel_type: PixelType::Int8,
                }),
                PixelBuffer::UInt16(buffer) => write_buffer(self, buffer),
                PixelBuffer::Int16(buffer) => write_buffer(self, buffer),
                PixelBuffer::UInt32(buffer) => write_buffer(self, buffer),
                PixelBuffer::Int32(buffer) => write_buffer(self, buffer),
                PixelBuffer::Float32(buffer) => write_buffer(self, buffer),
                PixelBuffer::Float64(buffer) => write_buffer(self, buffer),
            }
        }

        fn compute_statistics(&mut self) -> Result<()> {
            match self.get_statistics(true, false)? {
                Some(statistics) => {
                    debug!("statistics: {} to {}", statistics.min, statistics.max);
                    Ok(())
                }
                None => Err(MarshalError::Store("no statistics produced".into())),
            }
        }
    }

    impl FileSink for GdalFile {
        type Band<'a> = RasterBand<'a>;

        fn set_transform(&mut self, transform: &GeoTransform) -> Result<()> {
            Ok(self.dataset.set_geo_transform(&transform.coefficients())?)
        }
        fn set_crs(&mut self, wkt: &str) -> Result<()> {
            Ok(self.dataset.set_projection(wkt)?)
        }
        fn band(&mut self, index: usize) -> Result<RasterBand<'_>> {
            Ok(self.dataset.rasterband(index)?)
        }
    }

    /// Creates datasets on disk (or under `/vsimem/`) through a GDAL driver.
    #[derive(Debug, Clone, Default)]
    pub struct GdalStore {
        options: GdalStoreOptions,
    }

    impl GdalStore {
        pub fn new(options: GdalStoreOptions) -> Self {
            Self { options }
        }
    }

    impl Store for GdalStore {
        type Sink<'a> = GdalFile;

        fn create(
            &mut self,
            path: &Path,
            (cols, rows): (usize, usize),
            num_bands: usize,
            pixel_type: PixelType,
        ) -> Result<GdalFile> {
            register_drivers();
            let driver = DriverManager::get_driver_by_name(&self.options.driver)?;
            let mut options = CslStringList::new();
            for option in &self.options.creation_options {
                options.add_string(option)?;
            }

            macro_rules! create {
                ($t:ty) => {
                    driver.create_with_band_type_with_options::<$t, _>(
                        path, cols, rows, num_bands, &options,
                    )?
                };
            }
            let dataset = match pixel_type {
                PixelType::UInt8 => create!(u8),
                PixelType::UInt16 => create!(u16),
                PixelType::Int16 => create!(i16),
                PixelType::UInt32 => create!(u32),
                PixelType::Int32 => create!(i32),
                PixelType::Float32 => create!(f32),
                PixelType::Float64 => create!(f64),
                other => {
                    return Err(MarshalError::UnsupportedPixelType {
                        band: 1,
                        pixel_type: other,
                    })
                }
            };
            debug!("created {} with {}", path.display(), self.options.driver);
            Ok(GdalFile {
                path: path.to_path_buf(),
                dataset,
            })
        }
    }

    /// Simple-feature layer backed by an OGR layer.
    pub struct GdalLayer<'a> {
        layer: Layer<'a>,
    }

    impl<'a> GdalLayer<'a> {
        pub fn new(layer: Layer<'a>) -> Self {
            Self { layer }
        }
    }

    impl FeatureSource for GdalLayer<'_> {
        type Geometry = Geometry<f64>;

        fn feature_count(&mut self) -> u64 {
            self.layer.feature_count()
        }

        fn features(&mut self) -> impl Iterator<Item = Result<SourceFeature<Geometry<f64>>>> + '_ {
            self.layer.reset_feature_reading();
            self.layer.features().enumerate().map(|(index, feature)| {
                let geometry = feature.geometry().and_then(|geometry| match geometry.to_geo() {
                    Ok(geometry) => Some(geometry),
                    Err(err) => {
                        warn!("feature {index}: undecodable geometry: {err}");
                        None
                    }
                });
                Ok(SourceFeature {
                    fid: feature.fid(),
                    geometry,
                })
            })
        }
    }

    /// Reads every band of the raster at `path`.
    pub fn read_raster_file<P: AsRef<Path>>(
        path: P,
        options: &ReadOptions,
    ) -> Result<RasterDataset> {
        read_raster(&GdalFile::open(path)?, options)
    }

    /// Writes `bands` as a new raster at `path`, replacing any existing one.
    pub fn write_raster_file<P: AsRef<Path>>(
        path: P,
        bands: &[BandRecord],
        metadata: &RasterMetadata,
        options: &WriteOptions,
        store_options: &GdalStoreOptions,
    ) -> Result<()> {
        let mut store = GdalStore::new(store_options.clone());
        write_raster(&mut store, path.as_ref(), bands, metadata, options)
    }

    /// Extracts every feature of the first layer of the vector dataset at `path`.
    pub fn read_vector_file<P: AsRef<Path>>(path: P) -> Result<VectorLayer> {
        let file = GdalFile::open(path)?;
        let layer = file
            .dataset
            .layer(0)
            .map_err(|err| MarshalError::SourceUnavailable {
                path: file.path.clone(),
                reason: err.to_string(),
            })?;
        extract_features(&mut GdalLayer::new(layer))
    }

}
