use log::{debug, info, warn};

use crate::{
    buffer::Buffer,
    components::{
        band::{scan_min_max, BandGrid, BandRecord, BandSource},
        file::File,
        metadata::{RasterDataset, RasterMetadata},
        options::ReadOptions,
        transforms::GeoTransform,
        PixelType,
    },
    errors::{MarshalError, Result},
};

/// Pulls every band of `file` into records.
///
/// Either all bands are read or the call fails; no partial dataset is returned.
pub fn read_raster<F: File>(file: &F, options: &ReadOptions) -> Result<RasterDataset> {
    let (cols, rows) = file.size();
    let band_count = file.num_bands();
    if band_count == 0 {
        return Err(MarshalError::BandRead {
            band: 0,
            reason: "dataset has no raster bands".into(),
        });
    }

    let geo_transform = file.transform().unwrap_or_else(|err| {
        warn!("no geotransform ({err}), falling back to identity");
        GeoTransform::IDENTITY
    });

    let mut pixel_type = PixelType::Unknown;
    let mut bands = Vec::with_capacity(band_count);
    for index in 1..=band_count {
        let band = file.band(index)?;
        if index == 1 {
            pixel_type = band.pixel_type();
        }
        bands.push(read_band(&band, index, &geo_transform, (cols, rows), options)?);
    }

    let metadata = RasterMetadata {
        geo_transform,
        pixel_type,
        projection: file.crs(),
        cols,
        rows,
        band_count,
    };
    info!("read {band_count} bands of {cols}x{rows} {pixel_type:?}");
    Ok(RasterDataset { bands, metadata })
}

fn read_band<B: BandSource>(
    band: &B,
    index: usize,
    geo_transform: &GeoTransform,
    (cols, rows): (usize, usize),
    options: &ReadOptions,
) -> Result<BandRecord> {
    debug!("band {index}: block size {:?}", band.block_size());

    let data = band
        .read_f64(cols, rows)
        .and_then(|raw| Buffer::new(raw, [rows, cols]))
        .and_then(Buffer::into_grid)
        .map_err(|err| MarshalError::BandRead {
            band: index,
            reason: err.to_string(),
        })?;

    let (center_x, center_y) = if options.compute_centers {
        let (center_x, center_y) = geo_transform.pixel_centers(rows, cols);
        (Some(center_x), Some(center_y))
    } else {
        (None, None)
    };

    let no_data_value = band.no_data_value();
    let (min, max) = match band.reported_min_max() {
        (Some(min), Some(max)) => (min, max),
        _ => scan_min_max(data.iter().copied(), no_data_value),
    };

    Ok(BandRecord {
        data: BandGrid::Float64(data),
        center_x,
        center_y,
        bbox: geo_transform.bounds(cols, rows).to_grid(),
        min,
        max,
        no_data_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::backends::memory::{MemoryBand, MemoryRaster};
    use ndarray::array;
    use rstest::{fixture, rstest};

    #[fixture]
    fn raster() -> MemoryRaster {
        MemoryRaster::new(3, 2)
            .with_transform(GeoTransform::new([100., 10., 0., 500., 0., -10.]))
            .with_crs("LOCAL_CS[\"grid\"]")
            .with_band(MemoryBand::new(PixelType::Int16, vec![1., 2., 3., 4., 5., 6.]))
            .with_band(
                MemoryBand::new(PixelType::Int16, vec![-9999., 8., 9., 10., 11., -9999.])
                    .with_no_data_value(-9999.),
            )
    }

    #[rstest]
    fn reads_bands_in_order(raster: MemoryRaster) {
        let dataset = read_raster(&raster, &ReadOptions::default()).unwrap();
        assert_eq!(dataset.bands.len(), 2);
        assert_eq!(dataset.metadata.band_count, 2);
        assert_eq!((dataset.metadata.cols, dataset.metadata.rows), (3, 2));
        assert_eq!(dataset.metadata.pixel_type, PixelType::Int16);
        assert_eq!(dataset.metadata.projection, "LOCAL_CS[\"grid\"]");

        let data = dataset.bands[0].data.as_f64().unwrap();
        assert_eq!(data, &array![[1., 2., 3.], [4., 5., 6.]]);
        assert!(data.t().is_standard_layout());
    }

    #[rstest]
    fn bbox_and_no_data(raster: MemoryRaster) {
        let dataset = read_raster(&raster, &ReadOptions::default()).unwrap();
        let first = &dataset.bands[0];
        assert_eq!(first.bbox, array![[100., 480.], [130., 500.]]);
        assert_eq!(first.no_data_value, None);
        assert_eq!(dataset.bands[1].no_data_value, Some(-9999.));
    }

    #[rstest]
    fn extrema_fall_back_to_scan(raster: MemoryRaster) {
        let dataset = read_raster(&raster, &ReadOptions::default()).unwrap();
        assert_eq!((dataset.bands[0].min, dataset.bands[0].max), (1., 6.));
        assert_eq!((dataset.bands[1].min, dataset.bands[1].max), (8., 11.));
    }

    #[rstest]
    fn extrema_prefer_reported_values(raster: MemoryRaster) {
        let raster = raster.with_band(
            MemoryBand::new(PixelType::Int16, vec![0.; 6]).with_statistics(-50., 50.),
        );
        let dataset = read_raster(&raster, &ReadOptions::default()).unwrap();
        assert_eq!((dataset.bands[2].min, dataset.bands[2].max), (-50., 50.));
    }

    #[rstest]
    fn centers_only_when_requested(raster: MemoryRaster) {
        let dataset = read_raster(&raster, &ReadOptions::default()).unwrap();
        assert!(dataset.bands[0].center_x.is_none());
        assert!(dataset.bands[0].center_y.is_none());

        let options = ReadOptions {
            compute_centers: true,
        };
        let dataset = read_raster(&raster, &options).unwrap();
        let band = &dataset.bands[1];
        assert_eq!(
            band.center_x.as_ref().unwrap(),
            &array![[105., 115., 125.], [105., 115., 125.]]
        );
        assert_eq!(
            band.center_y.as_ref().unwrap(),
            &array![[495., 495., 495.], [485., 485., 485.]]
        );
    }

    #[test_log::test]
    fn missing_transform_falls_back_to_identity() {
        let raster =
            MemoryRaster::new(2, 2).with_band(MemoryBand::new(PixelType::UInt8, vec![0.; 4]));
        let dataset = read_raster(&raster, &ReadOptions::default()).unwrap();
        assert_eq!(dataset.metadata.geo_transform.coefficients(), [0., 1., 0., 0., 0., 1.]);
        assert_eq!(dataset.bands[0].bbox, array![[0., 2.], [2., 0.]]);
    }

    #[rstest]
    fn failing_band_fails_whole_read(raster: MemoryRaster) {
        let raster = raster.with_band(MemoryBand::new(PixelType::Int16, vec![1., 2.]));
        match read_raster(&raster, &ReadOptions::default()) {
            Err(MarshalError::BandRead { band, .. }) => assert_eq!(band, 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_dataset_is_a_read_failure() {
        let raster = MemoryRaster::new(2, 2);
        assert!(matches!(
            read_raster(&raster, &ReadOptions::default()),
            Err(MarshalError::BandRead { .. })
        ));
    }
}
