use std::path::Path;

use log::{debug, info, warn};

use crate::{
    components::{
        band::{BandRecord, BandSink},
        file::{FileSink, Store},
        metadata::RasterMetadata,
        options::WriteOptions,
        PixelBuffer,
    },
    errors::Result,
};

/// Creates `path` in `store` holding `bands`, coerced to `metadata.pixel_type`.
///
/// Every band is encoded before the dataset is created, so a malformed
/// record or an unwritable pixel type leaves the store untouched.
pub fn write_raster<S: Store>(
    store: &mut S,
    path: &Path,
    bands: &[BandRecord],
    metadata: &RasterMetadata,
    options: &WriteOptions,
) -> Result<()> {
    metadata.validate(bands)?;
    let pixel_type = metadata.pixel_type;

    let buffers = (1..)
        .zip(bands)
        .map(|(index, band)| PixelBuffer::encode(&band.data, pixel_type, index))
        .collect::<Result<Vec<_>>>()?;

    let mut sink = store.create(
        path,
        (metadata.cols, metadata.rows),
        metadata.band_count,
        pixel_type,
    )?;
    sink.set_transform(&metadata.geo_transform)?;
    sink.set_crs(&metadata.projection)?;

    for ((index, buffer), record) in (1..).zip(buffers).zip(bands) {
        let mut band = sink.band(index)?;
        if let Some(no_data_value) = record.no_data_value {
            // Fractions survive only for floating point types.
            let no_data_value = pixel_type.coerce(no_data_value).unwrap_or(no_data_value);
            debug!("band {index}: no-data value {no_data_value}");
            band.set_no_data_value(no_data_value)?;
        }
        band.write(buffer)?;
        if options.compute_statistics {
            if let Err(err) = band.compute_statistics() {
                warn!("band {index}: statistics not computed: {err}");
            }
        }
    }

    info!(
        "wrote {} bands of {}x{} {pixel_type:?} to {}",
        metadata.band_count,
        metadata.cols,
        metadata.rows,
        path.display()
    );
    Ok(())
}
