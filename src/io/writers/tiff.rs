use std::path::Path;

use gdal::DriverManager;
use gdal::raster::{Buffer, GdalType};
use ndarray::Array2;
use tracing::debug;

use crate::core::array::MetadataArray;
use crate::core::geotransform::ToGeoTransform;
use crate::error::{Error, Result};
use crate::types::PixelType;

/// Resolve the on-disk pixel type for element type `T`, failing for anything
/// outside the Float32/Float64/Int16/Int32 table.
pub fn pixel_type_for<T: GdalType>() -> Result<PixelType> {
    PixelType::from_gdal(T::datatype()).ok_or_else(|| Error::UnsupportedType {
        dtype: std::any::type_name::<T>().to_string(),
    })
}

/// Write a 2-D array as a single-band GeoTIFF.
///
/// The element type is checked before anything touches the filesystem. When the
/// array carries metadata, the band no-data value is set from its
/// `no_data_value` entry, or cleared if the entry is missing. Arrays without
/// metadata leave the driver default untouched.
pub fn to_geotiff<T: GdalType + Copy>(
    arr: &MetadataArray<T>,
    geotransform: Option<&dyn ToGeoTransform>,
    output: &Path,
) -> Result<()> {
    let pixel_type = pixel_type_for::<T>()?;
    let (rows, cols) = arr.dim();

    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let mut ds = driver.create_with_band_type::<T, _>(output, cols, rows, 1)?;

    if let Some(gt) = geotransform {
        ds.set_geo_transform(&gt.to_gdal())?;
    }

    {
        let mut band = ds.rasterband(1)?;
        if arr.metadata().is_some() {
            band.set_no_data_value(arr.no_data_value())?;
        }
        let mut buf = Buffer::new((cols, rows), arr.iter().copied().collect());
        band.write((0, 0), (cols, rows), &mut buf)?;
    }

    ds.flush_cache()?;
    debug!(
        "to_geotiff: wrote {}x{} {} raster to {:?}",
        cols, rows, pixel_type, output
    );
    Ok(())
}

/// Capability of an in-memory raster to materialize itself as a GeoTIFF.
pub trait GeoTiffWrite {
    fn write_geotiff(&self, geotransform: Option<&dyn ToGeoTransform>, output: &Path)
    -> Result<()>;
}

impl<T: GdalType + Copy> GeoTiffWrite for MetadataArray<T> {
    fn write_geotiff(
        &self,
        geotransform: Option<&dyn ToGeoTransform>,
        output: &Path,
    ) -> Result<()> {
        to_geotiff(self, geotransform, output)
    }
}

impl<T: GdalType + Copy> GeoTiffWrite for Array2<T> {
    fn write_geotiff(
        &self,
        geotransform: Option<&dyn ToGeoTransform>,
        output: &Path,
    ) -> Result<()> {
        pixel_type_for::<T>()?;
        to_geotiff(&MetadataArray::plain(self.clone()), geotransform, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_element_types() {
        assert_eq!(pixel_type_for::<f32>().unwrap(), PixelType::Float32);
        assert_eq!(pixel_type_for::<f64>().unwrap(), PixelType::Float64);
        assert_eq!(pixel_type_for::<i16>().unwrap(), PixelType::Int16);
        assert_eq!(pixel_type_for::<i32>().unwrap(), PixelType::Int32);
    }

    #[test]
    fn unsupported_element_types() {
        assert!(matches!(
            pixel_type_for::<u8>(),
            Err(Error::UnsupportedType { .. })
        ));
        assert!(matches!(
            pixel_type_for::<u16>(),
            Err(Error::UnsupportedType { .. })
        ));
    }
}
