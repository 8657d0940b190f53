//! Writers for GeoTIFF rasters and shapefile vectors.
pub mod shapefile;
pub mod tiff;

pub use shapefile::{ToFile, VectorData, to_point_shp};
pub use tiff::{GeoTiffWrite, pixel_type_for, to_geotiff};
