//! I/O layer over GDAL: windowed raster reads, rasterization and polygonization
//! (`gdal`), in-memory vector features (`vector`), and `writers` for GeoTIFF and
//! Shapefile outputs.
pub mod gdal;
pub use self::gdal::{Bounds, RasterMetadata, RasterSource, RasterWindow, Window};

pub mod vector;
pub use vector::{Attribute, Feature, FeatureCollection};

pub mod writers;
