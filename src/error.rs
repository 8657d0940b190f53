//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, GDAL, ndarray and JSON errors, and provides semantic
//! variants for unsupported inputs and failed GDAL algorithms.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported array element type for GeoTIFF output: {dtype}")]
    UnsupportedType { dtype: String },

    #[error("Unable to write shapefile, unknown data representation: {0}")]
    UnsupportedRepresentation(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Requested bounds do not overlap the raster: {0}")]
    EmptyWindow(String),

    #[error("Polygonize failed: {0}")]
    Polygonize(String),
}

impl Error {
    pub fn invalid_argument<V: std::fmt::Display>(arg: &'static str, value: V) -> Self {
        Error::InvalidArgument {
            arg,
            value: value.to_string(),
        }
    }
}
