//! Core building blocks: metadata-carrying arrays, masked arrays, geotransforms,
//! and polygonize parameters. These are consumed by the `io` writers and the
//! high-level `api` module.
pub mod array;
pub mod geotransform;
pub mod params;
