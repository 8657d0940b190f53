#![doc = r#"
geobridge — helpers bridging in-memory arrays and GDAL raster/vector files.

This crate wraps GDAL to move data between `ndarray` arrays and on-disk
GeoTIFF / ESRI Shapefile datasets: write arrays as single-band GeoTIFFs,
write vector collections to shapefiles, clip a raster by a polygon mask,
polygonize a raster into `GRIDCODE` polygons, and find executables on `PATH`.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Write an annotated array as GeoTIFF
-----------------------------------
```rust,no_run
use std::path::Path;
use ndarray::array;
use geobridge::{GeoTransform, MetadataArray, to_geotiff};

fn main() -> geobridge::Result<()> {
    let dem = MetadataArray::with_no_data(
        array![[12.5f32, 13.0], [-9999.0, 14.2]],
        -9999.0,
    );
    let gt = GeoTransform::north_up(500_000.0, 4_200_000.0, 30.0, -30.0);
    to_geotiff(&dem, Some(&gt), Path::new("/out/dem.tif"))
}
```

Polygonize an in-memory raster
------------------------------
```rust,no_run
use ndarray::array;
use geobridge::{MetadataArray, PolygonizeParams, RasterRef, to_polygons};

fn main() -> geobridge::Result<()> {
    let basins = MetadataArray::plain(array![[1i32, 1, 2], [1, 2, 2]]);
    let gt = [0.0f64, 1.0, 0.0, 2.0, 0.0, -1.0];
    let polygons = to_polygons(
        RasterRef::InMemory { array: &basins, transform: Some(&gt) },
        None,
        &PolygonizeParams::default(),
    )?;
    if let Some(fc) = polygons {
        println!("{} polygons", fc.len());
    }
    Ok(())
}
```

Clip a raster by a polygon
--------------------------
```rust,no_run
use gdal::vector::Geometry;
use geobridge::{RasterSource, clip};

fn main() -> geobridge::Result<()> {
    let raster = RasterSource::open("/data/dem.tif")?;
    let polygon = Geometry::from_wkt("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))")?;
    let masked = clip(&raster, &polygon, true)?;
    println!("{} valid cells", masked.valid_count());
    Ok(())
}
```

Error handling
--------------
All public functions return `geobridge::Result<T>`; match on `geobridge::Error`
to handle specific cases such as `UnsupportedType` or GDAL failures.

Useful modules
--------------
- [`api`] — `clip` and `to_polygons`.
- [`core`] — `MetadataArray`, `MaskedArray`, geotransforms, parameters.
- [`io`] — GDAL raster reader, vector features, GeoTIFF/Shapefile writers.
- [`which`] — executable lookup.
- [`error`] — crate-level `Error` and `Result`.
"#]

pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;
pub mod which;

// Types
pub use self::core::array::{MaskedArray, Metadata, MetadataArray, MetadataValue, NO_DATA_VALUE};
pub use self::core::geotransform::{Affine, GeoTransform, ToGeoTransform};
pub use self::core::params::{GRIDCODE, PolygonizeParams};
pub use error::{Error, Result};
pub use types::{Connectedness, PixelType};

// Readers and writers
pub use io::gdal::{Bounds, RasterSource, RasterWindow};
pub use io::vector::{Attribute, Feature, FeatureCollection};
pub use io::writers::{GeoTiffWrite, ToFile, VectorData, to_geotiff, to_point_shp};

// High-level API re-exports
pub use api::{ClippedRaster, RasterRef, clip, clip_with_transform, to_polygons};
pub use which::{which, which_in};
