//! High-level, ergonomic library API: clip a raster by a polygon mask, and
//! polygonize rasters held in memory or on disk. Prefer these entrypoints over
//! the low-level `io` helpers when integrating geobridge.
use std::path::{Path, PathBuf};

use gdal::vector::Geometry;
use ndarray::Zip;
use tempfile::TempDir;
use tracing::debug;

use crate::core::array::MaskedArray;
use crate::core::geotransform::{GeoTransform, ToGeoTransform};
use crate::core::params::PolygonizeParams;
use crate::error::Result;
use crate::io::gdal::{Bounds, RasterSource, polygonize_to_shapefile, rasterize_coverage};
use crate::io::vector::FeatureCollection;
use crate::io::writers::tiff::GeoTiffWrite;

/// Prefix of temporary workspaces created by [`to_polygons`]
pub const WORKSPACE_PREFIX: &str = "geobridge_";

/// A raster given either as an in-memory array or as a path to an existing file.
pub enum RasterRef<'a> {
    InMemory {
        array: &'a dyn GeoTiffWrite,
        transform: Option<&'a dyn ToGeoTransform>,
    },
    OnDisk(&'a Path),
}

/// Clip output together with the grid it was read on
#[derive(Debug, Clone)]
pub struct ClippedRaster {
    pub masked: MaskedArray<f64>,
    pub geotransform: GeoTransform,
}

/// Clip `raster` to `polygon`.
///
/// Only the window overlapping the polygon's bounding box is read. The returned
/// mask is `true` where the cell holds the band no-data value or is not covered
/// by the polygon; `all_touched` counts partially covered cells as covered.
pub fn clip(raster: &RasterSource, polygon: &Geometry, all_touched: bool) -> Result<MaskedArray<f64>> {
    Ok(clip_with_transform(raster, polygon, all_touched)?.masked)
}

/// Same as [`clip`], also returning the geotransform of the clipped window.
pub fn clip_with_transform(
    raster: &RasterSource,
    polygon: &Geometry,
    all_touched: bool,
) -> Result<ClippedRaster> {
    let bounds = Bounds::of_geometry(polygon);
    let window = raster.read_bounds(&bounds)?;
    let coverage = rasterize_coverage(polygon, &window, all_touched)?;

    let mask = Zip::from(&window.data)
        .and(&coverage)
        .map_collect(|&v, &covered| window.is_no_data(v) || covered == 0);
    debug!(
        "clip: window {:?}, {} of {} cells masked",
        window.window,
        mask.iter().filter(|m| **m).count(),
        mask.len()
    );

    Ok(ClippedRaster {
        geotransform: window.geotransform,
        masked: MaskedArray {
            data: window.data,
            mask,
        },
    })
}

fn create_workspace(params: &PolygonizeParams) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(WORKSPACE_PREFIX);
    let dir = match &params.temp_root {
        Some(root) => builder.tempdir_in(root)?,
        None => builder.tempdir()?,
    };
    debug!("Created workspace {:?}", dir.path());
    Ok(dir)
}

/// Polygonize a raster into shapefile polygons carrying an integer cell-value field.
///
/// A temporary workspace is created when no output path is given or the raster is
/// in memory; in-memory rasters are first written there as GeoTIFF. When the
/// workspace was used the resulting polygons are loaded and returned; otherwise the
/// caller already has the shapefile at `shp_path` and `None` is returned. The
/// workspace is removed on every exit path.
pub fn to_polygons(
    raster: RasterRef<'_>,
    shp_path: Option<&Path>,
    params: &PolygonizeParams,
) -> Result<Option<FeatureCollection>> {
    params.validate()?;
    let mut workspace: Option<TempDir> = None;

    let raster_path: PathBuf = match raster {
        RasterRef::OnDisk(path) => path.to_path_buf(),
        RasterRef::InMemory { array, transform } => {
            let ws = workspace.insert(create_workspace(params)?);
            let path = ws.path().join("raster.tif");
            array.write_geotiff(transform, &path)?;
            path
        }
    };

    let shp: PathBuf = match shp_path {
        Some(path) => path.to_path_buf(),
        None => {
            let ws = match workspace.take() {
                Some(ws) => ws,
                None => create_workspace(params)?,
            };
            workspace.insert(ws).path().join("polygons.shp")
        }
    };

    polygonize_to_shapefile(&raster_path, &shp, params)?;

    match workspace {
        Some(ws) => {
            let polygons = FeatureCollection::read_file(&shp)?;
            ws.close()?;
            Ok(Some(polygons))
        }
        None => Ok(None),
    }
}
