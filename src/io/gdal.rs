use std::ffi::{CStr, CString};
use std::fs;
use std::os::raw::c_char;
use std::path::Path;
use std::ptr;

use gdal::raster::{GdalDataType, RasterizeOptions, rasterize};
use gdal::vector::{Geometry, LayerAccess, LayerOptions, OGRFieldType, OGRwkbGeometryType};
use gdal::{Dataset, DriverManager};
use gdal_sys::CPLErr;
use ndarray::Array2;
use tracing::{debug, info};

use crate::core::geotransform::{GeoTransform, ToGeoTransform};
use crate::core::params::PolygonizeParams;
use crate::error::{Error, Result};

/// Axis-aligned bounding box in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn of_geometry(geometry: &Geometry) -> Self {
        let env = geometry.envelope();
        Self::new(env.MinX, env.MinY, env.MaxX, env.MaxY)
    }
}

/// Pixel window into a raster: offsets and size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub col_off: usize,
    pub row_off: usize,
    pub cols: usize,
    pub rows: usize,
}

// Snap values within float noise of a whole cell edge onto that edge
fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-9 { r } else { v }
}

/// Smallest window of whole cells covering `bounds`, clamped to the raster extent.
pub fn pixel_window(gt: &GeoTransform, size: (usize, usize), bounds: &Bounds) -> Result<Window> {
    if gt.is_rotated() {
        return Err(Error::invalid_argument(
            "geotransform",
            format!("{:?} (rotated rasters are not supported)", gt.to_gdal()),
        ));
    }
    if gt.pixel_width == 0.0 || gt.pixel_height == 0.0 {
        return Err(Error::invalid_argument("geotransform", format!("{:?}", gt.to_gdal())));
    }

    let c0 = snap((bounds.min_x - gt.origin_x) / gt.pixel_width);
    let c1 = snap((bounds.max_x - gt.origin_x) / gt.pixel_width);
    let r0 = snap((bounds.max_y - gt.origin_y) / gt.pixel_height);
    let r1 = snap((bounds.min_y - gt.origin_y) / gt.pixel_height);

    let (size_x, size_y) = (size.0 as f64, size.1 as f64);
    let col_start = c0.min(c1).floor().clamp(0.0, size_x);
    let col_end = c0.max(c1).ceil().clamp(0.0, size_x);
    let row_start = r0.min(r1).floor().clamp(0.0, size_y);
    let row_end = r0.max(r1).ceil().clamp(0.0, size_y);

    if col_end <= col_start || row_end <= row_start {
        return Err(Error::EmptyWindow(format!("{:?}", bounds)));
    }

    Ok(Window {
        col_off: col_start as usize,
        row_off: row_start as usize,
        cols: (col_end - col_start) as usize,
        rows: (row_end - row_start) as usize,
    })
}

/// Metadata extracted from a GDAL raster dataset
#[derive(Debug, Clone)]
pub struct RasterMetadata {
    /// Width (pixels) of the raster
    pub size_x: usize,
    /// Height (lines) of the raster
    pub size_y: usize,
    pub bands: usize,
    pub geotransform: GeoTransform,
    /// No-data value of band 1
    pub no_data: Option<f64>,
    /// Pixel type of band 1
    pub data_type: GdalDataType,
}

/// Round a no-data value to what a cell of `data_type` can hold, so it compares
/// equal to the stored sentinel once cells are widened to f64.
pub fn no_data_in_band_type(no_data: f64, data_type: GdalDataType) -> f64 {
    match data_type {
        GdalDataType::Float32 => no_data as f32 as f64,
        _ => no_data,
    }
}

/// Result of a windowed read: band-1 data with the window's own grid
#[derive(Debug, Clone)]
pub struct RasterWindow {
    pub data: Array2<f64>,
    pub window: Window,
    pub geotransform: GeoTransform,
    pub no_data: Option<f64>,
}

impl RasterWindow {
    pub fn is_no_data(&self, v: f64) -> bool {
        match self.no_data {
            Some(nd) if nd.is_nan() => v.is_nan(),
            Some(nd) => v == nd,
            None => false,
        }
    }
}

/// Reader for GDAL rasters supporting full and windowed band reads
pub struct RasterSource {
    pub dataset: Dataset,
    pub metadata: RasterMetadata,
}

impl RasterSource {
    /// Open a GDAL-supported raster (GeoTIFF, ENVI, ...)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let dataset = Dataset::open(path.as_ref())?;
        let (size_x, size_y) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(Error::invalid_argument(
                "raster",
                format!("{:?} has no raster bands", path.as_ref()),
            ));
        }
        let geotransform = match dataset.geo_transform() {
            Ok(gt) => GeoTransform::from_gdal(gt),
            Err(_) => GeoTransform::north_up(0.0, 0.0, 1.0, 1.0),
        };
        let band = dataset.rasterband(1)?;
        let data_type = band.band_type();
        let no_data = band
            .no_data_value()
            .map(|nd| no_data_in_band_type(nd, data_type));
        drop(band);

        Ok(RasterSource {
            dataset,
            metadata: RasterMetadata {
                size_x: size_x as usize,
                size_y: size_y as usize,
                bands,
                geotransform,
                no_data,
                data_type,
            },
        })
    }

    /// Read a single band (1-based index) as an f64 ndarray of shape (height, width)
    pub fn read_band(&self, index: usize) -> Result<Array2<f64>> {
        let window = Window {
            col_off: 0,
            row_off: 0,
            cols: self.metadata.size_x,
            rows: self.metadata.size_y,
        };
        self.read_band_window(index, &window)
    }

    fn read_band_window(&self, index: usize, window: &Window) -> Result<Array2<f64>> {
        if index == 0 || index > self.metadata.bands {
            return Err(Error::invalid_argument("band", index));
        }
        let band = self.dataset.rasterband(index)?;
        let size = (window.cols, window.rows);
        let buf = band.read_as::<f64>(
            (window.col_off as isize, window.row_off as isize),
            size,
            size,
            None,
        )?;
        Ok(Array2::from_shape_vec(
            (window.rows, window.cols),
            buf.data().to_vec(),
        )?)
    }

    /// Read band 1 inside a pixel window
    pub fn read_window(&self, window: Window) -> Result<RasterWindow> {
        let data = self.read_band_window(1, &window)?;
        Ok(RasterWindow {
            data,
            window,
            geotransform: self
                .metadata
                .geotransform
                .shifted(window.col_off, window.row_off),
            no_data: self.metadata.no_data,
        })
    }

    /// Read band 1 over the cells overlapping `bounds`
    pub fn read_bounds(&self, bounds: &Bounds) -> Result<RasterWindow> {
        let window = pixel_window(
            &self.metadata.geotransform,
            (self.metadata.size_x, self.metadata.size_y),
            bounds,
        )?;
        debug!("read_bounds: {:?} -> {:?}", bounds, window);
        self.read_window(window)
    }
}

/// Burn `geometry` onto the grid of `window`; cells covered are 1, others 0.
pub fn rasterize_coverage(
    geometry: &Geometry,
    window: &RasterWindow,
    all_touched: bool,
) -> Result<Array2<u8>> {
    let (rows, cols) = window.data.dim();
    let driver = DriverManager::get_driver_by_name("MEM")?;
    let mut ds = driver.create_with_band_type::<u8, _>("", cols, rows, 1)?;
    ds.set_geo_transform(&window.geotransform.to_gdal())?;

    let options = RasterizeOptions {
        all_touched,
        ..Default::default()
    };
    rasterize(
        &mut ds,
        &[1],
        std::slice::from_ref(geometry),
        &[1.0],
        Some(options),
    )?;

    let band = ds.rasterband(1)?;
    let buf = band.read_as::<u8>((0, 0), (cols, rows), (cols, rows), None)?;
    Ok(Array2::from_shape_vec((rows, cols), buf.data().to_vec())?)
}

const SHAPEFILE_PARTS: [&str; 5] = ["shp", "shx", "dbf", "prj", "cpg"];

/// Remove a shapefile and its sidecar files, if present.
pub fn remove_shapefile(shp: &Path) -> Result<()> {
    for ext in SHAPEFILE_PARTS {
        let part = shp.with_extension(ext);
        if part.exists() {
            fs::remove_file(&part)?;
        }
    }
    Ok(())
}

fn last_cpl_message() -> String {
    // SAFETY: CPLGetLastErrorMsg never returns null; the string is owned by GDAL.
    unsafe { CStr::from_ptr(gdal_sys::CPLGetLastErrorMsg()) }
        .to_string_lossy()
        .into_owned()
}

/// Vectorize band 1 of `raster` into a new shapefile at `shp`.
///
/// Any existing shapefile at `shp` is replaced. The layer is named after the
/// file stem, has no spatial reference, and holds one integer field carrying
/// each region's cell value. Cells masked by the band's mask are skipped.
/// Returns the number of polygons written.
pub fn polygonize_to_shapefile(
    raster: &Path,
    shp: &Path,
    params: &PolygonizeParams,
) -> Result<u64> {
    params.validate()?;
    remove_shapefile(shp)?;

    let layer_name = shp
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let driver = DriverManager::get_driver_by_name("ESRI Shapefile")?;
    let mut dst = driver.create_vector_only(shp)?;
    let src = Dataset::open(raster)?;
    let band = src.rasterband(1)?;

    let options: Vec<CString> = params
        .connectedness
        .polygonize_option()
        .into_iter()
        .map(CString::new)
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| Error::Polygonize(e.to_string()))?;
    let mut option_ptrs: Vec<*mut c_char> = options
        .iter()
        .map(|s| s.as_ptr() as *mut c_char)
        .collect();
    option_ptrs.push(ptr::null_mut());

    let count = {
        let layer = dst.create_layer(LayerOptions {
            name: &layer_name,
            srs: None,
            ty: OGRwkbGeometryType::wkbPolygon,
            options: None,
        })?;
        layer.create_defn_fields(&[(params.field_name.as_str(), OGRFieldType::OFTInteger)])?;

        // SAFETY: band and layer outlive the call; the option list is null-terminated
        // and backed by `options`, which is alive for the whole block.
        let rv = unsafe {
            let h_band = band.c_rasterband();
            gdal_sys::GDALPolygonize(
                h_band,
                gdal_sys::GDALGetMaskBand(h_band),
                layer.c_layer(),
                0,
                option_ptrs.as_mut_ptr(),
                None,
                ptr::null_mut(),
            )
        };
        if rv != CPLErr::CE_None {
            return Err(Error::Polygonize(last_cpl_message()));
        }
        layer.feature_count()
    };

    dst.flush_cache()?;
    info!(
        "polygonize: {:?} -> {:?} ({} polygons, {} connected)",
        raster, shp, count, params.connectedness
    );
    Ok(count)
}
