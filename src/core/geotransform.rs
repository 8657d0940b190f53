//! Affine geotransforms and the `to_gdal` conversion capability.
use serde::{Deserialize, Serialize};

/// Anything that can be normalized to the six GDAL geotransform coefficients
/// `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`.
pub trait ToGeoTransform {
    fn to_gdal(&self) -> [f64; 6];
}

impl ToGeoTransform for [f64; 6] {
    fn to_gdal(&self) -> [f64; 6] {
        *self
    }
}

/// Named form of the GDAL coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub row_rotation: f64,
    pub origin_y: f64,
    pub col_rotation: f64,
    /// Usually negative for north-up rasters
    pub pixel_height: f64,
}

impl GeoTransform {
    /// North-up transform with no rotation
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            pixel_width,
            row_rotation: 0.0,
            origin_y,
            col_rotation: 0.0,
            pixel_height,
        }
    }

    pub fn from_gdal(c: [f64; 6]) -> Self {
        Self {
            origin_x: c[0],
            pixel_width: c[1],
            row_rotation: c[2],
            origin_y: c[3],
            col_rotation: c[4],
            pixel_height: c[5],
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.row_rotation != 0.0 || self.col_rotation != 0.0
    }

    /// World coordinates of a cell corner (col, row) in pixel space
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_x + col * self.pixel_width + row * self.row_rotation,
            self.origin_y + col * self.col_rotation + row * self.pixel_height,
        )
    }

    /// Transform of a sub-window starting at (col_off, row_off)
    pub fn shifted(&self, col_off: usize, row_off: usize) -> Self {
        let (x, y) = self.apply(col_off as f64, row_off as f64);
        Self {
            origin_x: x,
            origin_y: y,
            ..*self
        }
    }
}

impl ToGeoTransform for GeoTransform {
    fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }
}

/// Affine matrix in row-major `a, b, c, d, e, f` order:
/// `x = a*col + b*row + c`, `y = d*col + e*row + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }
}

impl ToGeoTransform for Affine {
    fn to_gdal(&self) -> [f64; 6] {
        [self.c, self.a, self.b, self.f, self.d, self.e]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affine_reorders_to_gdal() {
        let aff = Affine::new(30.0, 0.0, 500_000.0, 0.0, -30.0, 4_200_000.0);
        assert_eq!(
            aff.to_gdal(),
            [500_000.0, 30.0, 0.0, 4_200_000.0, 0.0, -30.0]
        );
    }

    #[test]
    fn named_form_round_trips() {
        let raw = [10.0, 2.0, 0.0, 50.0, 0.0, -2.0];
        let gt = GeoTransform::from_gdal(raw);
        assert_eq!(gt, GeoTransform::north_up(10.0, 50.0, 2.0, -2.0));
        assert_eq!(gt.to_gdal(), raw);
        assert!(!gt.is_rotated());
    }

    #[test]
    fn shifted_moves_origin_by_whole_cells() {
        let gt = GeoTransform::north_up(0.0, 100.0, 10.0, -10.0);
        let sub = gt.shifted(3, 2);
        assert_eq!(sub.origin_x, 30.0);
        assert_eq!(sub.origin_y, 80.0);
        assert_eq!(sub.pixel_width, 10.0);
    }
}
