//! Shared types and enums used across geobridge.
//! Includes the on-disk `PixelType` table entries and polygonize `Connectedness`.
use clap::ValueEnum;
use gdal::raster::GdalDataType;
use serde::{Deserialize, Serialize};

/// Pixel types the GeoTIFF writer can emit.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum PixelType {
    Float32,
    Float64,
    Int16,
    Int32,
}

impl PixelType {
    /// Fixed lookup from an in-memory element type to the on-disk pixel type.
    pub fn from_gdal(data_type: GdalDataType) -> Option<Self> {
        match data_type {
            GdalDataType::Float32 => Some(PixelType::Float32),
            GdalDataType::Float64 => Some(PixelType::Float64),
            GdalDataType::Int16 => Some(PixelType::Int16),
            GdalDataType::Int32 => Some(PixelType::Int32),
            _ => None,
        }
    }

    pub fn gdal_type(self) -> GdalDataType {
        match self {
            PixelType::Float32 => GdalDataType::Float32,
            PixelType::Float64 => GdalDataType::Float64,
            PixelType::Int16 => GdalDataType::Int16,
            PixelType::Int32 => GdalDataType::Int32,
        }
    }
}

impl std::fmt::Display for PixelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PixelType::Float32 => "Float32",
            PixelType::Float64 => "Float64",
            PixelType::Int16 => "Int16",
            PixelType::Int32 => "Int32",
        };
        write!(f, "{}", s)
    }
}

/// Pixel neighbourhood used when grouping cells into polygons.
#[derive(
    Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize,
)]
pub enum Connectedness {
    #[default]
    Four,
    Eight,
}

impl Connectedness {
    /// `GDALPolygonize` option string, if any is needed.
    pub fn polygonize_option(self) -> Option<&'static str> {
        match self {
            Connectedness::Four => None,
            Connectedness::Eight => Some("8CONNECTED=8"),
        }
    }
}

impl std::fmt::Display for Connectedness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Connectedness::Four => write!(f, "Four"),
            Connectedness::Eight => write!(f, "Eight"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_table_covers_exactly_four_types() {
        for pt in [
            PixelType::Float32,
            PixelType::Float64,
            PixelType::Int16,
            PixelType::Int32,
        ] {
            assert_eq!(PixelType::from_gdal(pt.gdal_type()), Some(pt));
        }
        assert_eq!(PixelType::from_gdal(GdalDataType::UInt8), None);
        assert_eq!(PixelType::from_gdal(GdalDataType::UInt16), None);
        assert_eq!(PixelType::from_gdal(GdalDataType::Int64), None);
    }

    #[test]
    fn eight_connected_sets_option() {
        assert_eq!(Connectedness::Four.polygonize_option(), None);
        assert_eq!(Connectedness::Eight.polygonize_option(), Some("8CONNECTED=8"));
    }
}
