use clap::{Parser, Subcommand};
use std::path::PathBuf;

use geobridge::Connectedness;

#[derive(Parser)]
#[command(name = "geobridge", version, about = "geobridge CLI")]
pub struct CliArgs {
    /// Enable logging (RUST_LOG overrides the default `info` level)
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert raster regions into shapefile polygons
    Polygonize {
        /// Input raster (GeoTIFF or any GDAL-readable raster)
        #[arg(short, long)]
        input: PathBuf,

        /// Output shapefile; when omitted a JSON summary of the polygons is printed
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with polygonize parameters; flags below override it
        #[arg(long)]
        params: Option<PathBuf>,

        /// Name of the integer value field
        #[arg(long)]
        field: Option<String>,

        /// Pixel connectedness (four or eight)
        #[arg(long, value_enum)]
        connectedness: Option<Connectedness>,
    },

    /// Clip a raster by a polygon and write the masked result as GeoTIFF
    Clip {
        /// Input raster
        #[arg(short, long)]
        input: PathBuf,

        /// Clip polygon as WKT
        #[arg(long)]
        wkt: String,

        /// Output GeoTIFF
        #[arg(short, long)]
        output: PathBuf,

        /// Only count cells whose center falls inside the polygon
        #[arg(long, default_value_t = false)]
        no_all_touched: bool,

        /// Value written to masked cells and declared as no-data
        #[arg(long, default_value_t = -9999.0, allow_negative_numbers = true)]
        fill: f64,
    },

    /// Find an executable on PATH
    Which {
        /// Program name or path
        program: String,
    },
}
