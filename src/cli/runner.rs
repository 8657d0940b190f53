use std::path::{Path, PathBuf};

use gdal::vector::Geometry;
use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use geobridge::{
    Attribute, Connectedness, MetadataArray, PolygonizeParams, RasterRef, RasterSource,
    clip_with_transform, to_geotiff, to_polygons, which,
};

use super::args::{CliArgs, Command};
use super::errors::AppError;

fn load_params(
    params: Option<&Path>,
    field: Option<String>,
    connectedness: Option<Connectedness>,
) -> Result<PolygonizeParams, AppError> {
    let mut p = match params {
        Some(path) => PolygonizeParams::from_json_file(path)?,
        None => PolygonizeParams::default(),
    };
    if let Some(field) = field {
        p.field_name = field;
    }
    if let Some(c) = connectedness {
        p.connectedness = c;
    }
    p.validate()?;
    Ok(p)
}

fn run_polygonize(
    input: &Path,
    output: Option<&Path>,
    params: &PolygonizeParams,
) -> Result<(), AppError> {
    info!("Polygonizing {:?}", input);
    match to_polygons(RasterRef::OnDisk(input), output, params)? {
        Some(polygons) => {
            let mut values: Vec<i64> = polygons
                .features
                .iter()
                .filter_map(|f| f.attribute(&params.field_name).and_then(Attribute::as_i64))
                .collect();
            values.sort_unstable();
            values.dedup();
            let summary = json!({
                "input": input,
                "polygons": polygons.len(),
                "field": params.field_name,
                "values": values,
            });
            println!("{}", summary);
        }
        None => {
            if let Some(out) = output {
                info!("Polygons written to {:?}", out);
            }
        }
    }
    Ok(())
}

fn run_clip(
    input: &Path,
    wkt: &str,
    output: &Path,
    all_touched: bool,
    fill: f64,
) -> Result<(), AppError> {
    let raster = RasterSource::open(input)?;
    let polygon = Geometry::from_wkt(wkt)?;
    let clipped = clip_with_transform(&raster, &polygon, all_touched)?;

    let valid = clipped.masked.valid_count();
    if valid == 0 {
        warn!("Clip polygon covers no valid cells of {:?}", input);
    }

    let filled = MetadataArray::with_no_data(clipped.masked.filled(fill), fill);
    to_geotiff(&filled, Some(&clipped.geotransform), output)?;
    info!(
        "Clipped {:?} -> {:?} ({} valid of {} cells)",
        input,
        output,
        valid,
        filled.len()
    );
    Ok(())
}

fn run_which(program: &str) -> Result<PathBuf, AppError> {
    which(program).ok_or_else(|| AppError::NotFound {
        program: program.to_string(),
    })
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    match args.command {
        Command::Polygonize {
            input,
            output,
            params,
            field,
            connectedness,
        } => {
            let params = load_params(params.as_deref(), field, connectedness)?;
            run_polygonize(&input, output.as_deref(), &params)?;
        }
        Command::Clip {
            input,
            wkt,
            output,
            no_all_touched,
            fill,
        } => {
            run_clip(&input, &wkt, &output, !no_all_touched, fill)?;
        }
        Command::Which { program } => {
            let path = run_which(&program)?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
