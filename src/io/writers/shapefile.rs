use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};

/// Capability to serialize a vector value to a named file.
pub trait ToFile {
    fn to_file(&self, path: &Path) -> Result<()>;
}

/// A vector value that may or may not know how to write itself.
pub trait VectorData {
    fn as_file_writer(&self) -> Option<&dyn ToFile> {
        None
    }

    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Write a point collection to a shapefile by delegating to its own writer.
pub fn to_point_shp(points: &dyn VectorData, output: &Path) -> Result<()> {
    match points.as_file_writer() {
        Some(writer) => {
            writer.to_file(output)?;
            info!("to_point_shp: wrote {:?}", output);
            Ok(())
        }
        None => Err(Error::UnsupportedRepresentation(points.describe())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Opaque;

    impl VectorData for Opaque {}

    #[test]
    fn value_without_writer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("points.shp");

        let err = to_point_shp(&Opaque, &out).unwrap_err();
        assert!(matches!(err, Error::UnsupportedRepresentation(_)));
        assert!(!out.exists());
    }
}
