use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Connectedness;

/// Integer attribute holding each polygon's source cell value
pub const GRIDCODE: &str = "GRIDCODE";

/// Longest field name a DBF header can hold
pub const MAX_FIELD_NAME_LEN: usize = 10;

/// Polygonize parameters suitable for config files and CLI presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonizeParams {
    /// Name of the integer field written for each polygon
    pub field_name: String,
    pub connectedness: Connectedness,
    /// Directory under which temporary workspaces are created; None means the system temp dir
    pub temp_root: Option<PathBuf>,
}

impl Default for PolygonizeParams {
    fn default() -> Self {
        Self {
            field_name: GRIDCODE.to_string(),
            connectedness: Connectedness::Four,
            temp_root: None,
        }
    }
}

impl PolygonizeParams {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reject field names the shapefile driver would drop or truncate.
    pub fn validate(&self) -> Result<()> {
        if self.field_name.is_empty() || self.field_name.len() > MAX_FIELD_NAME_LEN {
            return Err(Error::invalid_argument("field_name", &self.field_name));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let params: PolygonizeParams = serde_json::from_str(r#"{"connectedness":"Eight"}"#).unwrap();
        assert_eq!(params.connectedness, Connectedness::Eight);
        assert_eq!(params.field_name, GRIDCODE);
        assert!(params.temp_root.is_none());
    }

    #[test]
    fn field_name_must_fit_a_dbf_header() {
        let mut params = PolygonizeParams::default();
        assert!(params.validate().is_ok());

        params.field_name = "BASIN_CODE".to_string();
        assert!(params.validate().is_ok());

        params.field_name = "BASIN_CODES".to_string();
        assert!(matches!(params.validate(), Err(Error::InvalidArgument { .. })));

        params.field_name.clear();
        assert!(params.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        let params = PolygonizeParams {
            field_name: "VALUE".to_string(),
            connectedness: Connectedness::Eight,
            temp_root: Some(dir.path().to_path_buf()),
        };
        std::fs::write(&path, serde_json::to_string(&params).unwrap()).unwrap();

        assert_eq!(PolygonizeParams::from_json_file(&path).unwrap(), params);
    }
}
