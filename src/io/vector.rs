//! In-memory vector features backed by GDAL/OGR geometries, with
//! Shapefile read/write.
use std::path::Path;

use gdal::vector::{
    FieldValue, Geometry, LayerAccess, LayerOptions, OGRFieldType, OGRwkbGeometryType,
};
use gdal::{Dataset, DriverManager};
use tracing::{debug, warn};

use crate::error::Result;
use crate::io::writers::shapefile::{ToFile, VectorData};

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Attribute {
    fn field_type(&self) -> OGRFieldType::Type {
        match self {
            Attribute::Integer(_) => OGRFieldType::OFTInteger64,
            Attribute::Real(_) => OGRFieldType::OFTReal,
            Attribute::Text(_) => OGRFieldType::OFTString,
        }
    }

    fn to_field_value(&self) -> FieldValue {
        match self {
            Attribute::Integer(v) => FieldValue::Integer64Value(*v),
            Attribute::Real(v) => FieldValue::RealValue(*v),
            Attribute::Text(v) => FieldValue::StringValue(v.clone()),
        }
    }

    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::IntegerValue(v) => Some(Attribute::Integer(v as i64)),
            FieldValue::Integer64Value(v) => Some(Attribute::Integer(v)),
            FieldValue::RealValue(v) => Some(Attribute::Real(v)),
            FieldValue::StringValue(v) => Some(Attribute::Text(v)),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Attribute::Integer(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: Geometry,
    /// Attribute values in field order
    pub attributes: Vec<(String, Attribute)>,
}

impl Feature {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }
}

/// A single-layer collection of features held in memory.
#[derive(Debug, Clone)]
pub struct FeatureCollection {
    pub name: String,
    pub geometry_type: OGRwkbGeometryType::Type,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(name: &str, geometry_type: OGRwkbGeometryType::Type) -> Self {
        Self {
            name: name.to_string(),
            geometry_type,
            features: Vec::new(),
        }
    }

    /// Point collection from plain coordinates, one attribute set per point.
    pub fn from_points(
        name: &str,
        points: &[(f64, f64)],
        attributes: Vec<Vec<(String, Attribute)>>,
    ) -> Result<Self> {
        let mut fc = Self::new(name, OGRwkbGeometryType::wkbPoint);
        let mut attributes = attributes.into_iter();
        for (x, y) in points {
            let geometry = Geometry::from_wkt(&format!("POINT ({} {})", x, y))?;
            fc.features.push(Feature {
                geometry,
                attributes: attributes.next().unwrap_or_default(),
            });
        }
        Ok(fc)
    }

    /// Load the first layer of any OGR-readable file.
    pub fn read_file(path: &Path) -> Result<Self> {
        let ds = Dataset::open(path)?;
        let mut layer = ds.layer(0)?;
        let name = layer.name();

        let mut features = Vec::new();
        for feature in layer.features() {
            let Some(geometry) = feature.geometry() else {
                warn!("Skipping feature without geometry in {:?}", path);
                continue;
            };
            let attributes = feature
                .fields()
                .filter_map(|(k, v)| v.and_then(Attribute::from_field_value).map(|a| (k, a)))
                .collect();
            features.push(Feature {
                geometry: geometry.clone(),
                attributes,
            });
        }

        let geometry_type = features
            .first()
            .map(|f| f.geometry.geometry_type())
            .unwrap_or(OGRwkbGeometryType::wkbUnknown);
        debug!("Read {} features from {:?}", features.len(), path);

        Ok(Self {
            name,
            geometry_type,
            features,
        })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Field names and types in order of first appearance
    fn schema(&self) -> Vec<(String, OGRFieldType::Type)> {
        let mut fields: Vec<(String, OGRFieldType::Type)> = Vec::new();
        for feature in &self.features {
            for (name, value) in &feature.attributes {
                if !fields.iter().any(|(n, _)| n == name) {
                    fields.push((name.clone(), value.field_type()));
                }
            }
        }
        fields
    }
}

impl ToFile for FeatureCollection {
    fn to_file(&self, path: &Path) -> Result<()> {
        let driver = DriverManager::get_driver_by_name("ESRI Shapefile")?;
        let mut ds = driver.create_vector_only(path)?;

        {
            let mut layer = ds.create_layer(LayerOptions {
                name: &self.name,
                srs: None,
                ty: self.geometry_type,
                options: None,
            })?;

            let schema = self.schema();
            let defs: Vec<(&str, OGRFieldType::Type)> =
                schema.iter().map(|(n, t)| (n.as_str(), *t)).collect();
            layer.create_defn_fields(&defs)?;

            for feature in &self.features {
                let names: Vec<&str> = feature.attributes.iter().map(|(n, _)| n.as_str()).collect();
                let values: Vec<FieldValue> = feature
                    .attributes
                    .iter()
                    .map(|(_, v)| v.to_field_value())
                    .collect();
                layer.create_feature_fields(feature.geometry.clone(), &names, &values)?;
            }
        }

        ds.flush_cache()?;
        debug!("Wrote {} features to {:?}", self.features.len(), path);
        Ok(())
    }
}

impl VectorData for FeatureCollection {
    fn as_file_writer(&self) -> Option<&dyn ToFile> {
        Some(self)
    }
}
