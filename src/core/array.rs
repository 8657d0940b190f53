//! Arrays carrying auxiliary metadata, and masked arrays produced by clipping.
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use ndarray::{Array2, Ix2, SliceArg};
use serde::{Deserialize, Serialize};

/// Key consulted by the GeoTIFF writer for the band no-data sentinel.
pub const NO_DATA_VALUE: &str = "no_data_value";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetadataValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Int(v) => Some(*v as f64),
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Text(_) => None,
        }
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Float(v)
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        MetadataValue::Int(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        MetadataValue::Text(v.to_string())
    }
}

pub type Metadata = BTreeMap<String, MetadataValue>;

/// A 2-D array with an optional, shared metadata mapping.
///
/// Numeric operations go through `Deref` to the wrapped `Array2<T>`. Arrays
/// derived through [`MetadataArray::derive`] (and the `slice`/`map` helpers
/// built on it) share the same metadata `Arc`; the mapping is never deep-copied.
#[derive(Debug, Clone)]
pub struct MetadataArray<T> {
    data: Array2<T>,
    metadata: Option<Arc<Metadata>>,
}

impl<T> MetadataArray<T> {
    pub fn new(data: Array2<T>, metadata: Metadata) -> Self {
        Self {
            data,
            metadata: Some(Arc::new(metadata)),
        }
    }

    /// Wrap an array without any metadata attached.
    pub fn plain(data: Array2<T>) -> Self {
        Self {
            data,
            metadata: None,
        }
    }

    pub fn with_no_data(data: Array2<T>, no_data_value: f64) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(NO_DATA_VALUE.to_string(), no_data_value.into());
        Self::new(data, metadata)
    }

    pub fn metadata(&self) -> Option<&Arc<Metadata>> {
        self.metadata.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }

    /// Numeric `no_data_value` entry, if present.
    pub fn no_data_value(&self) -> Option<f64> {
        self.get(NO_DATA_VALUE).and_then(MetadataValue::as_f64)
    }

    /// Build a new array from this one, carrying the metadata over by reference.
    pub fn derive<U, F>(&self, f: F) -> MetadataArray<U>
    where
        F: FnOnce(&Array2<T>) -> Array2<U>,
    {
        MetadataArray {
            data: f(&self.data),
            metadata: self.metadata.clone(),
        }
    }

    pub fn slice<I>(&self, info: I) -> MetadataArray<T>
    where
        T: Clone,
        I: SliceArg<Ix2, OutDim = Ix2>,
    {
        self.derive(|a| a.slice(info).to_owned())
    }

    pub fn map<U, F>(&self, f: F) -> MetadataArray<U>
    where
        F: FnMut(&T) -> U,
    {
        self.derive(|a| a.map(f))
    }

    pub fn into_inner(self) -> Array2<T> {
        self.data
    }
}

impl<T> From<Array2<T>> for MetadataArray<T> {
    fn from(data: Array2<T>) -> Self {
        Self::plain(data)
    }
}

impl<T> Deref for MetadataArray<T> {
    type Target = Array2<T>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for MetadataArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

/// Array data paired with a boolean mask; `true` marks an invalid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray<T> {
    pub data: Array2<T>,
    pub mask: Array2<bool>,
}

impl<T> MaskedArray<T> {
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|m| !**m).count()
    }

    /// Copy of the data with every masked cell replaced by `fill`.
    pub fn filled(&self, fill: T) -> Array2<T>
    where
        T: Clone,
    {
        let mut out = self.data.clone();
        ndarray::Zip::from(&mut out)
            .and(&self.mask)
            .for_each(|v, &masked| {
                if masked {
                    *v = fill.clone();
                }
            });
        out
    }
}
