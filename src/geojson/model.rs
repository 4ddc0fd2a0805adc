use super::names::canonical_region_name;
use super::reproject::is_web_mercator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegionFileError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid geojson: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("file name is not valid UTF-8")]
    InvalidFileName,
}

fn empty_coordinates() -> Value {
    Value::Array(Vec::new())
}

/// A geometry as found in source files. Coordinates stay untyped so any
/// nesting depth survives a pass-through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default = "empty_coordinates")]
    pub coordinates: Value,
}

impl Geometry {
    pub fn new(kind: impl Into<String>, coordinates: Value) -> Self {
        Self {
            kind: kind.into(),
            coordinates,
        }
    }

    pub fn is_line_string(&self) -> bool {
        self.kind == "LineString"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CrsProperties {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Crs {
    #[serde(default)]
    properties: Option<CrsProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceFeature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SourceCollection {
    #[serde(default)]
    crs: Option<Crs>,
    #[serde(default)]
    features: Vec<SourceFeature>,
}

/// One per-region input file.
#[derive(Debug, Clone)]
pub struct RegionFile {
    pub file_name: String,
    pub region_name: String,
    pub crs: Option<String>,
    pub features: Vec<SourceFeature>,
}

impl RegionFile {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, RegionFileError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(RegionFileError::InvalidFileName)?
            .to_string();
        let reader = BufReader::new(File::open(path)?);
        let collection: SourceCollection = serde_json::from_reader(reader)?;
        Ok(Self::from_parts(file_name, collection))
    }

    pub fn parse(file_name: &str, contents: &str) -> Result<Self, RegionFileError> {
        let collection: SourceCollection = serde_json::from_str(contents)?;
        Ok(Self::from_parts(file_name.to_string(), collection))
    }

    fn from_parts(file_name: String, collection: SourceCollection) -> Self {
        let crs = collection
            .crs
            .and_then(|crs| crs.properties)
            .and_then(|props| props.name);
        Self {
            region_name: canonical_region_name(&file_name),
            file_name,
            crs,
            features: collection.features,
        }
    }

    /// Whether coordinates are declared in Web Mercator metres.
    pub fn is_projected(&self) -> bool {
        self.crs.as_deref().is_some_and(is_web_mercator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
