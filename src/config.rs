use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for the barangay GeoJSON combiner.
///
/// Missing keys in a JSON config file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinerConfig {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    /// File extension (without the dot) of the files to merge.
    pub extension: String,
    /// Convert EPSG:3857 input to WGS84. When off, projected files are skipped.
    pub reproject: bool,
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("coord"),
            output_path: PathBuf::from("static/data/tagum_barangays.geojson"),
            extension: "geojson".to_string(),
            reproject: true,
        }
    }
}

impl CombinerConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: CombinerConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let extension = self.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(ConfigError::Invalid("extension must not be empty".into()));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_path must not be empty".into()));
        }
        Ok(())
    }

    pub(crate) fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}
