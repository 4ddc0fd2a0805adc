use super::model::{Feature, FeatureCollection, FeatureProperties, RegionFile, RegionFileError};
use super::reproject::{
    NoReprojection, ReprojectError, Reprojector, WebMercatorToWgs84, reproject_geometry,
};
use crate::config::CombinerConfig;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CombineError {
    #[error("cannot read input directory {}: {source}", path.display())]
    InputDir { path: PathBuf, source: io::Error },
    #[error("error writing output file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("error serializing combined collection: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CombineResult<T> = Result<T, CombineError>;

#[derive(Debug, Error)]
enum FileError {
    #[error(transparent)]
    Read(#[from] RegionFileError),
    #[error(transparent)]
    Reproject(#[from] ReprojectError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    Processed {
        features: usize,
        skipped_features: usize,
    },
    Skipped {
        reason: String,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub file_name: String,
    pub region_name: Option<String>,
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid { features: usize },
    Invalid { reason: String },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombineReport {
    pub output_path: PathBuf,
    pub files: Vec<FileOutcome>,
    pub total_features: usize,
    pub validation: Validation,
}

impl CombineReport {
    pub fn processed_count(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Processed { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Skipped { .. }))
    }

    pub fn error_count(&self) -> usize {
        self.count(|s| matches!(s, FileStatus::Failed { .. }))
    }

    pub fn skipped_features(&self) -> usize {
        self.files
            .iter()
            .map(|f| match f.status {
                FileStatus::Processed {
                    skipped_features, ..
                } => skipped_features,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

/// Merges per-barangay GeoJSON files into a single FeatureCollection.
pub struct GeoJsonCombiner {
    config: CombinerConfig,
    reprojector: Box<dyn Reprojector>,
}

impl GeoJsonCombiner {
    pub fn new(config: CombinerConfig, reprojector: Box<dyn Reprojector>) -> Self {
        Self {
            config,
            reprojector,
        }
    }

    /// Picks the Web Mercator reprojector unless the config disables reprojection.
    pub fn from_config(config: CombinerConfig) -> Self {
        let reprojector: Box<dyn Reprojector> = if config.reproject {
            Box::new(WebMercatorToWgs84)
        } else {
            Box::new(NoReprojection)
        };
        Self::new(config, reprojector)
    }

    pub fn config(&self) -> &CombinerConfig {
        &self.config
    }

    /// Input files in the configured directory, sorted by file name.
    pub fn input_files(&self) -> CombineResult<Vec<PathBuf>> {
        let input_dir = &self.config.input_dir;
        let entries = fs::read_dir(input_dir).map_err(|source| CombineError::InputDir {
            path: input_dir.clone(),
            source,
        })?;
        let extension = self.config.normalized_extension();
        let output = fs::canonicalize(&self.config.output_path).ok();

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CombineError::InputDir {
                path: input_dir.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            if output.is_some() && fs::canonicalize(&path).ok() == output {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }

    /// Build the combined collection in memory without touching the output file.
    pub fn combine(&self) -> CombineResult<(FeatureCollection, Vec<FileOutcome>)> {
        let mut collection = FeatureCollection::default();
        let mut outcomes = Vec::new();
        let mut next_id: u64 = 1;

        for path in self.input_files()? {
            let display_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match self.process_file(&path, &mut next_id) {
                Ok((region, features, status)) => {
                    collection.features.extend(features);
                    outcomes.push(FileOutcome {
                        file_name: region.file_name,
                        region_name: Some(region.region_name),
                        status,
                    });
                }
                Err(err) => {
                    tracing::error!(file = %display_name, error = %err, "error processing file");
                    outcomes.push(FileOutcome {
                        file_name: display_name,
                        region_name: None,
                        status: FileStatus::Failed {
                            error: err.to_string(),
                        },
                    });
                }
            }
        }

        Ok((collection, outcomes))
    }

    /// Features from one file. Ids are only consumed once the whole file succeeds.
    fn process_file(
        &self,
        path: &Path,
        next_id: &mut u64,
    ) -> Result<(RegionFile, Vec<Feature>, FileStatus), FileError> {
        let region = RegionFile::read(path)?;
        let file = region.file_name.as_str();

        if region.features.is_empty() {
            tracing::warn!(file, "no features found");
            let status = FileStatus::Skipped {
                reason: "no features found".to_string(),
            };
            return Ok((region, Vec::new(), status));
        }

        let projected = region.is_projected();
        if projected && !self.reprojector.is_available() {
            tracing::warn!(file, "EPSG:3857 input requires reprojection; skipping file");
            let status = FileStatus::Skipped {
                reason: "EPSG:3857 conversion unavailable".to_string(),
            };
            return Ok((region, Vec::new(), status));
        }
        if projected {
            tracing::info!(file, reprojector = self.reprojector.name(), "converting to WGS84");
        }

        let mut features = Vec::with_capacity(region.features.len());
        let mut skipped_features = 0;
        let mut id = *next_id;
        for source in &region.features {
            let Some(geometry) = &source.geometry else {
                tracing::warn!(file, "skipping feature without geometry");
                skipped_features += 1;
                continue;
            };
            if geometry.is_line_string() {
                tracing::warn!(file, "skipping LineString; only Polygon geometry is accepted");
                skipped_features += 1;
                continue;
            }
            let geometry = if projected {
                reproject_geometry(geometry, self.reprojector.as_ref())?
            } else {
                geometry.clone()
            };
            features.push(Feature {
                properties: FeatureProperties {
                    id,
                    name: region.region_name.clone(),
                },
                geometry,
            });
            id += 1;
        }
        *next_id = id;

        tracing::info!(
            file,
            region = %region.region_name,
            features = features.len(),
            "processed"
        );
        let status = FileStatus::Processed {
            features: features.len(),
            skipped_features,
        };
        Ok((region, features, status))
    }

    /// Combine, write the output file and validate what was written.
    pub fn run(&self) -> CombineResult<CombineReport> {
        let (collection, files) = self.combine()?;
        let output_path = self.config.output_path.clone();

        write_collection(&collection, &output_path)?;
        let validation = validate_output(&output_path);
        match &validation {
            Validation::Valid { features } => tracing::info!(
                path = %output_path.display(),
                features,
                "output file is valid GeoJSON"
            ),
            Validation::Invalid { reason } => tracing::error!(
                path = %output_path.display(),
                reason = %reason,
                "output file validation failed"
            ),
        }

        Ok(CombineReport {
            output_path,
            total_features: collection.len(),
            files,
            validation,
        })
    }
}

/// Serialize `collection` to `path`, creating parent directories and replacing any previous file.
pub fn write_collection(collection: &FeatureCollection, path: &Path) -> CombineResult<()> {
    let write_err = |source: io::Error| CombineError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    // Encode first; only I/O failures below map to `Write`
    let bytes = serde_json::to_vec_pretty(collection)?;
    let mut file = File::create(path).map_err(write_err)?;
    file.write_all(&bytes).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    Ok(())
}

#[derive(Deserialize)]
struct OutputProbe {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    features: Vec<serde_json::Value>,
}

/// Re-read a written collection and check its type and feature count.
pub fn validate_output(path: &Path) -> Validation {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            return Validation::Invalid {
                reason: err.to_string(),
            };
        }
    };
    let probe: OutputProbe = match serde_json::from_reader(BufReader::new(file)) {
        Ok(probe) => probe,
        Err(err) => {
            return Validation::Invalid {
                reason: err.to_string(),
            };
        }
    };

    if probe.kind.as_deref() != Some("FeatureCollection") {
        return Validation::Invalid {
            reason: format!(
                "top-level type is {:?}, expected \"FeatureCollection\"",
                probe.kind.unwrap_or_default()
            ),
        };
    }
    if probe.features.is_empty() {
        return Validation::Invalid {
            reason: "collection contains no features".to_string(),
        };
    }
    Validation::Valid {
        features: probe.features.len(),
    }
}
