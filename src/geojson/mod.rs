pub mod combiner;
pub mod model;
pub mod names;
pub mod reproject;

pub use combiner::{
    CombineError, CombineReport, FileOutcome, FileStatus, GeoJsonCombiner, Validation,
    validate_output, write_collection,
};
pub use model::{
    Feature, FeatureCollection, FeatureProperties, Geometry, RegionFile, RegionFileError,
};
pub use names::canonical_region_name;
pub use reproject::{
    NoReprojection, ReprojectError, Reprojector, WebMercatorToWgs84, reproject_geometry,
};
