pub mod calendar;
pub mod config;
pub mod geojson;
pub mod holidays;
pub mod timeline;

pub use calendar::{HolidayOrigin, WorkCalendar, YearHolidays, working_days_between};
pub use config::{CombinerConfig, ConfigError};
pub use geojson::{CombineError, CombineReport, FeatureCollection, GeoJsonCombiner, Validation};
pub use holidays::{
    HolidaySource, HolidaySourceError, HolidayTable, HolidayTableError, NoHolidaySource,
    PhilippineHolidayRules,
};
pub use timeline::{ProgressUpdate, TimelineComparison, compare_timeline, is_delayed};
