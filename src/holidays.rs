use chrono::{Datelike, Duration, NaiveDate, Weekday};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HolidayTableError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("holiday {date} listed under year {year}")]
    YearMismatch { year: i32, date: NaiveDate },
}

pub type HolidayTableResult<T> = Result<T, HolidayTableError>;

/// Curated holidays keyed by year.
///
/// Serialized as `{ "2026": ["2026-01-01", ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayTable {
    years: BTreeMap<i32, BTreeSet<NaiveDate>>,
}

// Official list for government employees, Proclamation No. 1006 s. 2025.
// Eid'l Fitr (Apr 1) and Eid'l Adha (Jun 6) are left out until their dates
// are confirmed, so they are not deducted from standardized counts.
const PH_2026: [(u32, u32); 20] = [
    // Regular holidays
    (1, 1),   // New Year's Day
    (4, 2),   // Maundy Thursday
    (4, 3),   // Good Friday
    (4, 9),   // Araw ng Kagitingan
    (5, 1),   // Labor Day
    (6, 12),  // Independence Day
    (8, 31),  // National Heroes Day
    (11, 30), // Bonifacio Day
    (12, 25), // Christmas Day
    (12, 30), // Rizal Day
    // Special non-working days
    (2, 17),  // Chinese New Year
    (4, 4),   // Black Saturday
    (5, 12),  // National Election Day
    (8, 21),  // Ninoy Aquino Day
    (10, 31), // All Souls' Day (special non-working)
    (11, 1),  // All Saints' Day
    (11, 2),  // All Souls' Day (additional special day)
    (12, 8),  // Feast of the Immaculate Conception
    (12, 24), // Christmas Eve
    (12, 31), // Last Day of the Year
];

lazy_static! {
    static ref PHILIPPINE_HOLIDAYS: HolidayTable = {
        let mut table = HolidayTable::new();
        table.years.insert(
            2026,
            PH_2026
                .iter()
                .filter_map(|&(month, day)| NaiveDate::from_ymd_opt(2026, month, day))
                .collect(),
        );
        table
    };
}

impl HolidayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The curated Philippine table shipped with the crate.
    pub fn philippines() -> &'static HolidayTable {
        &PHILIPPINE_HOLIDAYS
    }

    /// Replace the holidays for `year`. Every date must fall inside that year.
    pub fn insert_year<I>(&mut self, year: i32, dates: I) -> HolidayTableResult<()>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();
        if let Some(date) = dates.iter().find(|d| d.year() != year) {
            return Err(HolidayTableError::YearMismatch { year, date: *date });
        }
        self.years.insert(year, dates);
        Ok(())
    }

    /// Overlay `other` onto this table; years present in both take `other`'s list.
    pub fn merge(&mut self, other: HolidayTable) {
        self.years.extend(other.years);
    }

    pub fn get(&self, year: i32) -> Option<&BTreeSet<NaiveDate>> {
        self.years.get(&year)
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    fn validate(&self) -> HolidayTableResult<()> {
        for (year, dates) in &self.years {
            if let Some(date) = dates.iter().find(|d| d.year() != *year) {
                return Err(HolidayTableError::YearMismatch {
                    year: *year,
                    date: *date,
                });
            }
        }
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> HolidayTableResult<Self> {
        let file = File::open(path)?;
        let table: HolidayTable = serde_json::from_reader(file)?;
        table.validate()?;
        Ok(table)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> HolidayTableResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum HolidaySourceError {
    #[error("holiday source '{0}' is not available")]
    Unavailable(String),
    #[error("no holiday data for year {0}")]
    UnsupportedYear(i32),
}

/// Holiday data for years the curated table does not cover.
pub trait HolidaySource: Send + Sync {
    fn name(&self) -> &str;

    fn holidays_for_year(&self, year: i32) -> Result<BTreeSet<NaiveDate>, HolidaySourceError>;
}

/// Computed Philippine public holidays.
///
/// Covers fixed-date regular holidays, the Holy Week days derived from
/// Easter, National Heroes Day (last Monday of August) and the fixed
/// special non-working days. Lunar and Islamic holidays are not included.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhilippineHolidayRules;

impl PhilippineHolidayRules {
    const FIXED: [(u32, u32); 13] = [
        (1, 1),
        (4, 9),
        (5, 1),
        (6, 12),
        (8, 21),
        (11, 1),
        (11, 2),
        (11, 30),
        (12, 8),
        (12, 24),
        (12, 25),
        (12, 30),
        (12, 31),
    ];

    /// Last occurrence of `weekday` in the month
    fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
        let first_of_next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        let mut date = first_of_next - Duration::days(1);
        while date.weekday() != weekday {
            date = date - Duration::days(1);
        }
        Some(date)
    }
}

impl HolidaySource for PhilippineHolidayRules {
    fn name(&self) -> &str {
        "philippine-rules"
    }

    fn holidays_for_year(&self, year: i32) -> Result<BTreeSet<NaiveDate>, HolidaySourceError> {
        let mut holidays: BTreeSet<NaiveDate> = Self::FIXED
            .iter()
            .filter_map(|&(month, day)| NaiveDate::from_ymd_opt(year, month, day))
            .collect();

        let easter = bdays::easter::easter_naive_date(year)
            .map_err(|_| HolidaySourceError::UnsupportedYear(year))?;
        // Maundy Thursday, Good Friday, Black Saturday
        for offset in [3, 2, 1] {
            holidays.insert(easter - Duration::days(offset));
        }

        let heroes_day = Self::last_weekday(year, 8, Weekday::Mon)
            .ok_or(HolidaySourceError::UnsupportedYear(year))?;
        holidays.insert(heroes_day);

        Ok(holidays)
    }
}

/// Stand-in used when no external holiday data is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidaySource;

impl HolidaySource for NoHolidaySource {
    fn name(&self) -> &str {
        "none"
    }

    fn holidays_for_year(&self, _year: i32) -> Result<BTreeSet<NaiveDate>, HolidaySourceError> {
        Err(HolidaySourceError::Unavailable(self.name().to_string()))
    }
}
