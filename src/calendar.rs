use crate::holidays::{HolidaySource, HolidayTable, NoHolidaySource, PhilippineHolidayRules};
use chrono::{Datelike, NaiveDate, Weekday};
use lazy_static::lazy_static;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

lazy_static! {
    static ref DEFAULT_CALENDAR: WorkCalendar = WorkCalendar::philippines();
}

/// Count working days in `[start, end]` using the default Philippine calendar.
///
/// Returns 0 when either date is missing or `end` precedes `start`.
pub fn working_days_between(
    start: impl Into<Option<NaiveDate>>,
    end: impl Into<Option<NaiveDate>>,
) -> i64 {
    DEFAULT_CALENDAR.working_days_between(start, end)
}

/// Where the holidays for a year came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidayOrigin {
    Curated,
    Fallback(String),
    /// The fallback source failed; the year is treated as holiday-free.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearHolidays {
    pub year: i32,
    pub origin: HolidayOrigin,
    pub dates: BTreeSet<NaiveDate>,
}

pub struct WorkCalendar {
    table: Cow<'static, HolidayTable>,
    fallback: Box<dyn HolidaySource>,
    non_working_days: HashSet<Weekday>,
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::philippines()
    }
}

impl fmt::Debug for WorkCalendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkCalendar")
            .field("curated_years", &self.table.years().collect::<Vec<_>>())
            .field("fallback", &self.fallback.name())
            .field("non_working_days", &self.non_working_days)
            .finish()
    }
}

impl WorkCalendar {
    /// Curated Philippine table with computed holidays for other years.
    pub fn philippines() -> Self {
        Self {
            table: Cow::Borrowed(HolidayTable::philippines()),
            fallback: Box::new(PhilippineHolidayRules),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }

    pub fn new(table: HolidayTable, fallback: Box<dyn HolidaySource>) -> Self {
        Self {
            table: Cow::Owned(table),
            fallback,
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
        }
    }

    /// Weekends only; every year is resolved through a source that is never available.
    pub fn weekends_only() -> Self {
        Self::new(HolidayTable::new(), Box::new(NoHolidaySource))
    }

    pub fn with_fallback(mut self, fallback: Box<dyn HolidaySource>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Overlay extra curated years on top of the current table.
    pub fn with_curated(mut self, extra: HolidayTable) -> Self {
        self.table.to_mut().merge(extra);
        self
    }

    pub fn table(&self) -> &HolidayTable {
        &self.table
    }

    pub fn fallback_name(&self) -> &str {
        self.fallback.name()
    }

    /// Resolve the holidays for one year: curated table first, then the fallback source.
    pub fn holidays_for_year(&self, year: i32) -> YearHolidays {
        if let Some(dates) = self.table.get(year) {
            return YearHolidays {
                year,
                origin: HolidayOrigin::Curated,
                dates: dates.clone(),
            };
        }
        match self.fallback.holidays_for_year(year) {
            Ok(dates) => YearHolidays {
                year,
                origin: HolidayOrigin::Fallback(self.fallback.name().to_string()),
                dates,
            },
            Err(err) => {
                tracing::debug!(
                    year,
                    source = self.fallback.name(),
                    error = %err,
                    "holiday lookup failed; treating year as holiday-free"
                );
                YearHolidays {
                    year,
                    origin: HolidayOrigin::Unresolved,
                    dates: BTreeSet::new(),
                }
            }
        }
    }

    /// All holidays falling inside `[start, end]`.
    pub fn holidays_in_range(&self, start: NaiveDate, end: NaiveDate) -> HashSet<NaiveDate> {
        if end < start {
            return HashSet::new();
        }
        (start.year()..=end.year())
            .flat_map(|year| self.holidays_for_year(year).dates)
            .filter(|d| *d >= start && *d <= end)
            .collect()
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.non_working_days.contains(&date.weekday())
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays_for_year(date.year()).dates.contains(&date)
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_weekend(date) && !self.is_holiday(date)
    }

    /// Count working days in `[start, end]`, both ends inclusive.
    pub fn working_days_between(
        &self,
        start: impl Into<Option<NaiveDate>>,
        end: impl Into<Option<NaiveDate>>,
    ) -> i64 {
        let (Some(start), Some(end)) = (start.into(), end.into()) else {
            return 0;
        };
        if end < start {
            return 0;
        }

        let holidays = self.holidays_in_range(start, end);
        let mut count = 0;
        let mut current = start;
        while current <= end {
            if !self.is_weekend(current) && !holidays.contains(&current) {
                count += 1;
            }
            // `end` may be the last representable date
            let Some(next) = current.succ_opt() else {
                break;
            };
            current = next;
        }
        count
    }

    /// Working days in `[start, end]` as a list.
    pub fn working_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let holidays = self.holidays_in_range(start, end);
        let mut days = Vec::new();
        let mut current = start;
        while current <= end {
            if !self.is_weekend(current) && !holidays.contains(&current) {
                days.push(current);
            }
            let Some(next) = current.succ_opt() else {
                break;
            };
            current = next;
        }
        days
    }
}
