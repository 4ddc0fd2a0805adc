use crate::calendar::WorkCalendar;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Progress below this percentage still counts as unfinished for overdue checks.
pub const COMPLETION_THRESHOLD: f64 = 99.0;

/// Variance (percentage points) below which a project is flagged as behind.
pub const BEHIND_TOLERANCE: f64 = -5.0;

const SAMPLE_INTERVAL_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub date: NaiveDate,
    pub percentage: f64,
}

impl ProgressUpdate {
    pub fn new(date: NaiveDate, percentage: f64) -> Self {
        Self { date, percentage }
    }
}

/// Expected (linear over working days) versus reported progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineComparison {
    pub expected_progress: f64,
    pub actual_progress: f64,
    pub progress_variance: f64,
    pub elapsed_days: i64,
    pub total_days: i64,
    pub remaining_days: i64,
    pub is_ahead: bool,
    pub is_behind: bool,
    pub expected_dates: Vec<NaiveDate>,
    pub expected_progress_data: Vec<f64>,
    pub actual_progress_aligned: Vec<f64>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn expected_percentage(elapsed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (elapsed as f64 / total as f64 * 100.0).min(100.0)
}

/// Compare a project's reported progress against a linear working-day plan.
///
/// Returns `None` when the project window holds no working days.
pub fn compare_timeline(
    calendar: &WorkCalendar,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    updates: &[ProgressUpdate],
) -> Option<TimelineComparison> {
    let total_days = calendar.working_days_between(start, end);
    if total_days <= 0 {
        return None;
    }

    let elapsed_days = if today >= start {
        calendar.working_days_between(start, today.min(end))
    } else {
        0
    };
    let remaining_days = if today <= end {
        calendar.working_days_between(today, end)
    } else {
        0
    };

    let mut updates = updates.to_vec();
    updates.sort_by_key(|u| u.date);

    let expected_progress = expected_percentage(elapsed_days, total_days);
    let actual_progress = updates.last().map(|u| u.percentage).unwrap_or(0.0);
    let progress_variance = actual_progress - expected_progress;

    let mut sample_dates: BTreeSet<NaiveDate> = updates.iter().map(|u| u.date).collect();
    let mut current = start;
    while current <= end && current <= today {
        sample_dates.insert(current);
        let Some(next) = current.checked_add_signed(Duration::days(SAMPLE_INTERVAL_DAYS)) else {
            break;
        };
        current = next;
    }

    let mut expected_progress_data = Vec::with_capacity(sample_dates.len());
    let mut actual_progress_aligned = Vec::with_capacity(sample_dates.len());
    for date in &sample_dates {
        let elapsed = if *date >= start {
            calendar.working_days_between(start, *date)
        } else {
            0
        };
        expected_progress_data.push(expected_percentage(elapsed, total_days));
        let actual = updates
            .iter()
            .take_while(|u| u.date <= *date)
            .last()
            .map(|u| u.percentage)
            .unwrap_or(0.0);
        actual_progress_aligned.push(actual);
    }

    Some(TimelineComparison {
        expected_progress: round2(expected_progress),
        actual_progress,
        progress_variance: round2(progress_variance),
        elapsed_days,
        total_days,
        remaining_days,
        is_ahead: progress_variance > 0.0,
        is_behind: progress_variance < BEHIND_TOLERANCE,
        expected_dates: sample_dates.into_iter().collect(),
        expected_progress_data,
        actual_progress_aligned,
    })
}

/// A project is delayed once its end date has passed without reaching completion.
pub fn is_delayed(end: Option<NaiveDate>, latest_progress: Option<f64>, today: NaiveDate) -> bool {
    let progress = latest_progress.unwrap_or(0.0).trunc();
    match end {
        Some(end) => progress < COMPLETION_THRESHOLD && end < today,
        None => false,
    }
}
