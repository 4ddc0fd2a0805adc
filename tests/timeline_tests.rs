use chrono::NaiveDate;
use gistagum_tools::calendar::WorkCalendar;
use gistagum_tools::timeline::{ProgressUpdate, compare_timeline, is_delayed};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn no_working_days_means_no_comparison() {
    let cal = WorkCalendar::philippines();
    // A weekend only
    assert!(compare_timeline(&cal, d(2026, 1, 10), d(2026, 1, 11), d(2026, 1, 10), &[]).is_none());
}

#[test]
fn halfway_through_project_expects_half() {
    let cal = WorkCalendar::philippines();
    // Two holiday-free weeks: Mon 2026-01-05 .. Fri 2026-01-16 = 10 working days
    let start = d(2026, 1, 5);
    let end = d(2026, 1, 16);
    let today = d(2026, 1, 9);
    let updates = [ProgressUpdate::new(d(2026, 1, 9), 60.0)];

    let cmp = compare_timeline(&cal, start, end, today, &updates).unwrap();
    assert_eq!(cmp.total_days, 10);
    assert_eq!(cmp.elapsed_days, 5);
    assert_eq!(cmp.remaining_days, 6);
    assert_eq!(cmp.expected_progress, 50.0);
    assert_eq!(cmp.actual_progress, 60.0);
    assert_eq!(cmp.progress_variance, 10.0);
    assert!(cmp.is_ahead);
    assert!(!cmp.is_behind);
}

#[test]
fn behind_requires_more_than_five_points() {
    let cal = WorkCalendar::philippines();
    let start = d(2026, 1, 5);
    let end = d(2026, 1, 16);
    let today = d(2026, 1, 9);

    let slightly = compare_timeline(&cal, start, end, today, &[ProgressUpdate::new(today, 46.0)])
        .unwrap();
    assert!(!slightly.is_ahead);
    assert!(!slightly.is_behind);

    let far = compare_timeline(&cal, start, end, today, &[ProgressUpdate::new(today, 30.0)])
        .unwrap();
    assert!(far.is_behind);
}

#[test]
fn before_start_nothing_is_elapsed() {
    let cal = WorkCalendar::philippines();
    let cmp = compare_timeline(&cal, d(2026, 1, 5), d(2026, 1, 16), d(2026, 1, 2), &[]).unwrap();
    assert_eq!(cmp.elapsed_days, 0);
    assert_eq!(cmp.expected_progress, 0.0);
    assert_eq!(cmp.actual_progress, 0.0);
    assert!(cmp.expected_dates.is_empty());
}

#[test]
fn after_end_expected_is_capped() {
    let cal = WorkCalendar::philippines();
    let cmp = compare_timeline(&cal, d(2026, 1, 5), d(2026, 1, 16), d(2026, 2, 1), &[]).unwrap();
    assert_eq!(cmp.elapsed_days, 10);
    assert_eq!(cmp.remaining_days, 0);
    assert_eq!(cmp.expected_progress, 100.0);
    assert!(cmp.is_behind);
}

#[test]
fn chart_series_merge_weekly_samples_and_updates() {
    let cal = WorkCalendar::philippines();
    let start = d(2026, 1, 5);
    let end = d(2026, 1, 30);
    let today = d(2026, 1, 21);
    // Deliberately out of order
    let updates = [
        ProgressUpdate::new(d(2026, 1, 15), 40.0),
        ProgressUpdate::new(d(2026, 1, 8), 10.0),
    ];

    let cmp = compare_timeline(&cal, start, end, today, &updates).unwrap();
    assert_eq!(
        cmp.expected_dates,
        vec![
            d(2026, 1, 5),
            d(2026, 1, 8),
            d(2026, 1, 12),
            d(2026, 1, 15),
            d(2026, 1, 19),
        ]
    );
    assert_eq!(cmp.actual_progress_aligned, vec![0.0, 10.0, 10.0, 40.0, 40.0]);
    assert_eq!(cmp.expected_progress_data.len(), cmp.expected_dates.len());
    // Latest update wins regardless of input order
    assert_eq!(cmp.actual_progress, 40.0);
    // 2026-01-05 is the first of 20 working days
    assert_eq!(cmp.expected_progress_data[0], 5.0);
}

#[test]
fn delayed_when_overdue_and_unfinished() {
    let today = d(2026, 3, 1);
    assert!(is_delayed(Some(d(2026, 2, 27)), Some(80.0), today));
    assert!(is_delayed(Some(d(2026, 2, 27)), None, today));
    // 99.5 truncates to 99 and counts as finished
    assert!(!is_delayed(Some(d(2026, 2, 27)), Some(99.5), today));
    assert!(!is_delayed(Some(d(2026, 3, 1)), Some(10.0), today));
    assert!(!is_delayed(None, Some(10.0), today));
}

#[test]
fn weekly_samples_stop_at_last_representable_date() {
    let cal = WorkCalendar::weekends_only();
    let end = NaiveDate::MAX;
    let start = end - chrono::Duration::days(4);

    let cmp = compare_timeline(&cal, start, end, end, &[]).unwrap();
    assert_eq!(cmp.expected_dates, vec![start]);
    assert_eq!(cmp.elapsed_days, cmp.total_days);
    assert_eq!(cmp.expected_progress, 100.0);
}
