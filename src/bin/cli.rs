use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use gistagum_tools::geojson::FileStatus;
use gistagum_tools::{
    CombinerConfig, GeoJsonCombiner, HolidayOrigin, HolidayTable, NoHolidaySource,
    ProgressUpdate, Validation, WorkCalendar, compare_timeline, is_delayed,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Project-monitoring utilities: working-day counts and barangay GeoJSON merging.
#[derive(Parser, Debug)]
#[command(name = "gistagum", version, about)]
struct Cli {
    /// JSON file of extra curated holidays, `{ "<year>": ["YYYY-MM-DD", ...] }`.
    #[arg(long, global = true, env = "GISTAGUM_HOLIDAYS")]
    holidays: Option<PathBuf>,

    /// Holiday source for years without a curated list.
    #[arg(long, global = true, value_enum, default_value_t = Fallback::Rules)]
    fallback: Fallback,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Fallback {
    /// Computed Philippine public holidays.
    Rules,
    /// Treat uncurated years as holiday-free.
    None,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count working days in an inclusive date range.
    WorkingDays {
        start: NaiveDate,
        end: NaiveDate,
        /// Print each working day as well.
        #[arg(long)]
        list: bool,
    },
    /// List the holidays resolved for a year.
    Holidays { year: i32 },
    /// Compare expected (working-day linear) and reported progress.
    Timeline {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        /// Defaults to the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Progress update as `YYYY-MM-DD=PERCENT`; repeatable.
        #[arg(long = "progress", value_parser = parse_progress)]
        progress: Vec<ProgressUpdate>,
    },
    /// Merge per-barangay GeoJSON files into one FeatureCollection.
    CombineGeojson(CombineArgs),
}

#[derive(clap::Args, Debug)]
struct CombineArgs {
    /// JSON combiner config; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, env = "GISTAGUM_COORD_DIR")]
    input_dir: Option<PathBuf>,
    #[arg(long, env = "GISTAGUM_COMBINED_OUTPUT")]
    output: Option<PathBuf>,
    /// Skip EPSG:3857 files instead of converting them.
    #[arg(long)]
    no_reproject: bool,
}

fn parse_progress(input: &str) -> Result<ProgressUpdate, String> {
    let (date, pct) = input
        .split_once('=')
        .ok_or_else(|| format!("expected YYYY-MM-DD=PERCENT, got '{input}'"))?;
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{date}': {e}"))?;
    let percentage = pct
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid percentage '{pct}': {e}"))?;
    Ok(ProgressUpdate::new(date, percentage))
}

fn build_calendar(cli: &Cli) -> anyhow::Result<WorkCalendar> {
    let mut calendar = match cli.fallback {
        Fallback::Rules => WorkCalendar::philippines(),
        Fallback::None => WorkCalendar::philippines().with_fallback(Box::new(NoHolidaySource)),
    };
    if let Some(path) = &cli.holidays {
        let extra = HolidayTable::load_json(path)
            .with_context(|| format!("loading holidays from {}", path.display()))?;
        calendar = calendar.with_curated(extra);
    }
    Ok(calendar)
}

fn print_holidays(calendar: &WorkCalendar, year: i32) {
    let resolved = calendar.holidays_for_year(year);
    let origin = match &resolved.origin {
        HolidayOrigin::Curated => "curated table".to_string(),
        HolidayOrigin::Fallback(source) => format!("fallback source '{source}'"),
        HolidayOrigin::Unresolved => "unresolved (no holidays applied)".to_string(),
    };
    println!("Holidays for {year} ({origin}): {}", resolved.dates.len());
    for date in &resolved.dates {
        println!("  {} {}", date, date.format("%a"));
    }
}

fn run_timeline(
    calendar: &WorkCalendar,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    progress: &[ProgressUpdate],
) -> anyhow::Result<()> {
    if end < start {
        bail!("end date {end} is before start date {start}");
    }
    let Some(cmp) = compare_timeline(calendar, start, end, today, progress) else {
        println!("No working days between {start} and {end}; nothing to compare.");
        return Ok(());
    };
    println!("Working days total : {}", cmp.total_days);
    println!("Working days elapsed: {}", cmp.elapsed_days);
    println!("Working days left  : {}", cmp.remaining_days);
    println!("Expected progress  : {:.2}%", cmp.expected_progress);
    println!("Actual progress    : {:.2}%", cmp.actual_progress);
    println!("Variance           : {:+.2}", cmp.progress_variance);
    let standing = if cmp.is_ahead {
        "ahead of schedule"
    } else if cmp.is_behind {
        "behind schedule"
    } else {
        "on track"
    };
    println!("Status             : {standing}");
    let latest = progress.iter().max_by_key(|u| u.date).map(|u| u.percentage);
    if is_delayed(Some(end), latest, today) {
        println!("Project is overdue and should be marked delayed.");
    }
    for ((date, expected), actual) in cmp
        .expected_dates
        .iter()
        .zip(&cmp.expected_progress_data)
        .zip(&cmp.actual_progress_aligned)
    {
        println!("  {date}  expected {expected:>6.2}%  actual {actual:>6.2}%");
    }
    Ok(())
}

fn run_combine(args: CombineArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => CombinerConfig::load_json(path)
            .with_context(|| format!("loading combiner config from {}", path.display()))?,
        None => CombinerConfig::default(),
    };
    if let Some(dir) = args.input_dir {
        config.input_dir = dir;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }
    if args.no_reproject {
        config.reproject = false;
    }
    config.validate()?;

    let combiner = GeoJsonCombiner::from_config(config);
    let report = combiner.run()?;

    for file in &report.files {
        match &file.status {
            FileStatus::Processed {
                features,
                skipped_features,
            } => println!(
                "Processed: {} -> {} ({} features, {} skipped)",
                file.file_name,
                file.region_name.as_deref().unwrap_or_default(),
                features,
                skipped_features
            ),
            FileStatus::Skipped { reason } => println!("Skipped: {} ({})", file.file_name, reason),
            FileStatus::Failed { error } => {
                println!("Error processing {}: {}", file.file_name, error)
            }
        }
    }

    let rule = "=".repeat(60);
    println!();
    println!("{rule}");
    println!("Combined GeoJSON files");
    println!("Output: {}", report.output_path.display());
    println!("Total features: {}", report.total_features);
    println!("Processed files: {}", report.processed_count());
    println!("Skipped files: {}", report.skipped_count());
    println!("Error files: {}", report.error_count());
    if report.skipped_features() > 0 {
        println!("Skipped features: {}", report.skipped_features());
    }
    println!("{rule}");

    match &report.validation {
        Validation::Valid { .. } => {
            println!("Output file is valid GeoJSON");
            Ok(())
        }
        Validation::Invalid { reason } => {
            println!("Output file validation failed: {reason}");
            bail!("output validation failed")
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let calendar = build_calendar(&cli)?;
    tracing::debug!(?calendar, "calendar ready");

    match cli.command {
        Commands::WorkingDays { start, end, list } => {
            println!("{}", calendar.working_days_between(start, end));
            if list && end >= start {
                for day in calendar.working_days_in_range(start, end) {
                    println!("  {day}");
                }
            }
        }
        Commands::Holidays { year } => print_holidays(&calendar, year),
        Commands::Timeline {
            start,
            end,
            today,
            progress,
        } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            run_timeline(&calendar, start, end, today, &progress)?;
        }
        Commands::CombineGeojson(args) => run_combine(args)?,
    }
    Ok(())
}
