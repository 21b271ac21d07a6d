//! Wellness CLI - Command-line interface for wellness metrics
//!
//! Commands:
//! - metrics: Derive display metrics for sleep entries or check-ins
//! - insights: Summarize a window of entries and check-ins
//! - validate: Validate raw records
//! - format: Run the calculator on ad-hoc values
//! - palette: Print the mood color table
//! - doctor: Diagnose configuration and state files

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use wellness_metrics::duration::{compute_duration, format_duration};
use wellness_metrics::rating::{MOOD_PALETTE, NEUTRAL_COLOR};
use wellness_metrics::schema::{MoodCheckinRecord, Record, RecordAdapter, SleepEntryRecord, ValidationResult};
use wellness_metrics::types::{
    EnergyCategory, Insights, MoodCategory, RatingScore, SleepInterval, SleepRecommendation,
};
use wellness_metrics::{
    format_12_hour, mood_color, parse_clock_time, InsightConfig, MetricsError, MetricsProcessor,
    METRICS_VERSION, PRODUCER_NAME,
};

/// Wellness - sleep, mood and energy metrics
#[derive(Parser)]
#[command(name = "wellness")]
#[command(version = METRICS_VERSION)]
#[command(about = "Turn logged sleep and mood records into display metrics", long_about = None)]
struct Cli {
    /// Log level for diagnostics on stderr (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive display metrics for records
    Metrics {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Kind of records in the input
        #[arg(long, default_value = "entries")]
        kind: RecordKind,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        #[command(flatten)]
        window: WindowArgs,

        /// Include insights for the window in the output
        #[arg(long)]
        with_insights: bool,
    },

    /// Summarize entries (and optionally check-ins) over the insights window
    Insights {
        /// Sleep entries file (use - for stdin)
        #[arg(short, long)]
        entries: PathBuf,

        /// Check-ins file
        #[arg(short, long)]
        checkins: Option<PathBuf>,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        #[command(flatten)]
        window: WindowArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate raw records
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Kind of records in the input
        #[arg(long, default_value = "entries")]
        kind: RecordKind,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the calculator on ad-hoc values
    Format {
        /// Bed time (HH:MM)
        #[arg(long)]
        bed: Option<String>,

        /// Wake time (HH:MM)
        #[arg(long)]
        wake: Option<String>,

        /// Mood score (1-10)
        #[arg(long, allow_hyphen_values = true)]
        mood: Option<i64>,

        /// Energy score (1-10)
        #[arg(long, allow_hyphen_values = true)]
        energy: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the mood color table
    Palette {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and state files
    Doctor {
        /// Insights config file to check
        #[arg(long)]
        config: Option<PathBuf>,

        /// State file to check
        #[arg(long)]
        state: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct WindowArgs {
    /// Insights config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of nights kept in the insights window
    #[arg(long)]
    window_days: Option<usize>,

    /// Load insights state from file
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Save insights state to file after processing
    #[arg(long)]
    save_state: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RecordKind {
    /// Nightly sleep entries
    Entries,
    /// Mood/energy check-ins
    Checkins,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Newline-delimited JSON (one metrics object per line)
    Ndjson,
    /// Report as compact JSON
    Json,
    /// Report as pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(format!("wellness_metrics={level},wellness={level}")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    // stdout carries command output, so diagnostics go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliFailure> {
    match cli.command {
        Commands::Metrics {
            input,
            output,
            kind,
            input_format,
            output_format,
            window,
            with_insights,
        } => cmd_metrics(
            &input,
            &output,
            kind,
            &input_format,
            &output_format,
            &window,
            with_insights,
        ),

        Commands::Insights {
            entries,
            checkins,
            input_format,
            window,
            json,
        } => cmd_insights(&entries, checkins.as_deref(), &input_format, &window, json),

        Commands::Validate {
            input,
            kind,
            input_format,
            json,
        } => cmd_validate(&input, kind, &input_format, json),

        Commands::Format {
            bed,
            wake,
            mood,
            energy,
            json,
        } => cmd_format(bed.as_deref(), wake.as_deref(), mood, energy, json),

        Commands::Palette { json } => cmd_palette(json),

        Commands::Doctor {
            config,
            state,
            json,
        } => cmd_doctor(config.as_deref(), state.as_deref(), json),
    }
}

fn cmd_metrics(
    input: &Path,
    output: &Path,
    kind: RecordKind,
    input_format: &InputFormat,
    output_format: &OutputFormat,
    window: &WindowArgs,
    with_insights: bool,
) -> Result<(), CliFailure> {
    let input_data = read_input(input)?;
    let mut processor = build_processor(window)?;

    let (entries, checkins) = match kind {
        RecordKind::Entries => {
            let records: Vec<SleepEntryRecord> = parse_records(&input_data, input_format)?;
            if records.is_empty() {
                return Err(CliFailure::NoRecords);
            }
            (processor.process_entries(&records)?, Vec::new())
        }
        RecordKind::Checkins => {
            let records: Vec<MoodCheckinRecord> = parse_records(&input_data, input_format)?;
            if records.is_empty() {
                return Err(CliFailure::NoRecords);
            }
            (Vec::new(), processor.process_checkins(&records)?)
        }
    };

    save_state(&processor, window)?;

    let output_data = match output_format {
        OutputFormat::Ndjson => {
            let mut lines: Vec<String> = Vec::new();
            for entry in &entries {
                lines.push(serde_json::to_string(entry)?);
            }
            for checkin in &checkins {
                lines.push(serde_json::to_string(checkin)?);
            }
            if with_insights {
                lines.push(serde_json::to_string(&serde_json::json!({
                    "insights": processor.insights()
                }))?);
            }
            lines.join("\n") + "\n"
        }
        OutputFormat::Json => {
            serde_json::to_string(&processor.report(entries, checkins, with_insights))?
        }
        OutputFormat::JsonPretty => {
            serde_json::to_string_pretty(&processor.report(entries, checkins, with_insights))?
        }
    };

    write_output(output, &output_data)
}

fn cmd_insights(
    entries: &Path,
    checkins: Option<&Path>,
    input_format: &InputFormat,
    window: &WindowArgs,
    json: bool,
) -> Result<(), CliFailure> {
    let mut processor = build_processor(window)?;

    let records: Vec<SleepEntryRecord> = parse_records(&read_input(entries)?, input_format)?;
    processor.process_entries(&records)?;

    if let Some(path) = checkins {
        let records: Vec<MoodCheckinRecord> = parse_records(&read_input(path)?, input_format)?;
        processor.process_checkins(&records)?;
    }

    save_state(&processor, window)?;

    let insights = processor.insights();
    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
    } else {
        print_insights(&insights);
    }

    Ok(())
}

fn print_insights(insights: &Insights) {
    println!("Insights");
    println!("========");
    println!("Nights in window:   {}", insights.nights_in_window);
    println!("Check-ins:          {}", insights.checkins_in_window);
    println!("Average sleep:      {}", insights.average_duration_display);

    match (&insights.average_mood, &insights.average_mood_label) {
        (Some(avg), Some(label)) => println!("Daily mood:         {} ({})", avg.display, label.as_str()),
        _ => println!("Daily mood:         -"),
    }
    match &insights.average_wake_feeling {
        Some(avg) => println!("Wake feeling:       {}", avg.display),
        None => println!("Wake feeling:       -"),
    }
    match (&insights.average_energy, &insights.average_energy_label) {
        (Some(avg), Some(label)) => println!("Energy:             {} ({})", avg.display, label.as_str()),
        _ => println!("Energy:             -"),
    }

    if let Some(cmp) = &insights.aid_comparison {
        println!(
            "\nSleep aids: {:.1}/10 mood over {} aided nights vs {:.1}/10 over {} without ({:+.1})",
            cmp.aided_average_mood,
            cmp.aided_nights,
            cmp.unaided_average_mood,
            cmp.unaided_nights,
            cmp.difference
        );
    }

    if let Some(cmp) = &insights.sleep_mood {
        if cmp.connected {
            println!(
                "Sleep and mood: {:.1}/10 mood after good sleep vs {:.1}/10 after poor sleep",
                cmp.good_sleep_mood, cmp.poor_sleep_mood
            );
        } else {
            println!("Sleep and mood: mood looks stable regardless of sleep quality");
        }
    }

    if let Some(trend) = &insights.mood_trend {
        println!(
            "Mood trend: {} (this week {}, last week {:.1}/10)",
            trend.direction.as_str(),
            trend.recent_display,
            trend.previous_mood
        );
    }

    match &insights.recommendation {
        SleepRecommendation::Recommended {
            bedtime_display,
            wake_time_display,
            confidence,
            based_on_nights,
            ..
        } => println!(
            "\nRecommended: bed {} / wake {} (from {} nights, confidence {:.2})",
            bedtime_display, wake_time_display, based_on_nights, confidence
        ),
        SleepRecommendation::InsufficientData { message, .. } => {
            println!("\nRecommendation: {}", message)
        }
    }
}

fn cmd_validate(
    input: &Path,
    kind: RecordKind,
    input_format: &InputFormat,
    json: bool,
) -> Result<(), CliFailure> {
    let input_data = read_input(input)?;

    let (total, failures) = match kind {
        RecordKind::Entries => validate_kind::<SleepEntryRecord>(&input_data, input_format)?,
        RecordKind::Checkins => validate_kind::<MoodCheckinRecord>(&input_data, input_format)?,
    };

    let report = ValidationReport {
        total_records: total,
        valid_records: total - failures.len(),
        invalid_records: failures.len(),
        errors: failures
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                label: r.label.clone(),
                error: r.result.as_ref().map(|e| e.to_string()).unwrap_or_default(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Record {} (index {}): {}",
                    err.label.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_records > 0 {
        Err(CliFailure::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn validate_kind<R>(
    input_data: &str,
    input_format: &InputFormat,
) -> Result<(usize, Vec<ValidationResult>), CliFailure>
where
    R: Record + serde::de::DeserializeOwned,
{
    let records: Vec<R> = parse_records(input_data, input_format)?;
    Ok((records.len(), RecordAdapter::validate_records(&records)))
}

fn cmd_format(
    bed: Option<&str>,
    wake: Option<&str>,
    mood: Option<i64>,
    energy: Option<i64>,
    json: bool,
) -> Result<(), CliFailure> {
    let retire = bed.map(parse_clock_time).transpose()?.flatten();
    let wake = wake.map(parse_clock_time).transpose()?.flatten();
    let duration = compute_duration(&SleepInterval::new(retire, wake));
    let mood = mood.map(RatingScore::new);
    let energy = energy.map(RatingScore::new);

    let result = FormatResult {
        bed_time: format_12_hour(retire),
        wake_time: format_12_hour(wake),
        duration: format_duration(duration.as_ref()),
        total_minutes: duration.map(|d| d.total_minutes),
        mood_label: mood.map(|s| MoodCategory::from_score(s).as_str()),
        mood_color: mood_color(mood).as_str(),
        energy_label: energy.map(|s| EnergyCategory::from_score(s).as_str()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Bed time:   {}", result.bed_time);
        println!("Wake time:  {}", result.wake_time);
        println!("Duration:   {}", result.duration);
        println!("Mood:       {}", result.mood_label.unwrap_or("-"));
        println!("Mood color: {}", result.mood_color);
        println!("Energy:     {}", result.energy_label.unwrap_or("-"));
    }

    Ok(())
}

fn cmd_palette(json: bool) -> Result<(), CliFailure> {
    let rows: Vec<PaletteRow> = MOOD_PALETTE
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let score = RatingScore::new(i as i64 + 1);
            PaletteRow {
                score: Some(score.value()),
                color: color.as_str(),
                label: MoodCategory::from_score(score).as_str(),
            }
        })
        .chain(std::iter::once(PaletteRow {
            score: None,
            color: NEUTRAL_COLOR.as_str(),
            label: "Not rated",
        }))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("Mood Palette");
        println!("============");
        for row in &rows {
            let score = row.score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string());
            println!("  {:>2}  {}  {}", score, row.color, row.label);
        }
    }

    Ok(())
}

fn cmd_doctor(config: Option<&Path>, state: Option<&Path>, json: bool) -> Result<(), CliFailure> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("{} version {}", PRODUCER_NAME, METRICS_VERSION),
    });

    if let Some(path) = config {
        checks.push(check_file(path, "config", |content| {
            InsightConfig::from_json(content)
                .map(|c| format!("Config valid (window of {} nights)", c.window_days))
                .map_err(|e| e.to_string())
        }));
    }

    if let Some(path) = state {
        checks.push(check_file(path, "state", |content| {
            let mut processor = MetricsProcessor::new();
            processor
                .load_state(content)
                .map(|()| {
                    format!(
                        "State valid ({} nights in window)",
                        processor.insights().nights_in_window
                    )
                })
                .map_err(|e| e.to_string())
        }));
    }

    let stdin_message = if atty::is(atty::Stream::Stdin) {
        "stdin is a TTY (interactive mode)"
    } else {
        "stdin is a pipe (ready for - input)"
    };
    checks.push(DoctorCheck {
        name: "stdin".to_string(),
        status: CheckStatus::Ok,
        message: stdin_message.to_string(),
    });

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: METRICS_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Wellness Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CliFailure::DoctorFailed)
    } else {
        Ok(())
    }
}

fn check_file(
    path: &Path,
    name: &str,
    check: impl FnOnce(&str) -> Result<String, String>,
) -> DoctorCheck {
    if !path.exists() {
        return DoctorCheck {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: format!("{} does not exist", path.display()),
        };
    }

    let (status, message) = match fs::read_to_string(path) {
        Ok(content) => match check(&content) {
            Ok(message) => (CheckStatus::Ok, message),
            Err(e) => (CheckStatus::Error, format!("Invalid {name} file: {e}")),
        },
        Err(e) => (CheckStatus::Error, format!("Cannot read {name} file: {e}")),
    };

    DoctorCheck {
        name: name.to_string(),
        status,
        message,
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, CliFailure> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), CliFailure> {
    if output.to_string_lossy() == "-" {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn parse_records<T: serde::de::DeserializeOwned>(
    data: &str,
    format: &InputFormat,
) -> Result<Vec<T>, CliFailure> {
    let records = match format {
        InputFormat::Ndjson => RecordAdapter::parse_ndjson(data)?,
        InputFormat::Json => RecordAdapter::parse_array(data)?,
    };
    Ok(records)
}

/// Config file first, then flags on top. `None` when nothing was given.
fn resolve_config(window: &WindowArgs) -> Result<Option<InsightConfig>, CliFailure> {
    let mut config = match &window.config {
        Some(path) => Some(InsightConfig::from_json(&fs::read_to_string(path)?)?),
        None => None,
    };

    if let Some(days) = window.window_days {
        config.get_or_insert_with(InsightConfig::default).window_days = days;
    }

    Ok(config)
}

fn build_processor(window: &WindowArgs) -> Result<MetricsProcessor, CliFailure> {
    let config = resolve_config(window)?;
    let mut processor = MetricsProcessor::with_config(config.clone().unwrap_or_default())?;

    if let Some(path) = &window.load_state {
        processor.load_state(&fs::read_to_string(path)?)?;
        tracing::debug!(path = %path.display(), "loaded insights state");

        // Explicit settings win over the ones saved with the state
        if let Some(config) = config {
            processor.set_config(config)?;
        }
    }

    Ok(processor)
}

fn save_state(processor: &MetricsProcessor, window: &WindowArgs) -> Result<(), CliFailure> {
    if let Some(path) = &window.save_state {
        fs::write(path, processor.save_state()?)?;
        tracing::debug!(path = %path.display(), "saved insights state");
    }
    Ok(())
}

// Error types

#[derive(Debug)]
enum CliFailure {
    Io(io::Error),
    Metrics(MetricsError),
    Json(serde_json::Error),
    NoRecords,
    ValidationFailed(usize),
    DoctorFailed,
}

impl From<io::Error> for CliFailure {
    fn from(e: io::Error) -> Self {
        CliFailure::Io(e)
    }
}

impl From<MetricsError> for CliFailure {
    fn from(e: MetricsError) -> Self {
        CliFailure::Metrics(e)
    }
}

impl From<serde_json::Error> for CliFailure {
    fn from(e: serde_json::Error) -> Self {
        CliFailure::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CliFailure> for CliError {
    fn from(e: CliFailure) -> Self {
        match e {
            CliFailure::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CliFailure::Metrics(e @ MetricsError::InvalidInput { .. }) => CliError {
                code: "INVALID_INPUT".to_string(),
                message: e.to_string(),
                hint: Some("Times must be between 00:00 and 23:59".to_string()),
            },
            CliFailure::Metrics(e @ MetricsError::ConfigError(_)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'wellness doctor --config <file>' for details".to_string()),
            },
            CliFailure::Metrics(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'wellness validate' for details".to_string()),
            },
            CliFailure::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CliFailure::NoRecords => CliError {
                code: "NO_RECORDS".to_string(),
                message: "No records found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            CliFailure::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            CliFailure::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(Serialize)]
struct ValidationErrorDetail {
    index: usize,
    label: Option<String>,
    error: String,
}

#[derive(Serialize)]
struct FormatResult {
    bed_time: String,
    wake_time: String,
    duration: String,
    total_minutes: Option<u32>,
    mood_label: Option<&'static str>,
    mood_color: &'static str,
    energy_label: Option<&'static str>,
}

#[derive(Serialize)]
struct PaletteRow {
    score: Option<i64>,
    color: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
