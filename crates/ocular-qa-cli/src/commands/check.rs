//! Check command - gate images and persist the outcome.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use ocular_qa_adapters::{
    CommandDetector, CsvAuditLog, FsImageSource, FsResultsStore, SystemClock, DEFAULT_LOG_FILE,
    DEFAULT_RESULTS_DIR,
};
use ocular_qa_core::{
    BatchSummary, CheckName, Detector, DispositionPolicy, GatePolicy, ImageSource,
    QualityPipeline, ReportOutput,
};
use tracing::{debug, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar, TableOutput};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
    /// Human-readable table per image
    Table,
}

/// Shared arguments for gating images.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckArgs {
    /// Image files or directories to gate
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Directory receiving retained images (default: ./saved_results)
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Audit log file (default: <results-dir>/results_log.csv)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Checks taking part in the verdict, comma-separated
    #[arg(long, value_name = "CHECKS", value_delimiter = ',')]
    pub include: Vec<String>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl CheckArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        // Recursive: config applies only if CLI --recursive not passed
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // Storage locations: CLI > config
        if args.results_dir.is_none() {
            args.results_dir.clone_from(&config.storage.results_dir);
        }
        if args.log_file.is_none() {
            args.log_file.clone_from(&config.storage.log_file);
        }

        // Inclusion list: CLI > config (accessor provides the default gate)
        if args.include.is_empty() {
            if let Some(ref names) = config.gate.included_checks {
                args.include.clone_from(names);
            }
        }

        // Output format: CLI > config (accessor provides fallback)
        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    "table" => Some(OutputFormat::Table),
                    _ => None,
                });
        }

        // Boolean output options: CLI flag wins, then config
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        // Store config for build_detectors to access the [checks] table
        args.config = Some(config.clone());

        args
    }

    /// Get results directory with fallback to `./saved_results`.
    fn results_dir(&self) -> PathBuf {
        self.results_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR))
    }

    /// Get audit log path with fallback to the results directory.
    fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.results_dir().join(DEFAULT_LOG_FILE))
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }

    /// Build the inclusion policy.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown, duplicate or no check names.
    pub fn gate(&self) -> Result<GatePolicy> {
        if self.include.is_empty() {
            return Ok(GatePolicy::default());
        }
        Ok(GatePolicy::from_names(&self.include)?)
    }

    /// Merged configuration, or defaults if `with_config` was not applied.
    pub fn config(&self) -> AppConfig {
        self.config.clone().unwrap_or_default()
    }
}

/// Result of running the check command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct CheckOutcome {
    /// Per-batch counts.
    pub summary: BatchSummary,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the check command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
///
/// # Errors
///
/// Returns an error for invalid configuration, before any image is touched,
/// or if writing reports fails.
pub fn run(args: &CheckArgs) -> Result<CheckOutcome> {
    info!("Running check command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    // Detectors are built once and reused for every image
    let pipeline = build_pipeline(args)?;
    info!("{}", describe(&pipeline));

    // Initialize image source
    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    // Determine if we should show progress
    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());

    // Initialize progress bar
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    // Initialize output adapter
    let output: Box<dyn ReportOutput> = match args.format() {
        OutputFormat::Jsonl => Box::new(JsonOutput::stdout()),
        OutputFormat::Json => Box::new(JsonOutput::stdout_array(args.pretty)),
        OutputFormat::Table => Box::new(TableOutput::stdout()),
    };

    let summary = pipeline.run_batch(&source, output.as_ref(), &progress_bar)?;
    info!(
        "Batch finished: {} saved, {} rejected, {} unreadable, {} not persisted",
        summary.saved, summary.rejected, summary.unreadable, summary.not_persisted
    );

    Ok(CheckOutcome {
        summary,
        exit_code: exit_code(&summary),
    })
}

/// Storage failures take precedence over unreadable input, which takes
/// precedence over rejections.
const fn exit_code(summary: &BatchSummary) -> ExitCode {
    if summary.not_persisted > 0 {
        ExitCode::StorageFailure
    } else if summary.unreadable > 0 {
        ExitCode::Error
    } else if summary.rejected > 0 {
        ExitCode::Rejected
    } else {
        ExitCode::Success
    }
}

/// Assemble the pipeline from merged args (CLI + config).
fn build_pipeline(args: &CheckArgs) -> Result<QualityPipeline> {
    let detectors = build_detectors(&args.config())?;
    let gate = args.gate()?;

    let results_dir = args.results_dir();
    let log_file = args.log_file();
    debug!(
        "Results directory {}, audit log {}",
        results_dir.display(),
        log_file.display()
    );

    let disposition = DispositionPolicy::new(
        Box::new(CsvAuditLog::new(log_file)),
        Box::new(FsResultsStore::new(results_dir)),
    );

    Ok(QualityPipeline::new(
        detectors,
        gate,
        disposition,
        Box::new(SystemClock),
    )?)
}

/// Which configured checks vote on the verdict and which are only reported.
fn describe(pipeline: &QualityPipeline) -> String {
    let (voting, reported): (Vec<CheckName>, Vec<CheckName>) =
        pipeline.checks().partition(|c| pipeline.gate().includes(*c));
    let join = |checks: &[CheckName]| {
        if checks.is_empty() {
            "none".to_string()
        } else {
            checks.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
        }
    };
    format!(
        "Gating on {}; reported only: {}",
        join(&voting),
        join(&reported)
    )
}

/// Build detectors from the `[checks]` configuration.
fn build_detectors(config: &AppConfig) -> Result<Vec<Box<dyn Detector>>> {
    let mut detectors: Vec<Box<dyn Detector>> = Vec::new();
    for (check, command) in config.detectors()? {
        let detector = CommandDetector::new(check, &command)?;
        debug!("Enabled {check} detector: {}", detector.command_line());
        detectors.push(Box::new(detector));
    }
    Ok(detectors)
}
