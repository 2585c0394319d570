//! Pull command implementation

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::prompt::Prompter;
use super::CliError;
use crate::client::{OctaClient, PullApi};
use crate::config::PullConfig;
use crate::input;
use crate::output::{self, ReportFormat, RunSummary};
use crate::period::{month_range, ReturnPeriod};
use crate::puller::{PullExecutor, PullRun};
use crate::shutdown::{self, SharedShutdown};

/// Pull GSTR-2A for every company in the input file and every month in range
#[derive(Parser, Debug)]
pub struct PullCommand {
    /// Input CSV or Excel file (prompted for when omitted)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Workbook sheet to read (default: "Companies" if present, else the first)
    #[arg(long)]
    pub sheet: Option<String>,

    /// First return period, YYYY-MM (prompted for when omitted)
    #[arg(long)]
    pub start: Option<ReturnPeriod>,

    /// Last return period, YYYY-MM (prompted for when omitted)
    #[arg(long)]
    pub end: Option<ReturnPeriod>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Xlsx)]
    pub format: ReportFormat,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl PullCommand {
    /// Execute the pull command.
    ///
    /// Ctrl+C keeps its default behaviour while prompting and is only routed
    /// to `shutdown` once the run is fully specified.
    pub async fn execute(&self, config: &PullConfig, shutdown: SharedShutdown) -> Result<PullReport, CliError> {
        config.validate()?;

        let job = self.resolve_job(config)?;
        let client: Arc<dyn PullApi> = Arc::new(OctaClient::from_config(config)?);

        shutdown::install_ctrl_c_handler(shutdown.clone());
        let report = job.execute(client, config, Some(shutdown)).await?;
        print_summary(&report);

        if report.run.interrupted {
            return Err(CliError::Interrupted {
                completed: report.run.results.len(),
                planned: report.run.planned,
            });
        }
        Ok(report)
    }

    /// Fill in missing input path and periods from stdin.
    fn resolve_job(&self, config: &PullConfig) -> Result<PullJob, CliError> {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());

        let input = match &self.input {
            Some(path) => path.clone(),
            None => prompter.select_input_file(&config.input_dir)?,
        };
        let (start, end) = prompter.period_range(self.start, self.end, ReturnPeriod::previous_month())?;

        Ok(PullJob {
            input,
            sheet: self.sheet.clone(),
            start,
            end,
            format: self.format,
            show_progress: !self.no_progress,
        })
    }
}

/// A fully specified pull: what to read, which months, how to write.
#[derive(Debug, Clone)]
pub struct PullJob {
    /// Input file
    pub input: PathBuf,
    /// Workbook sheet
    pub sheet: Option<String>,
    /// First period
    pub start: ReturnPeriod,
    /// Last period
    pub end: ReturnPeriod,
    /// Output format
    pub format: ReportFormat,
    /// Draw a progress bar on the terminal
    pub show_progress: bool,
}

/// What a pull run produced and where it was written.
#[derive(Debug)]
pub struct PullReport {
    /// Raw run results
    pub run: PullRun,
    /// Aggregated counts
    pub summary: RunSummary,
    /// Files written, result file first
    pub files: Vec<PathBuf>,
}

impl PullJob {
    /// Months covered, oldest first. Reversed bounds are swapped.
    pub fn periods(&self) -> Vec<ReturnPeriod> {
        if self.start > self.end {
            warn!(
                "Start period {} is after end period {}; swapping",
                self.start, self.end
            );
        }
        month_range(self.start, self.end)
    }

    /// Read input, pull every pair through `client`, write the report.
    ///
    /// Input problems abort before `client` is used. An interrupted run still
    /// writes whatever finished.
    pub async fn execute(
        &self,
        client: Arc<dyn PullApi>,
        config: &PullConfig,
        shutdown: Option<SharedShutdown>,
    ) -> Result<PullReport, CliError> {
        let companies = input::read_companies(&self.input, self.sheet.as_deref())?;
        let periods = self.periods();
        info!(
            "Pulling {} period(s) ({} to {}) for {} companies",
            periods.len(),
            periods.first().map(ToString::to_string).unwrap_or_default(),
            periods.last().map(ToString::to_string).unwrap_or_default(),
            companies.len()
        );

        let mut executor = PullExecutor::new(client, config);
        if let Some(shutdown) = shutdown {
            executor = executor.with_shutdown(shutdown);
        }
        if self.show_progress {
            executor = executor.with_progress_bar(progress_bar());
        }

        let run = executor.run(&companies, &periods).await?;
        if run.interrupted {
            warn!("Saving {} completed results before exit", run.results.len());
        }

        let files = output::write_report(&config.output_dir, self.format, &run.results)?;
        let summary = RunSummary::from_results(&run.results);
        Ok(PullReport { run, summary, files })
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        Ok(style) => pb.set_style(style.progress_chars("#>-")),
        Err(e) => warn!("Progress bar template rejected: {}", e),
    }
    pb
}

fn print_summary(report: &PullReport) {
    let summary = &report.summary;
    let rule = "=".repeat(50);

    println!("\n{rule}");
    println!("PULL SUMMARY");
    println!("{rule}");
    println!("Total attempts: {}", summary.total_attempts);
    println!("Successful:     {}", summary.successful);
    println!("Failed:         {}", summary.failed);
    println!("Success rate:   {}", summary.success_rate_label());
    if report.run.interrupted {
        println!("Not attempted:  {} (interrupted)", report.run.skipped());
    }

    if !summary.failures_by_kind.is_empty() {
        println!("\nFailures by type:");
        for (kind, count) in &summary.failures_by_kind {
            println!("  {}: {} - {}", kind.label(), count, kind.suggestion());
        }
    }

    if let Some(path) = report.files.first() {
        println!("\nResults saved to: {}", path.display());
    }
    for extra in report.files.iter().skip(1) {
        println!("Summary saved to: {}", extra.display());
    }
    println!("{rule}");
}
