//! Sequential pull executor

use indicatif::ProgressBar;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, warn, Instrument};

use super::progress::ProgressState;
use super::{PullError, PullResult, PullRun};
use crate::client::PullApi;
use crate::config::PullConfig;
use crate::period::ReturnPeriod;
use crate::shutdown::SharedShutdown;
use crate::CompanyRecord;

/// Runs one pull per (company, period) pair, one at a time.
///
/// Between consecutive pairs the executor sleeps `pull_delay`, whatever the
/// previous outcome was. There is no sleep after the last pair.
pub struct PullExecutor {
    client: Arc<dyn PullApi>,
    pull_delay: Duration,
    shutdown: Option<SharedShutdown>,
    progress_bar: Option<ProgressBar>,
}

impl PullExecutor {
    /// Executor using `client`, paced by `config.pull_delay`.
    pub fn new(client: Arc<dyn PullApi>, config: &PullConfig) -> Self {
        Self {
            client,
            pull_delay: config.pull_delay,
            shutdown: None,
            progress_bar: None,
        }
    }

    /// Override the delay between pairs.
    pub fn with_pull_delay(mut self, delay: Duration) -> Self {
        self.pull_delay = delay;
        self
    }

    /// Attach a shared shutdown handle for graceful cancellation.
    pub fn with_shutdown(mut self, shutdown: SharedShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Mirror progress on an `indicatif` bar. Its length is set by [`run`](Self::run).
    pub fn with_progress_bar(mut self, bar: ProgressBar) -> Self {
        self.progress_bar = Some(bar);
        self
    }

    /// Pull every period for every company.
    ///
    /// # Errors
    ///
    /// [`PullError`] when there is nothing to pull. Individual pull failures
    /// are recorded in the returned [`PullRun`], never returned as errors.
    pub async fn run(
        &self,
        companies: &[CompanyRecord],
        periods: &[ReturnPeriod],
    ) -> Result<PullRun, PullError> {
        if companies.is_empty() {
            return Err(PullError::NoCompanies);
        }
        if periods.is_empty() {
            return Err(PullError::NoPeriods);
        }

        let total = companies.len() * periods.len();
        let span = info_span!(
            "pull_run",
            companies = companies.len(),
            periods = periods.len(),
            total
        );
        Ok(self.run_pairs(companies, periods, total).instrument(span).await)
    }

    async fn run_pairs(
        &self,
        companies: &[CompanyRecord],
        periods: &[ReturnPeriod],
        total: usize,
    ) -> PullRun {
        info!(
            "Starting {} pulls ({} companies x {} periods)",
            total,
            companies.len(),
            periods.len()
        );
        if let Some(bar) = &self.progress_bar {
            bar.set_length(total as u64);
        }

        let mut progress = ProgressState::new(total);
        let mut run = PullRun {
            results: Vec::with_capacity(total),
            planned: total,
            interrupted: false,
        };

        let pairs = companies
            .iter()
            .flat_map(|company| periods.iter().map(move |&period| (company, period)));

        for (index, (company, period)) in pairs.enumerate() {
            if index > 0 && self.until_shutdown(tokio::time::sleep(self.pull_delay)).await.is_none() {
                run.interrupted = true;
                break;
            }

            info!(
                "[{}/{}] Pulling {} for {} ({})",
                index + 1,
                total,
                period,
                company.company_name,
                company.company_id
            );

            let span = info_span!("pull", company_id = %company.company_id, period = %period);
            let call = self
                .client
                .pull(&company.company_id, &company.gstin, period)
                .instrument(span);
            let Some(outcome) = self.until_shutdown(call).await else {
                run.interrupted = true;
                break;
            };

            let result = PullResult::from_outcome(company, period, outcome);
            match &result.failure {
                None => info!("  Success! Job ID: {}", result.job_id_str()),
                Some(failure) => error!("  Failed ({}): {}", failure.kind(), failure),
            }

            progress.record(result.is_success());
            if progress.should_report() {
                info!("{}", progress.format_progress());
            }
            if let Some(bar) = &self.progress_bar {
                bar.inc(1);
                bar.set_message(format!("{} {}", company.company_id, period));
            }
            run.results.push(result);
        }

        if run.interrupted {
            warn!(
                "Run interrupted after {}/{} pulls; {} not attempted",
                run.results.len(),
                total,
                run.skipped()
            );
        } else {
            info!(
                "Finished {} pulls: {} successful, {} failed",
                total,
                progress.succeeded,
                progress.failed()
            );
        }
        if let Some(bar) = &self.progress_bar {
            bar.finish_and_clear();
        }
        run
    }

    /// Drive `fut` unless shutdown is requested first. `None` means interrupted.
    async fn until_shutdown<F: Future>(&self, fut: F) -> Option<F::Output> {
        match &self.shutdown {
            Some(shutdown) => tokio::select! {
                biased;
                _ = shutdown.wait_for_shutdown() => None,
                output = fut => Some(output),
            },
            None => Some(fut.await),
        }
    }
}
