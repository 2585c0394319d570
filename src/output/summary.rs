//! Run summary aggregation

use crate::client::FailureKind;
use crate::puller::PullResult;
use std::collections::HashMap;

/// Per-company counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySummary {
    /// Normalized company id
    pub company_id: String,
    /// Company name
    pub company_name: String,
    /// Pairs attempted
    pub attempts: usize,
    /// Pairs that returned a job id
    pub successful: usize,
    /// Pairs that failed
    pub failed: usize,
}

/// Totals over a run's results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Results considered
    pub total_attempts: usize,
    /// Successful pulls
    pub successful: usize,
    /// Failed pulls
    pub failed: usize,
    /// One entry per company, in order of first appearance
    pub companies: Vec<CompanySummary>,
    /// Failure counts per kind, in order of first appearance
    pub failures_by_kind: Vec<(FailureKind, usize)>,
}

impl RunSummary {
    /// Aggregate `results`.
    pub fn from_results(results: &[PullResult]) -> Self {
        let mut summary = Self {
            total_attempts: results.len(),
            ..Self::default()
        };
        let mut company_index: HashMap<&str, usize> = HashMap::new();

        for result in results {
            let idx = *company_index.entry(result.company_id.as_str()).or_insert_with(|| {
                summary.companies.push(CompanySummary {
                    company_id: result.company_id.clone(),
                    company_name: result.company_name.clone(),
                    attempts: 0,
                    successful: 0,
                    failed: 0,
                });
                summary.companies.len() - 1
            });
            let company = &mut summary.companies[idx];
            company.attempts += 1;

            match &result.failure {
                None => {
                    summary.successful += 1;
                    company.successful += 1;
                }
                Some(failure) => {
                    summary.failed += 1;
                    company.failed += 1;
                    let kind = failure.kind();
                    match summary.failures_by_kind.iter_mut().find(|(k, _)| *k == kind) {
                        Some((_, count)) => *count += 1,
                        None => summary.failures_by_kind.push((kind, 1)),
                    }
                }
            }
        }
        summary
    }

    /// `successful / total_attempts`, or 0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        self.successful as f64 / self.total_attempts as f64
    }

    /// Success rate as written to the summary sheet, e.g. `66.7%`.
    pub fn success_rate_label(&self) -> String {
        format!("{:.1}%", self.success_rate() * 100.0)
    }

    /// `(label, value)` pairs for the top of the summary sheet.
    pub fn overview(&self) -> [(&'static str, String); 4] {
        [
            ("Total Attempts", self.total_attempts.to_string()),
            ("Successful", self.successful.to_string()),
            ("Failed", self.failed.to_string()),
            ("Success Rate", self.success_rate_label()),
        ]
    }
}
