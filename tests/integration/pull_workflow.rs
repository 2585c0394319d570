//! End-to-end pull runs: input file -> executor -> report files

use async_trait::async_trait;
use gstr2a_puller::cli::{CliError, PullJob};
use gstr2a_puller::client::{
    OctaClient, PullApi, PullFailure, PullOutcome, PullRequest, RawResponse, Transport,
    TransportError,
};
use gstr2a_puller::config::PullConfig;
use gstr2a_puller::input::InputError;
use gstr2a_puller::output::ReportFormat;
use gstr2a_puller::period::ReturnPeriod;
use gstr2a_puller::shutdown::ShutdownCoordinator;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Accepts every pull and counts calls.
#[derive(Default)]
struct CountingApi {
    calls: AtomicUsize,
}

#[async_trait]
impl PullApi for CountingApi {
    async fn pull(&self, company_id: &str, _gstin: &str, period: ReturnPeriod) -> PullOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("JOB-{company_id}-{period}"))
    }
}

/// Always answers 200 with a job id; counts requests that reach the wire.
#[derive(Default)]
struct AcceptingTransport {
    sent: AtomicUsize,
}

#[async_trait]
impl Transport for AcceptingTransport {
    async fn send(&self, request: &PullRequest) -> Result<RawResponse, TransportError> {
        let n = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(RawResponse::new(
            200,
            format!(r#"{{"jobId":"J{}-{}"}}"#, n, request.body.return_period),
        ))
    }
}

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn config(output_dir: &Path) -> PullConfig {
    PullConfig {
        pull_delay: Duration::ZERO,
        retry_delay: Duration::ZERO,
        output_dir: output_dir.to_path_buf(),
        ..PullConfig::default()
    }
}

fn job(input: PathBuf, start: &str, end: &str, format: ReportFormat) -> PullJob {
    PullJob {
        input,
        sheet: None,
        start: start.parse().unwrap(),
        end: end.parse().unwrap(),
        format,
        show_progress: false,
    }
}

#[tokio::test]
async fn test_single_company_single_month() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "companies.csv",
        "Company ID,Company Name,GSTIN\n3372,Gamma Traders,19AADCG0737G1ZQ\n",
    );
    let out = dir.path().join("output");
    let api = Arc::new(CountingApi::default());

    let report = job(input, "2024-04", "2024-04", ReportFormat::Csv)
        .execute(api.clone(), &config(&out), None)
        .await
        .unwrap();

    assert_eq!(report.run.results.len(), 1);
    let result = &report.run.results[0];
    assert_eq!(result.company_id, "oc-3372");
    assert_eq!(result.return_period.to_string(), "2024-04");
    assert_eq!(result.job_id.as_deref(), Some("JOB-oc-3372-2024-04"));

    assert_eq!(report.files.len(), 2);
    let written = std::fs::read_to_string(&report.files[0]).unwrap();
    assert!(written.contains("oc-3372,Gamma Traders,19AADCG0737G1ZQ,2024-04,JOB-oc-3372-2024-04,Success"));
    assert!(report.files[0].starts_with(&out));
}

#[tokio::test]
async fn test_missing_gstin_column_fails_before_any_call() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "companies.csv", "Company ID,Company Name\n3372,Gamma Traders\n");
    let api = Arc::new(CountingApi::default());

    let err = job(input, "2024-04", "2024-06", ReportFormat::Xlsx)
        .execute(api.clone(), &config(&dir.path().join("output")), None)
        .await
        .unwrap_err();

    match err {
        CliError::InputError(InputError::MissingColumns(missing)) => {
            assert_eq!(missing, vec!["GSTIN".to_string()])
        }
        other => panic!("expected missing GSTIN column, got {other:?}"),
    }
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("output").exists());
}

#[tokio::test]
async fn test_every_company_and_month_gets_a_row() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "companies.csv",
        "Company ID,Company Name,GSTIN\n\
         3372,Gamma Traders,19AADCG0737G1ZQ\n\
         41,Delta Mills,27AAPFU0939F1ZV\n\
         99,Broken Co,NOT-A-GSTIN\n\
         100,No Gstin Co,\n",
    );
    let transport = AcceptingTransport::default();
    let cfg = config(&dir.path().join("output"));
    let client = Arc::new(OctaClient::with_transport(transport, &cfg));

    let report = job(input, "2023-12", "2024-02", ReportFormat::Xlsx)
        .execute(client.clone(), &cfg, None)
        .await
        .unwrap();

    // blank-GSTIN row dropped at input; the malformed one fails locally
    assert_eq!(report.run.results.len(), 3 * 3);
    assert_eq!(report.summary.successful, 6);
    assert_eq!(report.summary.failed, 3);
    assert_eq!(client.transport().sent.load(Ordering::SeqCst), 6);

    let broken: Vec<_> = report
        .run
        .results
        .iter()
        .filter(|r| r.company_id == "oc-99")
        .collect();
    assert_eq!(broken.len(), 3);
    assert!(broken
        .iter()
        .all(|r| matches!(r.failure, Some(PullFailure::Validation(_)))));

    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].extension().unwrap(), "xlsx");
}

#[tokio::test]
async fn test_reversed_range_is_swapped() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "companies.csv",
        "Company ID,Company Name,GSTIN\n3372,Gamma Traders,19AADCG0737G1ZQ\n",
    );
    let api = Arc::new(CountingApi::default());

    let pull = job(input, "2024-03", "2024-01", ReportFormat::Csv);
    let periods: Vec<String> = pull.periods().iter().map(ToString::to_string).collect();
    assert_eq!(periods, vec!["2024-01", "2024-02", "2024-03"]);

    let report = pull
        .execute(api, &config(&dir.path().join("output")), None)
        .await
        .unwrap();
    assert_eq!(report.run.results.len(), 3);
}

#[tokio::test]
async fn test_interrupted_run_still_writes_report() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "companies.csv",
        "Company ID,Company Name,GSTIN\n3372,Gamma Traders,19AADCG0737G1ZQ\n",
    );
    let shutdown = ShutdownCoordinator::shared();
    shutdown.request_shutdown();
    let api = Arc::new(CountingApi::default());

    let report = job(input, "2024-01", "2024-06", ReportFormat::Csv)
        .execute(api.clone(), &config(&dir.path().join("output")), Some(shutdown))
        .await
        .unwrap();

    assert!(report.run.interrupted);
    assert_eq!(report.run.planned, 6);
    assert!(report.run.results.is_empty());
    assert!(report.files[0].exists());
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_two_runs_write_distinct_files() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "companies.csv",
        "Company ID,Company Name,GSTIN\n3372,Gamma Traders,19AADCG0737G1ZQ\n",
    );
    let cfg = config(&dir.path().join("output"));
    let pull = job(input, "2024-04", "2024-04", ReportFormat::Csv);

    let first = pull.execute(Arc::new(CountingApi::default()), &cfg, None).await.unwrap();
    let second = pull.execute(Arc::new(CountingApi::default()), &cfg, None).await.unwrap();

    assert_ne!(first.files[0], second.files[0]);
    assert!(first.files[0].exists());
    assert!(second.files[0].exists());
}
