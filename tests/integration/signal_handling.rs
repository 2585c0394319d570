use async_trait::async_trait;
use gstr2a_puller::client::{PullApi, PullOutcome};
use gstr2a_puller::config::PullConfig;
use gstr2a_puller::period::{month_range, ReturnPeriod};
use gstr2a_puller::puller::PullExecutor;
use gstr2a_puller::shutdown::ShutdownCoordinator;
use gstr2a_puller::CompanyRecord;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn shutdown_notifies_waiters() {
    let shutdown = ShutdownCoordinator::shared();
    let waiter = {
        let handle = shutdown.clone();
        tokio::spawn(async move {
            handle.wait_for_shutdown().await;
            true
        })
    };

    // Give the task time to start waiting
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.request_shutdown();

    let result = tokio::time::timeout(Duration::from_secs(1), waiter).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn shutdown_requested_before_wait_does_not_block() {
    let shutdown = ShutdownCoordinator::shared();
    shutdown.request_shutdown();

    let handle = shutdown.clone();
    let waiter = tokio::spawn(async move {
        handle.wait_for_shutdown().await;
        true
    });

    let result = tokio::time::timeout(Duration::from_secs(1), waiter).await;
    assert!(result.is_ok(), "wait_for_shutdown() blocked despite shutdown already requested");
}

#[tokio::test]
async fn shutdown_concurrent_waiters_all_notified() {
    let shutdown = ShutdownCoordinator::shared();

    let mut waiters = Vec::new();
    for _ in 0..10 {
        let handle = shutdown.clone();
        waiters.push(tokio::spawn(async move {
            handle.wait_for_shutdown().await;
        }));
    }

    tokio::time::sleep(Duration::from_millis(10)).await;
    shutdown.request_shutdown();

    for waiter in waiters {
        let result = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(result.is_ok(), "A waiter was not notified of shutdown");
    }
}

/// Each pull takes a while, like a slow API.
struct SlowApi {
    latency: Duration,
}

#[async_trait]
impl PullApi for SlowApi {
    async fn pull(&self, company_id: &str, _gstin: &str, period: ReturnPeriod) -> PullOutcome {
        tokio::time::sleep(self.latency).await;
        Ok(format!("{company_id}-{period}"))
    }
}

#[tokio::test(start_paused = true)]
async fn shutdown_abandons_in_flight_pull() {
    let shutdown = ShutdownCoordinator::shared();
    let companies = vec![CompanyRecord::new("3372", "Gamma Traders", "19AADCG0737G1ZQ")];
    let periods = month_range("2024-01".parse().unwrap(), "2024-12".parse().unwrap());

    let executor = PullExecutor::new(
        Arc::new(SlowApi {
            latency: Duration::from_secs(10),
        }),
        &PullConfig::default(),
    )
    .with_pull_delay(Duration::from_secs(1))
    .with_shutdown(shutdown.clone());

    let trigger = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            // first pull done at 10s, second in flight at 15s
            tokio::time::sleep(Duration::from_secs(15)).await;
            shutdown.request_shutdown();
        }
    });

    let start = tokio::time::Instant::now();
    let run = executor.run(&companies, &periods).await.unwrap();
    trigger.await.unwrap();

    assert!(run.interrupted);
    assert_eq!(run.results.len(), 1);
    assert_eq!(run.planned, 12);
    assert_eq!(start.elapsed(), Duration::from_secs(15));
}

#[cfg(unix)]
#[test]
fn ctrl_c_at_input_prompt_ends_process() {
    use std::process::{Command, Stdio};
    use std::time::Instant;

    // no input/ directory, so the binary asks for a path on stdin
    let dir = tempfile::TempDir::new().unwrap();
    let mut child = Command::new(assert_cmd::cargo::cargo_bin("gstr2a-puller"))
        .current_dir(dir.path())
        .env("OCTA_API_KEY", "key-0123456789")
        .env("OCTA_API_SECRET", "secret-0123456789")
        .args(["pull", "--no-progress"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let _stdin = child.stdin.take();

    std::thread::sleep(Duration::from_millis(1500));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(5);
    let exited = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break Some(status);
        }
        if Instant::now() > deadline {
            break None;
        }
        std::thread::sleep(Duration::from_millis(50));
    };
    if exited.is_none() {
        let _ = child.kill();
    }

    let status = exited.expect("binary kept waiting at the prompt after Ctrl+C");
    assert!(!status.success());
    assert!(!dir.path().join("output").exists());
}
