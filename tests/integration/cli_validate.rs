//! Integration tests for the validate command and binary exit codes

use assert_cmd::Command;
use gstr2a_puller::cli::validate::ValidateTarget;
use gstr2a_puller::cli::{CliError, ValidateCommand};
use std::path::PathBuf;
use tempfile::TempDir;

fn write_input(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("companies.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("gstr2a-puller").unwrap();
    cmd.env_remove("OCTA_API_KEY")
        .env_remove("OCTA_API_SECRET")
        .env_remove("RUST_LOG");
    cmd
}

#[tokio::test]
async fn test_validate_valid_gstin() {
    let cmd = ValidateCommand {
        target: ValidateTarget::Gstin {
            gstin: "19AADCG0737G1ZQ".to_string(),
        },
    };
    assert!(cmd.execute().await.is_ok());
}

#[tokio::test]
async fn test_validate_invalid_gstin() {
    for gstin in ["19AADCG0737G1Z", "19AADCG0737G1XQ", "1AADCG07370G1ZQ"] {
        let cmd = ValidateCommand {
            target: ValidateTarget::Gstin {
                gstin: gstin.to_string(),
            },
        };
        assert!(
            matches!(cmd.execute().await, Err(CliError::GstinError(_))),
            "{gstin} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_validate_input_missing_column() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "Company ID,Company Name\n3372,Gamma Traders\n");

    let cmd = ValidateCommand {
        target: ValidateTarget::Input { path, sheet: None },
    };
    assert!(matches!(cmd.execute().await, Err(CliError::InputError(_))));
}

#[test]
fn test_binary_validate_gstin() {
    let output = bin()
        .args(["validate", "gstin", "19AADCG0737G1ZQ"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Valid GSTIN: 19AADCG0737G1ZQ"));

    bin().args(["validate", "gstin", "BADGSTIN"]).assert().failure().code(1);
}

#[test]
fn test_binary_validate_input() {
    let dir = TempDir::new().unwrap();
    let path = write_input(
        &dir,
        "Company ID,Company Name,GSTIN\n3372,Gamma Traders,19AADCG0737G1ZQ\n41,Broken,XYZ\n",
    );

    let output = bin().arg("validate").arg("input").arg(&path).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Invalid GSTINs (1)"));
}

#[test]
fn test_binary_pull_requires_credentials() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "Company ID,Company Name,GSTIN\n3372,Gamma,19AADCG0737G1ZQ\n");

    bin()
        .current_dir(dir.path())
        .args(["pull", "--start", "2024-04", "--end", "2024-04", "--no-progress", "--input"])
        .arg(&path)
        .assert()
        .failure()
        .code(1);
}
