//! Validation subcommand

use clap::Parser;
use std::path::{Path, PathBuf};

use super::CliError;
use crate::identifier::Gstin;
use crate::input;

/// Validate command for checking GSTINs and input files offline
#[derive(Parser, Debug)]
pub struct ValidateCommand {
    /// What to validate
    #[command(subcommand)]
    pub target: ValidateTarget,
}

/// Target type for validation
#[derive(clap::Subcommand, Debug)]
pub enum ValidateTarget {
    /// Check the format of one GSTIN
    Gstin {
        /// GSTIN to validate (e.g. 19AADCG0737G1ZQ)
        gstin: String,
    },
    /// Check an input file's columns and rows
    Input {
        /// CSV or Excel file
        path: PathBuf,

        /// Workbook sheet to read
        #[arg(long)]
        sheet: Option<String>,
    },
}

impl ValidateCommand {
    /// Execute the validation command
    pub async fn execute(&self) -> Result<(), CliError> {
        match &self.target {
            ValidateTarget::Gstin { gstin } => self.validate_gstin(gstin),
            ValidateTarget::Input { path, sheet } => self.validate_input(path, sheet.as_deref()),
        }
    }

    fn validate_gstin(&self, gstin: &str) -> Result<(), CliError> {
        match Gstin::parse(gstin) {
            Ok(gstin) => {
                println!("Valid GSTIN: {}", gstin);
                println!("  State code: {}", gstin.state_code());
                println!("  PAN: {}", gstin.pan());
                Ok(())
            }
            Err(e) => {
                eprintln!("Invalid GSTIN: {}", e);
                Err(e.into())
            }
        }
    }

    fn validate_input(&self, path: &Path, sheet: Option<&str>) -> Result<(), CliError> {
        let structure = input::validate_structure(path, sheet)?;
        println!("Input file: {}", path.display());
        println!("  Columns: {}", structure.headers.join(", "));
        println!("  Data rows: {}", structure.data_rows);

        let companies = input::read_companies(path, sheet)?;
        let invalid: Vec<_> = companies.iter().filter(|c| !c.has_valid_gstin()).collect();

        println!("  Companies with a GSTIN: {}", companies.len());
        if invalid.is_empty() {
            println!("  All GSTINs are well-formed");
        } else {
            println!("  Invalid GSTINs ({}), these pulls will fail:", invalid.len());
            for company in &invalid {
                println!("    - {} {} ({})", company.company_id, company.company_name, company.gstin);
            }
        }
        Ok(())
    }
}
