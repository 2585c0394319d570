//! Interactive prompts for values not given on the command line

use chrono::{DateTime, Local};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::CliError;
use crate::input::InputFormat;
use crate::period::{month_range, ReturnPeriod};

const RULE: &str = "==================================================";

/// Line-oriented prompts over any reader/writer pair.
///
/// End of input answers every question with its default; where there is no
/// default it cancels.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompt on `input`, echoing to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `message` and read one trimmed line. `None` at end of input.
    fn ask(&mut self, message: &str) -> Result<Option<String>, CliError> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_period(&mut self, label: &str, default: ReturnPeriod) -> Result<ReturnPeriod, CliError> {
        loop {
            let answer = self.ask(&format!("Enter {label} period (YYYY-MM) [Default: {default}]: "))?;
            match answer.as_deref() {
                None | Some("") => {
                    writeln!(self.output, "  Using default: {default}")?;
                    return Ok(default);
                }
                Some(text) => match text.parse::<ReturnPeriod>() {
                    Ok(period) => return Ok(period),
                    Err(e) => writeln!(self.output, "X {e}. Please use YYYY-MM (e.g. 2024-04)")?,
                },
            }
        }
    }

    /// Fill in whichever of `start` / `end` is missing.
    ///
    /// The start defaults to `default`, the end to the chosen start. When
    /// anything was asked, the resulting range is shown and confirmed;
    /// answering `no` asks again.
    pub fn period_range(
        &mut self,
        start: Option<ReturnPeriod>,
        end: Option<ReturnPeriod>,
        default: ReturnPeriod,
    ) -> Result<(ReturnPeriod, ReturnPeriod), CliError> {
        if let (Some(start), Some(end)) = (start, end) {
            return Ok((start, end));
        }

        writeln!(self.output, "\n{RULE}\nDATE RANGE SELECTION\n{RULE}")?;
        loop {
            let chosen_start = match start {
                Some(p) => p,
                None => self.ask_period("START", default)?,
            };
            let chosen_end = match end {
                Some(p) => p,
                None => self.ask_period("END", chosen_start)?,
            };

            let months = month_range(chosen_start, chosen_end);
            if let (Some(first), Some(last)) = (months.first(), months.last()) {
                writeln!(self.output, "\nWill process {} month(s): {} to {}", months.len(), first, last)?;
            }

            let confirm = self.ask("Proceed with these dates? (yes/no) [yes]: ")?;
            match confirm.as_deref().map(str::to_lowercase).as_deref() {
                None | Some("") | Some("y") | Some("yes") => {
                    info!("Selected period range: {} to {}", chosen_start, chosen_end);
                    return Ok((chosen_start, chosen_end));
                }
                _ => writeln!(self.output, "Let's try again...\n")?,
            }
        }
    }

    /// Choose an input file from `input_dir` or type a path.
    pub fn select_input_file(&mut self, input_dir: &Path) -> Result<PathBuf, CliError> {
        let files = list_input_files(input_dir);

        writeln!(self.output, "\n{RULE}\nINPUT FILE SELECTION\n{RULE}")?;
        if files.is_empty() {
            writeln!(self.output, "No spreadsheet files found in {}", input_dir.display())?;
            return self.ask_path();
        }

        writeln!(self.output, "Found {} file(s) in {}:", files.len(), input_dir.display())?;
        for (i, file) in files.iter().enumerate() {
            writeln!(self.output, "  [{}] {}", i + 1, describe_file(file))?;
        }
        writeln!(self.output, "  [P] Enter a path\n  [Q] Quit")?;

        loop {
            let Some(choice) = self.ask("Select file (number, P, or Q): ")? else {
                return Err(CliError::Cancelled);
            };
            match choice.to_uppercase().as_str() {
                "Q" => return Err(CliError::Cancelled),
                "P" => return self.ask_path(),
                other => match other.parse::<usize>() {
                    Ok(n) if (1..=files.len()).contains(&n) => {
                        let selected = files[n - 1].clone();
                        info!("Selected input file: {}", selected.display());
                        return Ok(selected);
                    }
                    _ => writeln!(self.output, "Invalid selection, try again.")?,
                },
            }
        }
    }

    fn ask_path(&mut self) -> Result<PathBuf, CliError> {
        loop {
            let Some(answer) = self.ask("Path to input file (blank to quit): ")? else {
                return Err(CliError::Cancelled);
            };
            if answer.is_empty() {
                return Err(CliError::Cancelled);
            }
            let path = PathBuf::from(answer.trim_matches('"'));
            if path.is_file() {
                info!("Selected input file: {}", path.display());
                return Ok(path);
            }
            writeln!(self.output, "File not found: {}", path.display())?;
        }
    }
}

/// Supported input files directly under `dir`, sorted by name.
pub fn list_input_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && InputFormat::is_supported(p))
        // skip Excel lock files
        .filter(|p| !p.file_name().is_some_and(|n| n.to_string_lossy().starts_with("~$")))
        .collect();
    files.sort();
    files
}

fn describe_file(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match std::fs::metadata(path) {
        Ok(meta) => {
            let modified = meta
                .modified()
                .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|_| "-".to_string());
            format!("{} ({:.1} KB, modified {})", name, meta.len() as f64 / 1024.0, modified)
        }
        Err(_) => name,
    }
}
