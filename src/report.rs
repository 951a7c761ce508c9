// Summary report of a fetch run.

use crate::error::{FetchError, Result};
use crate::fetch::{ErrorEntry, FetchReport};
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.txt";

/// Build the text of `summary.txt`.
pub fn render_summary(output_dir: &Path, saved: &[String], errors: &[ErrorEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Data Saving Report ({}):\n", output_dir.display()));
    out.push_str("Saved Files:\n");
    for file in saved {
        out.push_str(&format!("- {}\n", file));
    }
    out.push_str("Errors:\n");
    if errors.is_empty() {
        out.push_str("- No errors\n");
    } else {
        for e in errors {
            out.push_str(&format!("- {}: {}\n", e.file, e.status));
        }
    }
    out
}

/// Write `summary.txt` into `output_dir`, replacing any previous one.
pub fn generate_summary(
    output_dir: &Path,
    saved: &[String],
    errors: &[ErrorEntry],
) -> Result<PathBuf> {
    let path = output_dir.join(SUMMARY_FILE);
    fs::write(&path, render_summary(output_dir, saved, errors)).map_err(FetchError::io(&path))?;
    tracing::info!(
        saved = saved.len(),
        errors = errors.len(),
        "generated summary report {}",
        path.display()
    );
    Ok(path)
}

/// Rebuild a report from the files already in a snapshot folder. Entries
/// are listed in filename order since the original endpoint order is not
/// stored on disk.
pub fn collect_from_dir(dir: &Path) -> Result<FetchReport> {
    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir).map_err(FetchError::io(dir))? {
        let entry = entry.map_err(FetchError::io(dir))?;
        if !entry.path().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();

    let mut report = FetchReport::default();
    for name in names {
        if name == SUMMARY_FILE {
            continue;
        }
        if name.starts_with("error_") && name.ends_with(".log") {
            let status = read_logged_status(&dir.join(&name))?;
            report.errors.push(ErrorEntry::new(name, status));
        } else if name.ends_with(".json") || name.ends_with(".txt") {
            report.saved.push(name);
        }
    }
    Ok(report)
}

/// Status description from the first line of an error log, which reads
/// `Error fetching <endpoint>: <status>`.
fn read_logged_status(path: &Path) -> Result<String> {
    let file = fs::File::open(path).map_err(FetchError::io(path))?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(FetchError::io(path))?;
    let status = first
        .trim_end()
        .strip_prefix("Error fetching ")
        .and_then(|rest| rest.split_once(": ").map(|(_, s)| s))
        .filter(|s| !s.is_empty());
    Ok(status.unwrap_or("Unknown status").to_string())
}
