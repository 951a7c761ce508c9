// Timestamped output folders.

use crate::error::{FetchError, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

/// `YYYY-MM-DD_HH-MM-SS`, e.g. `2025-05-15_19-58-00`.
pub const FOLDER_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub fn folder_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(FOLDER_FORMAT).to_string()
}

/// The folder one session writes its files into.
#[derive(Debug, Clone)]
pub struct SnapshotDir {
    path: PathBuf,
}

impl SnapshotDir {
    /// `root/<timestamp>`, created if absent.
    pub fn create(root: &Path, now: &DateTime<Local>) -> Result<Self> {
        let path = root.join(folder_name(now));
        fs::create_dir_all(&path).map_err(FetchError::io(&path))?;
        tracing::info!("using snapshot folder {}", path.display());
        Ok(SnapshotDir { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove everything in the folder and leave it empty. A missing folder
    /// is just created; returns whether anything was removed.
    pub fn clean(&self) -> Result<bool> {
        let existed = self.path.exists();
        if existed {
            fs::remove_dir_all(&self.path).map_err(FetchError::io(&self.path))?;
        }
        fs::create_dir_all(&self.path).map_err(FetchError::io(&self.path))?;
        tracing::info!(existed, "cleaned snapshot folder {}", self.path.display());
        Ok(existed)
    }
}

/// Snapshot folders under `root`, newest first. Directories whose name is
/// not a timestamp are skipped; a missing root yields an empty list.
pub fn list_snapshots(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(FetchError::io(root)(e)),
    };
    let mut found: Vec<(NaiveDateTime, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(FetchError::io(root))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Ok(ts) = NaiveDateTime::parse_from_str(name, FOLDER_FORMAT) {
            found.push((ts, path));
        }
    }
    found.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(found.into_iter().map(|(_, p)| p).collect())
}
