use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::stats_glob;
use crate::error::{DecodeError, LoadError};
use crate::mapper::map_report;
use crate::model::StatisticsTree;

/// A parsed report together with the run it came from.
#[derive(Debug, Clone)]
pub struct LoadedReport {
    /// Run directory name, e.g. `checkout-20240101093000123`.
    pub run: String,
    pub source: PathBuf,
    pub tree: StatisticsTree,
}

/// `<base>/<run>/js/stats.json` -> `<run>`
fn run_name_of(path: &Path) -> String {
    path.parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn read_report_json(path: &Path) -> Result<Value, LoadError> {
    let data = fs::read(path).map_err(|source| LoadError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    let doc = serde_json::from_slice(&data).map_err(|source| DecodeError {
        file: path.to_path_buf(),
        source,
    })?;
    Ok(doc)
}

/// Reads, decodes and maps a single report file.
pub fn load_report(path: &Path) -> Result<LoadedReport, LoadError> {
    let doc = read_report_json(path)?;
    let tree = map_report(&doc).map_err(|source| LoadError::Schema {
        file: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(file = %path.display(), requests = tree.contents.len(), "loaded report");
    Ok(LoadedReport {
        run: run_name_of(path),
        source: path.to_path_buf(),
        tree,
    })
}

/// Lazily loads every report under `<base_dir>/<run_prefix>-*/js/stats.json`.
///
/// Order follows directory enumeration and must not be relied on. Each item
/// is either a loaded report or the fatal error for that file.
pub fn load_reports(
    base_dir: &Path,
    run_prefix: &str,
) -> Result<impl Iterator<Item = Result<LoadedReport, LoadError>>, LoadError> {
    let pattern = stats_glob(&base_dir.to_string_lossy(), run_prefix);
    let paths = glob::glob(&pattern).map_err(|source| LoadError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;
    Ok(paths.map(|entry| -> Result<LoadedReport, LoadError> {
        let path = entry.map_err(|e| LoadError::Io {
            file: e.path().to_path_buf(),
            source: std::io::Error::from(e),
        })?;
        load_report(&path)
    }))
}

/// Loads every matching report, aborting on the first bad file.
pub fn load_all(base_dir: &Path, run_prefix: &str) -> Result<Vec<LoadedReport>, LoadError> {
    let reports = load_reports(base_dir, run_prefix)?.collect::<Result<Vec<_>, _>>()?;
    tracing::info!(
        base_dir = %base_dir.display(),
        run_prefix,
        runs = reports.len(),
        "reports loaded"
    );
    Ok(reports)
}
