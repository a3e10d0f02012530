//! Release-directory traversal for geography and data files.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use glob::glob;

use crate::error::Result;

/// Whether a data file carries estimates or margins of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Estimate,
    Moe,
}

#[derive(Debug, Clone)]
pub struct DataFile {
    pub path: PathBuf,
    pub kind: DataKind,
}

/// All `g*.csv` geography files under `root`, filename-sorted, keeping the
/// first occurrence when the same filename appears in more than one
/// subdirectory.
pub fn geo_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = find(root, "g*.csv")?;
    files.sort_by_key(|p| file_name(p));

    let mut seen: HashSet<OsString> = HashSet::new();
    files.retain(|p| seen.insert(file_name(p)));

    Ok(files)
}

/// All `e*.txt` estimate and `m*.txt` margin-of-error files under `root`,
/// filename-sorted for a deterministic load order.
pub fn data_files(root: &Path) -> Result<Vec<DataFile>> {
    let estimates = find(root, "e*.txt")?.into_iter().map(|path| DataFile {
        path,
        kind: DataKind::Estimate,
    });
    let moes = find(root, "m*.txt")?.into_iter().map(|path| DataFile {
        path,
        kind: DataKind::Moe,
    });

    let mut files: Vec<DataFile> = estimates.chain(moes).collect();
    files.sort_by_key(|f| file_name(&f.path));

    Ok(files)
}

fn find(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**").join(pattern);
    let mut out = Vec::new();
    for entry in glob(&pattern.to_string_lossy())? {
        out.push(entry?);
    }
    Ok(out)
}

fn file_name(path: &Path) -> OsString {
    path.file_name().map(OsString::from).unwrap_or_default()
}
