//! Staging, atomic publishing and up-to-date checks for generated units.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, error, info};

use crate::emit::{GENERATED_MARKER, ROOT_FILE};
use crate::error::{GenError, Result};

/// One generated file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub contents: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub files: usize,
    pub bytes: usize,
    pub replaced: bool,
}

/// Writes every unit into a staging directory next to `out_dir`, then
/// swaps it into place. Either the whole new tree is visible afterwards
/// or the previous tree is left untouched.
pub fn publish(units: &[SourceUnit], out_dir: &Path) -> Result<PublishReport> {
    let parent = match out_dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| GenError::io(&parent, e))?;

    ensure_replaceable(out_dir)?;

    let staging = tempfile::Builder::new()
        .prefix(".resgen-staging-")
        .tempdir_in(&parent)
        .map_err(|e| GenError::io(&parent, e))?;

    let mut report = PublishReport::default();
    for unit in units {
        let dest = staging.path().join(&unit.path);
        if let Some(dir) = dest.parent() {
            fs::create_dir_all(dir).map_err(|e| GenError::io(dir, e))?;
        }
        fs::write(&dest, &unit.contents).map_err(|e| GenError::io(&dest, e))?;
        report.files += 1;
        report.bytes += unit.contents.len();
    }
    debug!(staging = %staging.path().display(), files = report.files, "staged output");

    if out_dir.exists() {
        // The old tree moves into a second temp dir that is dropped at the end.
        let backup = tempfile::Builder::new()
            .prefix(".resgen-previous-")
            .tempdir_in(&parent)
            .map_err(|e| GenError::io(&parent, e))?;
        let previous = backup.path().join("tree");

        fs::rename(out_dir, &previous).map_err(|e| GenError::io(out_dir, e))?;
        if let Err(e) = fs::rename(staging.path(), out_dir) {
            restore_previous(backup, &previous, out_dir);
            return Err(GenError::io(out_dir, e));
        }
        report.replaced = true;
    } else {
        fs::rename(staging.path(), out_dir).map_err(|e| GenError::io(out_dir, e))?;
    }

    info!(
        out_dir = %out_dir.display(),
        files = report.files,
        bytes = report.bytes,
        replaced = report.replaced,
        "published generated sources"
    );
    Ok(report)
}

/// Differences between rendered units and what is on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub changed: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub stale: Vec<PathBuf>,
}

impl CheckReport {
    pub fn is_up_to_date(&self) -> bool {
        self.changed.is_empty() && self.missing.is_empty() && self.stale.is_empty()
    }
}

/// Compares `units` with the files under `out_dir` without writing.
pub fn check(units: &[SourceUnit], out_dir: &Path) -> Result<CheckReport> {
    let mut report = CheckReport::default();
    let expected: BTreeSet<&Path> = units.iter().map(|u| u.path.as_path()).collect();

    for unit in units {
        let path = out_dir.join(&unit.path);
        match fs::read_to_string(&path) {
            Ok(existing) if existing == unit.contents => {}
            Ok(_) => report.changed.push(unit.path.clone()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                report.missing.push(unit.path.clone())
            }
            Err(e) => return Err(GenError::io(&path, e)),
        }
    }

    if out_dir.is_dir() {
        for rel in list_files(out_dir)? {
            if !expected.contains(rel.as_path()) {
                report.stale.push(rel);
            }
        }
    }

    Ok(report)
}

/// Moves the previous tree back to `out_dir` after a failed swap. If that
/// fails too, the backup directory is kept on disk and its path returned.
fn restore_previous(backup: TempDir, previous: &Path, out_dir: &Path) -> Option<PathBuf> {
    match fs::rename(previous, out_dir) {
        Ok(()) => None,
        Err(e) => {
            let kept = backup.keep();
            error!(
                error = %e,
                out_dir = %out_dir.display(),
                previous = %previous.display(),
                "failed to restore previous output; it was left at the backup path"
            );
            Some(kept)
        }
    }
}

fn ensure_replaceable(out_dir: &Path) -> Result<()> {
    if !out_dir.exists() {
        return Ok(());
    }
    let mut entries = fs::read_dir(out_dir).map_err(|e| GenError::io(out_dir, e))?;
    if entries.next().is_none() {
        return Ok(());
    }

    let root = out_dir.join(ROOT_FILE);
    let generated = fs::read_to_string(&root)
        .map(|text| text.lines().next() == Some(GENERATED_MARKER))
        .unwrap_or(false);
    if !generated {
        return Err(GenError::ForeignOutput {
            path: out_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Files under `root`, relative to it, sorted.
fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).map_err(|e| GenError::io(&dir, e))? {
            let entry = entry.map_err(|e| GenError::io(&dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if let Ok(rel) = path.strip_prefix(root) {
                out.push(rel.to_path_buf());
            }
        }
    }

    out.sort();
    Ok(out)
}
