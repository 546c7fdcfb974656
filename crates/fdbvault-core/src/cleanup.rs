//! Emptying the backup staging directory.
use std::{fs, io, path::Path};

use tracing::{debug, warn};

/// What a cleanup pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Top-level entries removed.
    pub removed: usize,
    /// Top-level entries that could not be removed, with the reason.
    pub failed: Vec<(String, String)>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Remove every entry under `dir`, keeping `dir` itself.
///
/// Never fails: each problem is logged and recorded in the report, and the remaining entries
/// are still attempted. A missing directory yields an empty report.
pub fn clear_directory(dir: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "cleanup skipped: directory does not exist");
            return report;
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cleanup failed: cannot read directory");
            report.failed.push((dir.display().to_string(), e.to_string()));
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cleanup: unreadable directory entry");
                report.failed.push((dir.display().to_string(), e.to_string()));
                continue;
            }
        };
        let path = entry.path();
        // `file_type` does not follow symlinks, so a link to a directory is unlinked, not traversed.
        let result = match entry.file_type() {
            Ok(ft) if ft.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => {
                debug!(path = %path.display(), "removed");
                report.removed += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cleanup: failed to remove entry");
                report.failed.push((path.display().to_string(), e.to_string()));
            }
        }
    }
    report
}
