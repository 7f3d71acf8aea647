//! Deletion of expired audit partitions.
//!
//! The logs directory is treated as a key-value store keyed by calendar
//! day. The sweep only trusts parsed keys: an entry whose name does not
//! parse is logged and left alone, and a failed deletion never blocks
//! cleanup of the remaining partitions.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;

use crate::audit::writer::parse_partition_date;

/// What a sweep did, for the startup log line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub scanned: usize,
    pub deleted: usize,
    /// Entries whose names do not parse as partition keys.
    pub skipped: usize,
    /// Deletions that failed; the sweep continued past them.
    pub failed: usize,
}

/// Delete every partition in `dir` whose day key is strictly more than
/// `horizon_days` old. A partition aged exactly `horizon_days` is kept.
pub fn sweep(dir: &Path, now: NaiveDate, horizon_days: i64) -> SweepOutcome {
    let mut outcome = SweepOutcome::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        // Nothing has been logged yet; nothing to sweep.
        Err(e) if e.kind() == ErrorKind::NotFound => return outcome,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Retention sweep could not read log directory");
            return outcome;
        }
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();
        outcome.scanned += 1;

        let day = match parse_partition_date(&name) {
            Some(day) => day,
            None => {
                tracing::warn!(file = %name, "Ignoring non-partition entry in log directory");
                outcome.skipped += 1;
                continue;
            }
        };

        let age_days = now.signed_duration_since(day).num_days();
        if age_days <= horizon_days {
            continue;
        }

        match fs::remove_file(entry.path()) {
            Ok(()) => {
                tracing::info!(file = %name, age_days, "Deleted expired audit partition");
                outcome.deleted += 1;
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Failed to delete expired audit partition");
                outcome.failed += 1;
            }
        }
    }

    outcome
}
