//! Append-only, date-partitioned audit sink.
//!
//! One CSV file per calendar day under the configured directory. A
//! partition is created lazily on the first append of its day, header
//! first; afterwards appends add rows only. Each append opens the file,
//! writes one complete row and closes it again, serialized by a
//! process-wide lock so concurrent rows never interleave.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::audit::record::{AuditRecord, CSV_HEADER};

/// Partition files are named by this prefix plus the ISO date.
pub const PARTITION_PREFIX: &str = "api_requests_";
pub const PARTITION_SUFFIX: &str = ".csv";

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writer for the daily audit partitions.
pub struct AuditLogWriter {
    dir: PathBuf,
    append_lock: Mutex<()>,
}

impl AuditLogWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Append one record to today's partition, creating it (header first)
    /// when this is the first write of the day.
    ///
    /// The day key comes from the wall clock at call time, not from the
    /// start of the request being described. Callers treat a returned
    /// error as loggable and recoverable: an audit write must never fail
    /// the request it describes.
    pub async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let now = Local::now();
        let path = self.dir.join(partition_file_name(now.date_naive()));

        let _guard = self.append_lock.lock().await;
        fs::create_dir_all(&self.dir).await?;
        let is_new = !fs::try_exists(&path).await?;

        let mut buf = String::new();
        if is_new {
            buf.push_str(CSV_HEADER);
            buf.push('\n');
        }
        buf.push_str(&record.to_csv_row(now));
        buf.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// File name of the partition for `date`.
pub fn partition_file_name(date: NaiveDate) -> String {
    format!("{PARTITION_PREFIX}{}{PARTITION_SUFFIX}", date.format("%Y-%m-%d"))
}

/// Parse a partition day key back out of a file name.
///
/// Returns `None` for anything that does not match the naming convention.
/// Deletion decisions must go through this parse, never raw file names.
pub fn parse_partition_date(file_name: &str) -> Option<NaiveDate> {
    let key = file_name
        .strip_prefix(PARTITION_PREFIX)?
        .strip_suffix(PARTITION_SUFFIX)?;
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_name_round_trips() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let name = partition_file_name(date);
        assert_eq!(name, "api_requests_2025-08-05.csv");
        assert_eq!(parse_partition_date(&name), Some(date));
    }

    #[test]
    fn test_malformed_names_do_not_parse() {
        assert_eq!(parse_partition_date("api_requests_2025-99-99.csv"), None);
        assert_eq!(parse_partition_date("api_requests_.csv"), None);
        assert_eq!(parse_partition_date("requests_2025-08-05.csv"), None);
        assert_eq!(parse_partition_date("api_requests_2025-08-05.log"), None);
    }
}
