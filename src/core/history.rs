//! Append-only pick log (`date,time,title` CSV) and its recent-window view.

use crate::core::encoding::{parse_csv_any_encoding, Table};
use crate::domain::model::{normalize, LogEntry};
use crate::utils::error::{PickerError, Result};
use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use csv::{Terminator, WriterBuilder};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const LOG_HEADER: [&str; 3] = ["date", "time", "title"];
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
const BACKUP_STAMP: &str = "%Y%m%d_%H%M%S";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn is_blank(bytes: &[u8]) -> bool {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes).trim_ascii().is_empty()
}

/// Result of reading the whole log.
#[derive(Debug)]
enum LogRead {
    Missing,
    Rows(Vec<RawRow>),
    Corrupt(String),
}

#[derive(Debug)]
struct RawRow {
    date: String,
    time: String,
    title: String,
}

#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<LogRead> {
        if !self.path.exists() {
            return Ok(LogRead::Missing);
        }

        let bytes = fs::read(&self.path)?;
        if is_blank(&bytes) {
            return Ok(LogRead::Rows(Vec::new()));
        }

        let table = match parse_csv_any_encoding(&self.path, &bytes) {
            Ok(table) => table,
            Err(PickerError::Encoding { .. }) => {
                return Ok(LogRead::Corrupt("undecodable content".to_string()))
            }
            Err(e) => return Err(e),
        };

        let (Some(date_col), Some(title_col)) = (table.column("date"), table.column("title"))
        else {
            return Ok(LogRead::Corrupt(format!(
                "unexpected header [{}]",
                table.headers.join(",")
            )));
        };
        let time_col = table.column("time");

        let rows = table
            .rows
            .iter()
            .map(|row| RawRow {
                date: Table::cell(row, date_col).trim().to_string(),
                time: time_col
                    .map(|c| Table::cell(row, c).trim().to_string())
                    .unwrap_or_default(),
                title: normalize(Table::cell(row, title_col)),
            })
            .collect();

        Ok(LogRead::Rows(rows))
    }

    /// 將損壞的日誌改名為 `<path>.bak_<時間戳>`，失敗只記警告
    fn quarantine(&self, reason: &str, now: NaiveDateTime) -> Option<PathBuf> {
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".bak_{}", now.format(BACKUP_STAMP)));
        let backup = PathBuf::from(backup);

        match fs::rename(&self.path, &backup) {
            Ok(()) => {
                tracing::warn!(
                    "⚠️ History log {} is corrupt ({}), moved to {}",
                    self.path.display(),
                    reason,
                    backup.display()
                );
                Some(backup)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ History log {} is corrupt ({}) and could not be moved aside: {}",
                    self.path.display(),
                    reason,
                    e
                );
                None
            }
        }
    }

    pub fn read_recent_titles(&self, dedup_days: u32) -> Result<HashSet<String>> {
        self.read_recent_titles_at(dedup_days, Local::now().naive_local())
    }

    /// Titles logged on or after `now.date() - dedup_days`.
    ///
    /// A corrupt log is renamed aside and reads as empty. Rows whose date does
    /// not parse are skipped.
    pub fn read_recent_titles_at(
        &self,
        dedup_days: u32,
        now: NaiveDateTime,
    ) -> Result<HashSet<String>> {
        let rows = match self.read()? {
            LogRead::Missing => return Ok(HashSet::new()),
            LogRead::Corrupt(reason) => {
                self.quarantine(&reason, now);
                return Ok(HashSet::new());
            }
            LogRead::Rows(rows) => rows,
        };

        let cutoff = now
            .date()
            .checked_sub_days(Days::new(u64::from(dedup_days)))
            .unwrap_or(NaiveDate::MIN);

        let recent: HashSet<String> = rows
            .into_iter()
            .filter(|row| !row.title.is_empty())
            .filter_map(|row| match NaiveDate::parse_from_str(&row.date, DATE_FORMAT) {
                Ok(date) if date >= cutoff => Some(row.title),
                Ok(_) => None,
                Err(_) => {
                    tracing::debug!("Skipping log row with bad date '{}'", row.date);
                    None
                }
            })
            .collect();

        tracing::debug!(
            "{} titles picked since {} in {}",
            recent.len(),
            cutoff,
            self.path.display()
        );
        Ok(recent)
    }

    /// Every well-formed entry in file order. A corrupt log is reported as
    /// [`PickerError::ConfigError`] and left untouched.
    pub fn read_entries(&self) -> Result<Vec<LogEntry>> {
        let rows = match self.read()? {
            LogRead::Missing => return Ok(Vec::new()),
            LogRead::Corrupt(reason) => {
                return Err(PickerError::ConfigError {
                    message: format!("history log {} is corrupt: {}", self.path.display(), reason),
                })
            }
            LogRead::Rows(rows) => rows,
        };

        Ok(rows
            .into_iter()
            .filter(|row| !row.title.is_empty())
            .filter_map(|row| {
                let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT).ok()?;
                let time = NaiveTime::parse_from_str(&row.time, TIME_FORMAT).unwrap_or_default();
                Some(LogEntry {
                    date,
                    time,
                    title: row.title,
                })
            })
            .collect())
    }

    /// The last `count` entries, newest first.
    pub fn recent_entries(&self, count: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.read_entries()?;
        entries.reverse();
        entries.truncate(count);
        Ok(entries)
    }

    pub fn append(&self, picks: &[String]) -> Result<()> {
        self.append_at(picks, Local::now().naive_local())
    }

    /// Append one row per pick, all stamped with `now`. The header (preceded by
    /// a UTF-8 byte-order mark) is written only when the file is new or blank;
    /// a blank file is rewritten from the start. A last row cut off without a
    /// line ending is closed first so new rows start on their own line.
    pub fn append_at(&self, picks: &[String], now: NaiveDateTime) -> Result<()> {
        if picks.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let (needs_header, needs_newline) = match fs::read(&self.path) {
            Ok(bytes) if is_blank(&bytes) => (true, false),
            Ok(bytes) => (false, !bytes.ends_with(b"\n")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (true, false),
            Err(e) => return Err(e.into()),
        };

        let mut file = if needs_header {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&self.path)?
        } else {
            OpenOptions::new().append(true).open(&self.path)?
        };

        if needs_header {
            file.write_all(UTF8_BOM)?;
        } else if needs_newline {
            tracing::warn!(
                "⚠️ History log {} ends in a partial row, closing it before appending",
                self.path.display()
            );
            file.write_all(b"\r\n")?;
        }

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(file);

        if needs_header {
            writer.write_record(LOG_HEADER)?;
        }

        let date = now.format(DATE_FORMAT).to_string();
        let time = now.format(TIME_FORMAT).to_string();
        for title in picks {
            writer.write_record([date.as_str(), time.as_str(), title.as_str()])?;
        }
        writer.flush()?;

        tracing::debug!("Appended {} rows to {}", picks.len(), self.path.display());
        Ok(())
    }
}
