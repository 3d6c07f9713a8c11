//! Daily work log.
//!
//! One markdown file per day under `.kunj/work-logs/`, named `YYYY-MM-DD.md`:
//!
//! ```text
//! # Work Log - 2024-05-02
//!
//! - 09:14 [feature-x] feat(ui): add toolbar (a1b2c3d)
//! - 11:02 [feature-x] paired with design on icons
//! ```
//!
//! Commits append an entry with their short hash; `kunj log <note>` appends one without.

use crate::core::{
    dirs,
    error::{KunjError, Result},
    git::GitRepo,
};
use chrono::{Duration, NaiveDate};
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENTRY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- (\d{2}:\d{2}) \[([^\]]+)\] (.*?)(?: \(([0-9a-f]{7,40})\))?$")
        .expect("valid work log entry regex")
});

/// How far back `previous_log` searches
pub const STANDUP_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkLogEntry {
    /// Local time, `HH:MM`
    pub time: String,
    pub branch: String,
    pub message: String,
    pub hash: Option<String>,
}

impl WorkLogEntry {
    pub fn to_line(&self) -> String {
        match &self.hash {
            Some(hash) => format!("- {} [{}] {} ({hash})", self.time, self.branch, self.message),
            None => format!("- {} [{}] {}", self.time, self.branch, self.message),
        }
    }
}

pub struct WorkLog {
    dir: PathBuf,
}

impl WorkLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn for_repo(repo: &GitRepo) -> Self {
        if let Err(e) = repo.ensure_excluded(&format!("{}/", dirs::KUNJ_DIR)) {
            log::warn!("Could not exclude {} from git: {e}", dirs::KUNJ_DIR);
        }
        Self::new(dirs::get_work_log_directory(repo.workdir()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.md", date.format("%Y-%m-%d")))
    }

    /// Append `entry` to the log for `date`, writing the header first for a new day
    pub fn append(&self, date: NaiveDate, entry: &WorkLogEntry) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| KunjError::write_failed(&self.dir, e))?;

        let path = self.path_for(date);
        let is_new = !path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| KunjError::write_failed(&path, e))?;

        let mut text = String::new();
        if is_new {
            text.push_str(&format!("# Work Log - {}\n\n", date.format("%Y-%m-%d")));
        }
        text.push_str(&entry.to_line());
        text.push('\n');
        file.write_all(text.as_bytes())
            .map_err(|e| KunjError::write_failed(&path, e))?;

        log::debug!("Appended work log entry to {}", path.display());
        Ok(path)
    }

    /// Raw contents of the log for `date`, if one exists
    pub fn read(&self, date: NaiveDate) -> Result<Option<String>> {
        let path = self.path_for(date);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn entries(&self, date: NaiveDate) -> Result<Vec<WorkLogEntry>> {
        Ok(self
            .read(date)?
            .map(|content| parse_entries(&content))
            .unwrap_or_default())
    }

    /// Most recent non-empty log strictly before `date`, within the lookback window
    pub fn previous_log(&self, date: NaiveDate) -> Result<Option<(NaiveDate, Vec<WorkLogEntry>)>> {
        for days_back in 1..=STANDUP_LOOKBACK_DAYS {
            let day = date - Duration::days(days_back);
            let entries = self.entries(day)?;
            if !entries.is_empty() {
                return Ok(Some((day, entries)));
            }
        }
        Ok(None)
    }
}

/// Entry lines of a log file; headers and free text are skipped
pub fn parse_entries(content: &str) -> Vec<WorkLogEntry> {
    content
        .lines()
        .filter_map(|line| {
            let caps = ENTRY_LINE.captures(line.trim_end())?;
            Some(WorkLogEntry {
                time: caps.get(1)?.as_str().to_string(),
                branch: caps.get(2)?.as_str().to_string(),
                message: caps.get(3)?.as_str().to_string(),
                hash: caps.get(4).map(|m| m.as_str().to_string()),
            })
        })
        .collect()
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| KunjError::invalid_date(input))
}
