//! JsonLinesStatusLog - appends status entries to disk as JSON lines

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use contracts::{ContractError, StatusEntry, StatusLog};
use tracing::{debug, error};

/// Status log writing one JSON object per line
///
/// Each entry is flushed immediately so the file is readable while a batch
/// runs. Write errors are logged and never reach the dispatch loop.
pub struct JsonLinesStatusLog {
    name: String,
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesStatusLog {
    /// Open (or create) `path` in append mode, creating parent directories
    pub fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let name = name.into();
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(sink = %name, path = %path.display(), "Status file opened");

        Ok(Self {
            name,
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &StatusEntry) -> Result<(), ContractError> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *writer, entry)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl StatusLog for JsonLinesStatusLog {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&self, entry: StatusEntry) {
        if let Err(e) = self.append(&entry) {
            error!(sink = %self.name, path = %self.path.display(), error = %e, "Write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::StatusLevel;

    #[test]
    fn test_entries_written_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("status.jsonl");

        let log = JsonLinesStatusLog::open("file", &path).unwrap();
        log.record(StatusEntry::info("Starting to send 1 email(s)..."));
        log.record(StatusEntry::success("Email sent to a@x.com"));

        let content = fs::read_to_string(&path).unwrap();
        let entries: Vec<StatusEntry> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, StatusLevel::Info);
        assert_eq!(entries[1].message, "Email sent to a@x.com");
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.jsonl");

        JsonLinesStatusLog::open("file", &path)
            .unwrap()
            .record(StatusEntry::info("one"));
        JsonLinesStatusLog::open("file", &path)
            .unwrap()
            .record(StatusEntry::info("two"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"level\":\"info\""));
    }
}
