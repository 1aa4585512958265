//! Durable event journals
//!
//! A journal receives every event before it becomes visible in the log. The
//! file journal writes one JSON object per line and syncs after each write.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::events::audit_event::Event;
use crate::service::error::AccessControlResult;

/// Destination that makes appended events durable
pub trait EventJournal: Send + Sync {
    /// Persist one event; an error fails the append and leaves nothing behind
    fn record(&mut self, event: &Event) -> io::Result<()>;
}

/// JSON-lines journal file
///
/// Every record ends with a newline. A trailing fragment without one is the
/// remains of an interrupted write and is dropped on open.
#[derive(Debug)]
pub struct FileJournal {
    path: PathBuf,
    file: File,
    len: u64,
}

impl FileJournal {
    /// Open `path` for appending, creating it and its parent directories
    ///
    /// An unterminated last line is cut off so new records start on a fresh line.
    pub fn open(path: &Path) -> AccessControlResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().read(true).write(true).create(true).open(path)?;

        let contents = fs::read(path)?;
        let complete = complete_len(&contents);
        if complete < contents.len() {
            warn!(
                "Truncating {} bytes of incomplete record at the end of {}",
                contents.len() - complete,
                path.display()
            );
            file.set_len(complete as u64)?;
            file.sync_data()?;
        }

        Ok(Self { path: path.to_path_buf(), file, len: complete as u64 })
    }

    /// Path of the journal file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Length of the journal in bytes, all of it complete records
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the journal holds no records
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read every event stored in a journal file
    ///
    /// A missing file yields no events. Blank lines are skipped, and so is an
    /// unterminated last line. Any other line that fails to parse is an error.
    pub fn read_events(path: &Path) -> AccessControlResult<Vec<Event>> {
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let complete = complete_len(&contents);
        if complete < contents.len() {
            warn!(
                "Skipping incomplete record at the end of {} ({} bytes)",
                path.display(),
                contents.len() - complete
            );
        }

        let mut events = Vec::new();
        for line in contents[..complete].split(|byte| *byte == b'\n') {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            events.push(serde_json::from_slice(line)?);
        }
        Ok(events)
    }

    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(self.len))?;
        self.file.write_all(line)?;
        self.file.sync_data()
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.file.set_len(len)?;
        self.file.sync_data()
    }
}

/// Length of the prefix made of newline-terminated lines
fn complete_len(contents: &[u8]) -> usize {
    contents.iter().rposition(|byte| *byte == b'\n').map_or(0, |last| last + 1)
}

impl EventJournal for FileJournal {
    fn record(&mut self, event: &Event) -> io::Result<()> {
        let mut line = serde_json::to_vec(event).map_err(io::Error::other)?;
        line.push(b'\n');

        if let Err(err) = self.write_line(&line) {
            // The bytes may have reached the file before the failure.
            if let Err(truncate_err) = self.truncate_to(self.len) {
                error!("Failed to discard partial record in {}: {}", self.path.display(), truncate_err);
            }
            return Err(err);
        }
        self.len += line.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::audit_event::EventDraft;
    use crate::types::EventId;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_journal_lines_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");

        let event = EventDraft::unknown_sensor("UNKNOWN").into_event(EventId::new(), 0, Utc::now());
        let mut journal = FileJournal::open(&path).unwrap();
        journal.record(&event).unwrap();
        journal.record(&event).unwrap();

        let events = FileJournal::read_events(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], event);
    }

    #[test]
    fn test_open_cuts_unterminated_tail() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let event = EventDraft::unknown_sensor("UNKNOWN").into_event(EventId::new(), 0, Utc::now());

        let mut journal = FileJournal::open(&path).unwrap();
        journal.record(&event).unwrap();
        let complete = journal.len();
        drop(journal);

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(br#"{"id":"EVT_"#).unwrap();
        drop(file);

        assert_eq!(FileJournal::read_events(&path).unwrap(), vec![event.clone()]);
        let journal = FileJournal::open(&path).unwrap();
        assert_eq!(journal.len(), complete);
        assert_eq!(fs::metadata(&path).unwrap().len(), complete);
    }

    #[test]
    fn test_failed_write_is_discarded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let first = EventDraft::unknown_sensor("A").into_event(EventId::new(), 0, Utc::now());
        let second = EventDraft::unknown_sensor("B").into_event(EventId::new(), 1, Utc::now());

        let mut journal = FileJournal::open(&path).unwrap();
        journal.record(&first).unwrap();
        let before = journal.len();

        // Bytes written by an attempt whose sync then failed
        journal.file.seek(SeekFrom::Start(before)).unwrap();
        journal.file.write_all(b"{\"id\":\"EVT_half\"}\n").unwrap();
        journal.truncate_to(before).unwrap();

        journal.record(&second).unwrap();
        assert_eq!(FileJournal::read_events(&path).unwrap(), vec![first, second]);
    }

    #[test]
    fn test_corrupt_middle_line_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.jsonl");
        let event = EventDraft::unknown_sensor("UNKNOWN").into_event(EventId::new(), 0, Utc::now());
        let line = serde_json::to_string(&event).unwrap();
        fs::write(&path, format!("not json\n{}\n", line)).unwrap();

        assert!(FileJournal::read_events(&path).is_err());
    }

    #[test]
    fn test_missing_journal_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(FileJournal::read_events(&dir.path().join("absent.jsonl")).unwrap().is_empty());
    }
}
