//! Roster snapshot store: the flat file shared with the refresh task.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::EnricherError;

/// The roster content read at the top of a poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    /// Human-readable refresh timestamp from the file's first line.
    /// Informational only.
    pub refreshed_at: Option<String>,
    /// Mailbox addresses to poll, in file order.
    pub mailboxes: Vec<String>,
}

/// Reader/writer for the roster file.
///
/// The file is the only resource shared between the poll loop and the
/// refresh task, so writes go through a temp file in the same directory and
/// an atomic rename; the reader always observes either the old or the new
/// snapshot, never a partial one.
#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    /// Create a store for the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the roster file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full roster. The first line is the refresh timestamp; blank
    /// lines are ignored.
    pub fn read(&self) -> Result<Roster, EnricherError> {
        let content = fs::read_to_string(&self.path)?;
        let mut lines = content.lines();

        let refreshed_at = lines
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string);
        let mailboxes = lines
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Roster {
            refreshed_at,
            mailboxes,
        })
    }

    /// Replace the roster wholesale with a new snapshot.
    pub fn write(&self, stamp: &str, mailboxes: &[String]) -> Result<(), EnricherError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        writeln!(file, "{stamp}")?;
        for mailbox in mailboxes {
            writeln!(file, "{mailbox}")?;
        }
        file.persist(&self.path).map_err(|e| e.error)?;

        debug!(
            "wrote roster snapshot with {} mailboxes to {}",
            mailboxes.len(),
            self.path.display()
        );
        Ok(())
    }
}
