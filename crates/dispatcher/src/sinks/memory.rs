//! StatusBoard / ProgressHistory - in-memory views for interactive front ends

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{Progress, ProgressReporter, StatusEntry, StatusLog};

/// Entries kept by a board unless configured otherwise
pub const DEFAULT_BOARD_CAPACITY: usize = 50;

/// Bounded, newest-first status list
///
/// Clones share the same buffer, so one clone can be attached to a
/// controller while another is read by the UI.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    name: String,
    capacity: usize,
    entries: Arc<Mutex<VecDeque<StatusEntry>>>,
}

impl StatusBoard {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_BOARD_CAPACITY)
    }

    /// Capacity is clamped to at least one entry
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            name: name.into(),
            capacity,
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest first
    pub fn entries(&self) -> Vec<StatusEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<StatusEntry> {
        self.lock().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<StatusEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StatusLog for StatusBoard {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&self, entry: StatusEntry) {
        let mut entries = self.lock();
        entries.push_front(entry);
        entries.truncate(self.capacity);
    }
}

/// Reporter that keeps every progress update in order
#[derive(Debug, Clone)]
pub struct ProgressHistory {
    name: String,
    updates: Arc<Mutex<Vec<Progress>>>,
}

impl ProgressHistory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn updates(&self) -> Vec<Progress> {
        self.lock().clone()
    }

    /// Rounded percentages of every update
    pub fn percentages(&self) -> Vec<u8> {
        self.lock().iter().filter_map(|p| p.percentage()).collect()
    }

    pub fn last(&self) -> Option<Progress> {
        self.lock().last().copied()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Progress>> {
        self.updates.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProgressReporter for ProgressHistory {
    fn name(&self) -> &str {
        &self.name
    }

    fn report(&self, progress: Progress) {
        self.lock().push(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_is_newest_first() {
        let board = StatusBoard::new("board");
        board.record(StatusEntry::info("first"));
        board.record(StatusEntry::success("second"));

        let messages: Vec<String> = board.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert_eq!(board.latest().unwrap().message, "second");
    }

    #[test]
    fn test_board_drops_oldest_beyond_capacity() {
        let board = StatusBoard::new("board");
        for i in 0..(DEFAULT_BOARD_CAPACITY + 10) {
            board.record(StatusEntry::info(format!("entry {i}")));
        }

        let entries = board.entries();
        assert_eq!(entries.len(), DEFAULT_BOARD_CAPACITY);
        assert_eq!(entries[0].message, "entry 59");
        assert_eq!(entries[DEFAULT_BOARD_CAPACITY - 1].message, "entry 10");
    }

    #[test]
    fn test_board_clones_share_entries() {
        let board = StatusBoard::with_capacity("board", 0);
        assert_eq!(board.capacity(), 1);

        let attached = board.clone();
        attached.record(StatusEntry::error("boom"));
        attached.record(StatusEntry::error("bang"));
        assert_eq!(board.len(), 1);
        assert_eq!(board.latest().unwrap().message, "bang");

        board.clear();
        assert!(attached.is_empty());
    }

    #[test]
    fn test_progress_history_percentages() {
        let history = ProgressHistory::new("history");
        history.report(Progress::new(1, 3));
        history.report(Progress::new(2, 3));
        history.report(Progress::new(3, 3));

        assert_eq!(history.percentages(), vec![33, 67, 100]);
        assert_eq!(history.last(), Some(Progress::new(3, 3)));
    }
}
