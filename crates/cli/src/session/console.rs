//! Terminal output for status entries and progress.

use contracts::{Progress, ProgressReporter, StatusEntry, StatusLevel, StatusLog};

const BAR_WIDTH: usize = 30;

/// Prints every status entry on its own line
pub struct ConsoleStatus {
    name: String,
}

impl ConsoleStatus {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl StatusLog for ConsoleStatus {
    fn name(&self) -> &str {
        &self.name
    }

    fn record(&self, entry: StatusEntry) {
        println!("{}", format_entry(&entry));
    }
}

/// Prints a progress bar after every processed recipient
pub struct ConsoleProgress {
    name: String,
}

impl ConsoleProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ProgressReporter for ConsoleProgress {
    fn name(&self) -> &str {
        &self.name
    }

    fn report(&self, progress: Progress) {
        println!("  {}", render_bar(progress, BAR_WIDTH));
    }
}

pub fn format_entry(entry: &StatusEntry) -> String {
    let marker = match entry.level {
        StatusLevel::Info => "•",
        StatusLevel::Success => "✓",
        StatusLevel::Error => "✗",
    };
    format!(
        "[{}] {} {}",
        entry.timestamp.format("%H:%M:%S"),
        marker,
        entry.message
    )
}

/// `[#####-----] 50% (1 of 2)`
pub fn render_bar(progress: Progress, width: usize) -> String {
    let filled = (progress.ratio() * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "[{}{}] {}",
        "#".repeat(filled),
        "-".repeat(width - filled),
        progress
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(Progress::new(1, 2), 10), "[#####-----] 50% (1 of 2)");
        assert_eq!(
            render_bar(Progress::new(3, 3), 4),
            "[####] 100% (3 of 3)"
        );
        assert_eq!(render_bar(Progress::new(0, 0), 4), "[----] - (0 of 0)");
    }

    #[test]
    fn test_format_entry_markers() {
        let line = format_entry(&StatusEntry::success("Email sent to a@x.com"));
        assert!(line.ends_with("✓ Email sent to a@x.com"));

        let line = format_entry(&StatusEntry::error("Failed to send to b@x.com: Mailbox full"));
        assert!(line.contains("✗ Failed"));
    }
}
