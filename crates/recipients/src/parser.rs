//! Raw text → RecipientQueue

use std::path::Path;

use contracts::{RecipientQueue, RecipientsConfig};
use tracing::debug;

use crate::error::RecipientsError;

/// Split raw input into trimmed, non-empty lines (no deduplication)
pub fn parse_recipients(raw: &str) -> RecipientQueue {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Read and parse a recipient file
pub fn load_recipients(path: &Path) -> Result<RecipientQueue, RecipientsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| RecipientsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let queue = parse_recipients(&raw);
    debug!(path = %path.display(), recipients = queue.len(), "Recipient file loaded");
    Ok(queue)
}

/// Build the queue from campaign sources: inline list first, then the file
///
/// `base_dir` resolves a relative `file` path.
pub fn parse_sources(
    config: &RecipientsConfig,
    base_dir: Option<&Path>,
) -> Result<RecipientQueue, RecipientsError> {
    let mut lines: Vec<String> = config
        .list
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(file) = &config.file {
        let path = match base_dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.clone(),
        };
        let from_file = load_recipients(&path)?;
        lines.extend(from_file.iter().map(|r| r.to_string()));
    }

    Ok(lines.into_iter().collect())
}
