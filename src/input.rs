//! Input list loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::error::RecordError;

/// One person to process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputRecord {
    pub name: String,
    pub url: String,
}

impl InputRecord {
    /// Convert a raw list entry. Fails per record, never for the whole list.
    pub fn from_entry(entry: &Value) -> Result<Self, RecordError> {
        Self::deserialize(entry).map_err(RecordError::MalformedRecord)
    }
}

/// Read the input list. Unreadable files and anything but a JSON array are
/// fatal; individual entries are only validated when processed.
pub fn load_entries(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input list: {}", path.display()))?;
    parse_entries(&text).with_context(|| format!("Failed to parse input list: {}", path.display()))
}

fn parse_entries(text: &str) -> Result<Vec<Value>> {
    let entries: Vec<Value> = serde_json::from_str(text)?;
    Ok(entries)
}

/// Best-effort label for log lines about an entry.
pub fn entry_label(entry: &Value, index: usize) -> String {
    entry
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("entry #{}", index + 1))
}
