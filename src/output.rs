//! Serialization of the discovered address set

use std::path::Path;

use anyhow::{Context, Result};

/// Addresses are base58 and can never contain the delimiter, so no escaping
pub const RECORD_DELIMITER: &str = ";";

/// Render the set as a single text record: addresses joined by `;`,
/// terminated by one line break. No header row.
pub fn render_record(addresses: &[String]) -> String {
    let mut record = addresses.join(RECORD_DELIMITER);
    record.push('\n');
    record
}

/// Write the record to `path`, replacing any previous run's output
pub async fn write_record(path: &Path, addresses: &[String]) -> Result<()> {
    tokio::fs::write(path, render_record(addresses))
        .await
        .with_context(|| format!("failed to write address record to {}", path.display()))
}
