use std::fs;
use std::path::Path;

use metrics_core::UsageRecord;
use tracing::{debug, info};

use crate::types::{IngestError, Result};

/// Reads and validates a whole metrics export.
pub fn load_records(path: &Path) -> Result<Vec<UsageRecord>> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&content)?;
    info!(
        path = %path.display(),
        records = records.len(),
        bytes = content.len(),
        "loaded usage records"
    );
    Ok(records)
}

/// Parses a JSON array of records, JSON Lines, or a single record object.
pub fn parse_records(content: &str) -> Result<Vec<UsageRecord>> {
    let content = content.trim_start_matches('\u{feff}').trim();
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let records = if content.starts_with('[') {
        serde_json::from_str::<Vec<UsageRecord>>(content)
            .map_err(|err| IngestError::schema("document", err))?
    } else {
        parse_json_lines(content)?
    };

    validate_records(&records)?;
    Ok(records)
}

fn parse_json_lines(content: &str) -> Result<Vec<UsageRecord>> {
    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<UsageRecord>(line) {
            Ok(record) => records.push(record),
            Err(line_err) => {
                if !records.is_empty() {
                    return Err(IngestError::schema(format!("line {}", index + 1), line_err));
                }
                // A pretty-printed single object spans several lines; its own
                // error is the one worth reporting.
                return match serde_json::from_str::<UsageRecord>(content) {
                    Ok(record) => {
                        debug!("input parsed as a single record object");
                        Ok(vec![record])
                    }
                    Err(_) if is_complete_line(line) => {
                        Err(IngestError::schema(format!("line {}", index + 1), line_err))
                    }
                    Err(document_err) => Err(IngestError::schema("document", document_err)),
                };
            }
        }
    }
    Ok(records)
}

// A first line that is valid JSON on its own is a JSON Lines record, not the
// opening of a multi-line object.
fn is_complete_line(line: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(line).is_ok()
}

fn validate_records(records: &[UsageRecord]) -> Result<()> {
    for (index, record) in records.iter().enumerate() {
        let location = || format!("record {}", index + 1);
        if record.user_login.trim().is_empty() {
            return Err(IngestError::schema(location(), "user_login is empty"));
        }
        if let (Some(start), Some(end)) = (record.report_start_day, record.report_end_day)
            && start > end
        {
            return Err(IngestError::schema(
                location(),
                format!("report_start_day {} is after report_end_day {}", start, end),
            ));
        }
    }
    Ok(())
}
