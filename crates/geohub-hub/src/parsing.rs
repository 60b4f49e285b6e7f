//! JSON parsing for hub API responses.
//!
//! Records are parsed field by field from `serde_json::Value` so one bad
//! record can be dropped without failing the page around it. Unknown fields
//! are ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use geohub_core::{CatalogError, CatalogPage, CatalogResult, PageCursor, ResourceRecord, ResourceType};
use serde_json::Value;
use thiserror::Error;

/// Why a single record was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The record is not a JSON object.
    #[error("record is not an object")]
    NotAnObject,

    /// A required field is absent, null or empty.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A field is present but unusable.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// What was wrong
        reason: String,
    },
}

// ============================================================================
// Page Parsing
// ============================================================================

/// Parse a listing response into a page.
///
/// Accepts the paginated envelope (`results`, `next`, `total`) or a bare
/// array. Malformed records are logged and counted in `dropped`.
pub fn parse_page(json: &Value) -> CatalogResult<CatalogPage> {
    let (items, next, total) = match json {
        Value::Array(items) => (items.as_slice(), None, None),
        Value::Object(map) => {
            let items = map
                .get("results")
                .and_then(Value::as_array)
                .ok_or_else(|| CatalogError::malformed("listing response has no 'results' array"))?;
            let next = map
                .get("next")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PageCursor::new);
            let total = map
                .get("total")
                .or_else(|| map.get("count"))
                .and_then(Value::as_u64);
            (items.as_slice(), next, total)
        }
        _ => {
            return Err(CatalogError::malformed(
                "listing response is neither an object nor an array",
            ));
        }
    };

    let mut records = Vec::with_capacity(items.len());
    let mut dropped = 0;
    for item in items {
        match parse_record(item) {
            Ok(record) => records.push(record),
            Err(reason) => {
                dropped += 1;
                let id = item.get("uuid").and_then(Value::as_str).unwrap_or("<none>");
                tracing::warn!(
                    id,
                    %reason,
                    "Dropping malformed hub record"
                );
            }
        }
    }

    Ok(CatalogPage {
        records,
        next_cursor: next,
        total_hint: total,
        dropped,
    })
}

// ============================================================================
// Record Parsing
// ============================================================================

/// Parse a single hub resource object.
///
/// Required: `uuid`, `name`, `resource_type`, `file`. A timestamp that is
/// present but unparseable rejects the record.
pub fn parse_record(json: &Value) -> Result<ResourceRecord, RecordError> {
    let obj = json.as_object().ok_or(RecordError::NotAnObject)?;
    let required = |field: &'static str| -> Result<String, RecordError> {
        obj.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(RecordError::MissingField(field))
    };
    let optional = |field: &str| -> Option<String> {
        obj.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let id = required("uuid")?;
    let name = required("name")?;
    let resource_type = ResourceType::parse(&required("resource_type")?);
    let download_url = required("file")?;

    let mut record = ResourceRecord::new(id, name, resource_type, download_url);
    record.subtypes = parse_subtypes(json);
    record.creator = optional("creator").unwrap_or_default();
    record.description = optional("description").unwrap_or_default();
    record.created_at = parse_timestamp(json, "upload_date")?;
    record.updated_at = parse_timestamp(json, "modified_date")?;
    record.download_count = parse_count(json.get("download_count"));
    record.thumbnail_url = optional("thumbnail");
    record.file_size_hint = json
        .get("file_size")
        .or_else(|| json.get("size"))
        .and_then(Value::as_u64);
    record.dependencies = parse_string_list(json.get("dependencies"));

    Ok(record)
}

fn parse_subtypes(json: &Value) -> Vec<String> {
    if let Some(subtype) = json.get("resource_subtype").and_then(Value::as_str) {
        let subtype = subtype.trim();
        if !subtype.is_empty() {
            return vec![subtype.to_string()];
        }
    }
    parse_string_list(json.get("resource_subtypes"))
}

/// Array of strings, or a comma-separated string.
fn parse_string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn parse_timestamp(json: &Value, field: &'static str) -> Result<Option<DateTime<Utc>>, RecordError> {
    let raw = match json.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim(),
        Some(other) => {
            return Err(RecordError::InvalidField {
                field,
                reason: format!("expected a timestamp string, got {other}"),
            });
        }
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    // Naive timestamps are taken as UTC.
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(naive.and_utc()));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(midnight.and_utc()));
    }

    Err(RecordError::InvalidField {
        field,
        reason: format!("unparseable timestamp '{raw}'"),
    })
}
