//! # Milestone Response Schema
//!
//! The structured-output schema sent with each request, and the runtime
//! validator applied to whatever the service actually returns. The service
//! is not trusted to honour the schema: the payload must be a JSON array,
//! and each element is checked on its own so one malformed entry does not
//! sink the batch.

use serde_json::{json, Value};

use super::error::GenerationError;
use super::types::{MilestoneDraft, MilestoneStatus};

/// MIME type requesting structured JSON output
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Gemini `responseSchema` describing an array of milestone objects
pub fn response_schema() -> Value {
    let statuses: Vec<&str> = MilestoneStatus::all().iter().map(|s| s.as_str()).collect();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "date": { "type": "STRING", "description": "ISO format date or YYYY-MM" },
                "status": { "type": "STRING", "enum": statuses },
                "owner": { "type": "STRING" },
                "description": { "type": "STRING" }
            },
            "required": ["title", "date", "status", "owner"]
        }
    })
}

/// Result of validating a response payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMilestones {
    /// Valid drafts, in service order
    pub drafts: Vec<MilestoneDraft>,
    /// Number of array elements discarded by validation
    pub rejected: usize,
}

/// Parse raw response text into validated drafts.
///
/// Fails only when the text is not JSON or not an array; individual bad
/// elements are dropped and counted.
pub fn parse_milestones(text: &str) -> Result<ParsedMilestones, GenerationError> {
    let value: Value = serde_json::from_str(text)?;

    let items = match value {
        Value::Array(items) => items,
        other => return Err(GenerationError::NotAnArray(json_kind(&other))),
    };

    let mut parsed = ParsedMilestones::default();
    for (index, item) in items.into_iter().enumerate() {
        match validate_item(item) {
            Ok(draft) => parsed.drafts.push(draft),
            Err(reason) => {
                tracing::warn!(index, %reason, "Discarding malformed milestone");
                parsed.rejected += 1;
            }
        }
    }

    Ok(parsed)
}

fn validate_item(item: Value) -> Result<MilestoneDraft, String> {
    if !item.is_object() {
        return Err(format!("expected object, got {}", json_kind(&item)));
    }

    let mut draft: MilestoneDraft = serde_json::from_value(item).map_err(|e| e.to_string())?;

    for (field, value) in [
        ("title", &draft.title),
        ("date", &draft.date),
        ("owner", &draft.owner),
    ] {
        if value.trim().is_empty() {
            return Err(format!("blank required field '{}'", field));
        }
    }

    // Blank descriptions carry nothing; treat them as absent.
    if draft
        .description
        .as_deref()
        .is_some_and(|d| d.trim().is_empty())
    {
        draft.description = None;
    }

    Ok(draft)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
