//! Milestone draft and request types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status a generated milestone may carry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MilestoneStatus {
    Planned,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl MilestoneStatus {
    /// All statuses, in the order the response schema declares them
    pub fn all() -> [MilestoneStatus; 3] {
        [Self::Planned, Self::InProgress, Self::Completed]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generated planning event.
///
/// Drafts carry no identifier; the caller assigns one when it adopts the
/// draft into a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MilestoneDraft {
    pub title: String,
    /// ISO date or `YYYY-MM`, as returned by the service
    pub date: String,
    pub status: MilestoneStatus,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MilestoneDraft {
    /// Best-effort calendar date for the draft (`YYYY-MM` maps to the 1st)
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_milestone_date(&self.date)
    }

    /// Whether every required text field carries content
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.date.trim().is_empty() && !self.owner.trim().is_empty()
    }
}

/// Planning parameters embedded into the generation prompt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub therapeutic_area: String,
    /// Target launch date (ISO)
    pub target_date: String,
    pub region: String,
}

impl GenerationRequest {
    pub fn new(
        therapeutic_area: impl Into<String>,
        target_date: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            therapeutic_area: therapeutic_area.into(),
            target_date: target_date.into(),
            region: region.into(),
        }
    }
}

/// Parse a milestone date written as `YYYY-MM-DD`, a full RFC 3339 timestamp, or `YYYY-MM`.
pub fn parse_milestone_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&MilestoneStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");

        let status: MilestoneStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(status, MilestoneStatus::Completed);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result = serde_json::from_str::<MilestoneStatus>("\"Risk\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_draft_description_optional() {
        let draft: MilestoneDraft = serde_json::from_str(
            r#"{"title":"EMA Submission","date":"2025-01","status":"Planned","owner":"Regulatory"}"#,
        )
        .unwrap();
        assert!(draft.description.is_none());
        assert!(draft.is_complete());
        assert_eq!(draft.parsed_date(), NaiveDate::from_ymd_opt(2025, 1, 1));
    }

    #[test]
    fn test_parse_milestone_date_formats() {
        assert_eq!(
            parse_milestone_date("2025-06-30"),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(
            parse_milestone_date("2025-06-30T00:00:00Z"),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert_eq!(
            parse_milestone_date(" 2026-02 "),
            NaiveDate::from_ymd_opt(2026, 2, 1)
        );
        assert_eq!(parse_milestone_date("Q3 2025"), None);
    }
}
