//! # Innovation Records
//!
//! Structured innovation ideas captured against AIP projects.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use super::audit::AuditEntry;
use super::projects::Portfolio;
use super::store::{PortfolioStore, Tables};

/// Generates `all()`, `as_str()`, `FromStr` and `Display` for a display-named enum
macro_rules! display_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub fn all() -> Vec<$name> {
                vec![$(Self::$variant),+]
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_lowercase();
                Self::all()
                    .into_iter()
                    .find(|v| {
                        let label = v.as_str().to_lowercase();
                        label == wanted || label.replace(' ', "-") == wanted
                    })
                    .ok_or_else(|| format!("Unknown {}: {}", stringify!($name), s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InnovationCategory {
    Formulation,
    #[serde(rename = "Indication Expansion")]
    IndicationExpansion,
    Lifecycle,
    Access,
    Device,
    Digital,
}

display_enum!(InnovationCategory {
    Formulation => "Formulation",
    IndicationExpansion => "Indication Expansion",
    Lifecycle => "Lifecycle",
    Access => "Access",
    Device => "Device",
    Digital => "Digital",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImpactLevel {
    Commercial,
    Patient,
    Clinical,
    Operational,
}

display_enum!(ImpactLevel {
    Commercial => "Commercial",
    Patient => "Patient",
    Clinical => "Clinical",
    Operational => "Operational",
});

impl ImpactLevel {
    /// Patient and clinical impact count as high impact
    pub fn is_high(&self) -> bool {
        matches!(self, Self::Patient | Self::Clinical)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeHorizon {
    #[serde(rename = "Near Term")]
    Near,
    #[serde(rename = "Mid Term")]
    Mid,
    #[serde(rename = "Long Term")]
    Long,
}

display_enum!(TimeHorizon {
    Near => "Near Term",
    Mid => "Mid Term",
    Long => "Long Term",
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InnovationStatus {
    Idea,
    #[serde(rename = "Under Evaluation")]
    UnderEvaluation,
    #[serde(rename = "In Plan")]
    InPlan,
    Deprioritized,
}

display_enum!(InnovationStatus {
    Idea => "Idea",
    UnderEvaluation => "Under Evaluation",
    InPlan => "In Plan",
    Deprioritized => "Deprioritized",
});

/// A captured innovation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Innovation {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub category: InnovationCategory,
    pub impact_level: ImpactLevel,
    pub time_horizon: TimeHorizon,
    pub status: InnovationStatus,
    /// ISO date
    pub created_at: String,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Input for capturing an innovation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInnovation {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: InnovationCategory,
    pub impact_level: ImpactLevel,
    pub time_horizon: TimeHorizon,
    pub status: InnovationStatus,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl NewInnovation {
    /// Defaults used by the capture form: Formulation, Commercial, near term, idea
    pub fn new(project_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
            description: String::new(),
            category: InnovationCategory::Formulation,
            impact_level: ImpactLevel::Commercial,
            time_horizon: TimeHorizon::Near,
            status: InnovationStatus::Idea,
            start_date: None,
            end_date: None,
        }
    }
}

/// Search and multi-select filter. Empty selections constrain nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InnovationFilter {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub categories: Vec<InnovationCategory>,
    #[serde(default)]
    pub impacts: Vec<ImpactLevel>,
    #[serde(default)]
    pub horizons: Vec<TimeHorizon>,
}

impl InnovationFilter {
    pub fn matches(&self, innovation: &Innovation) -> bool {
        let query = self.search.trim().to_lowercase();
        let matches_project = self
            .project_id
            .as_deref()
            .map_or(true, |id| innovation.project_id == id);
        let matches_search = query.is_empty()
            || innovation.title.to_lowercase().contains(&query)
            || innovation.description.to_lowercase().contains(&query);

        matches_project
            && matches_search
            && selected(&self.categories, &innovation.category)
            && selected(&self.impacts, &innovation.impact_level)
            && selected(&self.horizons, &innovation.time_horizon)
    }
}

fn selected<T: PartialEq>(selection: &[T], value: &T) -> bool {
    selection.is_empty() || selection.contains(value)
}

/// Manager for innovation records
pub struct InnovationManager {
    tables: Arc<Mutex<Tables>>,
}

impl InnovationManager {
    pub fn new(store: &PortfolioStore) -> Self {
        Self {
            tables: store.tables(),
        }
    }

    /// All innovations, newest first
    pub fn list(&self) -> Result<Vec<Innovation>> {
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        Ok(tables.innovations.clone())
    }

    pub fn list_for_project(&self, project_id: &str) -> Result<Vec<Innovation>> {
        self.filter(&InnovationFilter {
            project_id: Some(project_id.to_string()),
            ..InnovationFilter::default()
        })
    }

    pub fn filter(&self, filter: &InnovationFilter) -> Result<Vec<Innovation>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|inn| filter.matches(inn))
            .collect())
    }

    /// Capture a new innovation against an AIP project
    pub fn create(&self, new: NewInnovation, created_by: &str) -> Result<Innovation> {
        let title = new.title.trim();
        if title.is_empty() {
            anyhow::bail!("Innovation title is required");
        }

        let start_date = parse_optional_date(new.start_date.as_deref(), "start date")?;
        let end_date = parse_optional_date(new.end_date.as_deref(), "end date")?;
        if let (Some((start, _)), Some((end, _))) = (&start_date, &end_date) {
            if start > end {
                anyhow::bail!("Innovation start date {} is after end date {}", start, end);
            }
        }

        let mut tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        if !tables
            .projects(Portfolio::Aip)
            .iter()
            .any(|p| p.id == new.project_id)
        {
            anyhow::bail!("AIP project not found: {}", new.project_id);
        }

        let innovation = Innovation {
            id: tables.next_id("inn"),
            project_id: new.project_id,
            title: title.to_string(),
            description: new.description.trim().to_string(),
            category: new.category,
            impact_level: new.impact_level,
            time_horizon: new.time_horizon,
            status: new.status,
            created_at: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            created_by: created_by.to_string(),
            start_date: start_date.map(|(_, raw)| raw),
            end_date: end_date.map(|(_, raw)| raw),
        };

        tables.innovations.insert(0, innovation.clone());
        tables.record(AuditEntry::new(
            "Innovation Tagging",
            "-",
            innovation.title.clone(),
            created_by,
            Some(Portfolio::Aip),
        ));
        tracing::info!(
            innovation_id = %innovation.id,
            project_id = %innovation.project_id,
            category = innovation.category.as_str(),
            "Innovation captured"
        );

        Ok(innovation)
    }

    /// Number of patient or clinical impact innovations on a project
    pub fn high_impact_count(&self, project_id: &str) -> Result<usize> {
        Ok(self
            .list_for_project(project_id)?
            .iter()
            .filter(|inn| inn.impact_level.is_high())
            .count())
    }
}

fn parse_optional_date(raw: Option<&str>, field: &str) -> Result<Option<(NaiveDate, String)>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => {
            let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .with_context(|| format!("Innovation {} must be YYYY-MM-DD, got '{}'", field, value))?;
            Ok(Some((date, value.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_labels_round_trip() {
        let json = serde_json::to_string(&TimeHorizon::Near).unwrap();
        assert_eq!(json, "\"Near Term\"");
        assert_eq!(
            "indication expansion".parse::<InnovationCategory>(),
            Ok(InnovationCategory::IndicationExpansion)
        );
        assert_eq!(
            "under-evaluation".parse::<InnovationStatus>(),
            Ok(InnovationStatus::UnderEvaluation)
        );
        assert!("Quantum".parse::<InnovationCategory>().is_err());
    }

    #[test]
    fn test_list_for_project() {
        let store = PortfolioStore::seeded();
        let manager = InnovationManager::new(&store);

        assert_eq!(manager.list().unwrap().len(), 29);
        assert_eq!(manager.list_for_project("aip-1").unwrap().len(), 14);
        assert_eq!(manager.list_for_project("aip-5").unwrap().len(), 0);
    }

    #[test]
    fn test_filter_combines_constraints() {
        let store = PortfolioStore::seeded();
        let manager = InnovationManager::new(&store);

        let devices = manager
            .filter(&InnovationFilter {
                categories: vec![InnovationCategory::Device],
                ..InnovationFilter::default()
            })
            .unwrap();
        assert_eq!(devices.len(), 12);

        let mixed = manager
            .filter(&InnovationFilter {
                categories: vec![InnovationCategory::Device, InnovationCategory::Digital],
                horizons: vec![TimeHorizon::Mid],
                ..InnovationFilter::default()
            })
            .unwrap();
        assert_eq!(mixed.len(), 2);
        assert!(mixed.iter().all(|i| i.category == InnovationCategory::Digital));

        let searched = manager
            .filter(&InnovationFilter {
                search: "STRATEGIC DEVICE".to_string(),
                ..InnovationFilter::default()
            })
            .unwrap();
        assert_eq!(searched.len(), 12);
    }

    #[test]
    fn test_create_validates_input() {
        let store = PortfolioStore::seeded();
        let manager = InnovationManager::new(&store);

        assert!(manager.create(NewInnovation::new("aip-1", "  "), "planner").is_err());
        assert!(manager.create(NewInnovation::new("launch-1", "Auto-injector"), "planner").is_err());

        let mut backwards = NewInnovation::new("aip-1", "Auto-injector");
        backwards.start_date = Some("2025-06-01".to_string());
        backwards.end_date = Some("2025-01-01".to_string());
        assert!(manager.create(backwards, "planner").is_err());

        assert_eq!(manager.list().unwrap().len(), 29);
    }

    #[test]
    fn test_create_prepends_and_counts_high_impact() {
        let store = PortfolioStore::seeded();
        let manager = InnovationManager::new(&store);

        let before = manager.high_impact_count("aip-5").unwrap();
        assert_eq!(before, 0);

        let mut input = NewInnovation::new("aip-5", "Next-Gen Auto-injector");
        input.impact_level = ImpactLevel::Clinical;
        input.start_date = Some("2025-01-01".to_string());
        input.end_date = Some("".to_string());
        let created = manager.create(input, "planner").unwrap();

        assert!(created.id.starts_with("inn-"));
        assert_eq!(created.created_by, "planner");
        assert!(created.end_date.is_none());
        assert_eq!(manager.list().unwrap()[0].id, created.id);
        assert_eq!(manager.high_impact_count("aip-5").unwrap(), 1);
    }
}
