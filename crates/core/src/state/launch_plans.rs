//! # Launch Plans
//!
//! Milestone plans for launch projects. Plans are built from generated
//! drafts and stored one per project.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use super::audit::AuditEntry;
use super::projects::{Portfolio, DEFAULT_REGION};
use super::store::{PortfolioStore, Tables};
use crate::milestones::{parse_milestone_date, MilestoneDraft, MilestoneGenerator};

/// Project id carried by plans drafted without a stored launch project
pub const MANUAL_PLAN_ID: &str = "manual";

/// Display status of a milestone inside a plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlanStatus {
    Completed,
    #[serde(rename = "In Progress")]
    InProgress,
    Planned,
    Risk,
}

impl PlanStatus {
    pub fn all() -> [PlanStatus; 4] {
        [Self::Completed, Self::InProgress, Self::Planned, Self::Risk]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
            Self::Planned => "Planned",
            Self::Risk => "Risk",
        }
    }

    /// Status assigned by position when a plan is first built
    fn for_position(index: usize) -> Self {
        match index {
            0 | 1 => Self::Completed,
            2 | 3 => Self::InProgress,
            _ => Self::Planned,
        }
    }
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::all()
            .into_iter()
            .find(|status| status.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown milestone status: {}", s))
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A milestone adopted into a plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub date: String,
    pub status: PlanStatus,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Milestone plan for one launch project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaunchPlan {
    pub project_id: String,
    pub region: String,
    pub target_launch_date: String,
    pub milestones: Vec<Milestone>,
    pub generated_at: DateTime<Utc>,
}

impl LaunchPlan {
    /// Adopt generated drafts, assigning ids and positional display status.
    ///
    /// The first two milestones show as completed, the next two as in
    /// progress and the rest as planned, whatever status the draft carried.
    pub fn from_drafts(
        project_id: impl Into<String>,
        region: impl Into<String>,
        target_launch_date: impl Into<String>,
        drafts: Vec<MilestoneDraft>,
    ) -> Self {
        let milestones = drafts
            .into_iter()
            .enumerate()
            .map(|(i, draft)| Milestone {
                id: format!("ms-{}", i),
                title: draft.title,
                date: draft.date,
                status: PlanStatus::for_position(i),
                owner: draft.owner,
                description: draft.description,
            })
            .collect();

        Self {
            project_id: project_id.into(),
            region: region.into(),
            target_launch_date: target_launch_date.into(),
            milestones,
            generated_at: Utc::now(),
        }
    }

    pub fn target_date(&self) -> Option<NaiveDate> {
        parse_milestone_date(&self.target_launch_date)
    }

    /// Milestones dated after the target launch date.
    ///
    /// Undated or unparseable milestones are never late.
    pub fn late_milestones(&self) -> Vec<&Milestone> {
        let Some(target) = self.target_date() else {
            return Vec::new();
        };
        self.milestones
            .iter()
            .filter(|m| parse_milestone_date(&m.date).is_some_and(|d| d > target))
            .collect()
    }

    /// Count of milestones per status
    pub fn status_summary(&self) -> BTreeMap<PlanStatus, usize> {
        let mut summary = BTreeMap::new();
        for milestone in &self.milestones {
            *summary.entry(milestone.status).or_insert(0) += 1;
        }
        summary
    }
}

/// Manager for stored launch plans
pub struct LaunchPlanManager {
    tables: Arc<Mutex<Tables>>,
}

impl LaunchPlanManager {
    pub fn new(store: &PortfolioStore) -> Self {
        Self {
            tables: store.tables(),
        }
    }

    /// Store a plan, replacing any previous plan for the project
    pub fn save(&self, plan: LaunchPlan) -> Result<()> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        tracing::debug!(project_id = %plan.project_id, milestones = plan.milestones.len(), "Saving launch plan");
        tables.launch_plans.insert(plan.project_id.clone(), plan);
        Ok(())
    }

    /// Load the stored plan for a project, if one exists
    pub fn load(&self, project_id: &str) -> Result<Option<LaunchPlan>> {
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        Ok(tables.launch_plans.get(project_id).cloned())
    }

    /// All stored plans, ordered by project id
    pub fn list(&self) -> Result<Vec<LaunchPlan>> {
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        let mut plans: Vec<LaunchPlan> = tables.launch_plans.values().cloned().collect();
        plans.sort_by(|a, b| a.project_id.cmp(&b.project_id));
        Ok(plans)
    }

    /// Override the display status of one milestone
    pub fn set_milestone_status(
        &self,
        project_id: &str,
        milestone_id: &str,
        status: PlanStatus,
        actor: &str,
    ) -> Result<Milestone> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let milestone = tables
            .launch_plans
            .get_mut(project_id)
            .with_context(|| format!("No launch plan for project: {}", project_id))?
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .with_context(|| format!("Milestone not found: {}", milestone_id))?;

        let from = milestone.status;
        milestone.status = status;
        let updated = milestone.clone();

        tables.record(AuditEntry::new(
            "Milestone Status Update",
            from.as_str(),
            status.as_str(),
            actor,
            Some(Portfolio::Launch),
        ));

        Ok(updated)
    }

    /// Generate and store a plan for a launch project.
    ///
    /// An empty generation still produces a stored plan with no milestones.
    pub async fn generate_for_project(
        &self,
        generator: &MilestoneGenerator,
        project_id: &str,
    ) -> Result<LaunchPlan> {
        let (area, target_date, region) = {
            let tables = self
                .tables
                .lock()
                .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
            let project = tables
                .projects(Portfolio::Launch)
                .iter()
                .find(|p| p.id == project_id)
                .with_context(|| format!("Launch project not found: {}", project_id))?;

            for (field, value) in [
                ("name", &project.name),
                ("therapeutic area", &project.therapeutic_area),
                ("target date", &project.target_date),
            ] {
                if value.trim().is_empty() {
                    anyhow::bail!("Launch project {} is missing its {}", project_id, field);
                }
            }

            let region = project
                .region
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REGION.to_string());
            (project.therapeutic_area.clone(), project.target_date.clone(), region)
        };

        let drafts = generator.generate_milestones(&area, &target_date, &region).await;
        if drafts.is_empty() {
            tracing::warn!(project_id, "Milestone generation produced nothing");
        }

        let plan = LaunchPlan::from_drafts(project_id, region, target_date, drafts);
        self.save(plan.clone())?;
        tracing::info!(project_id, milestones = plan.milestones.len(), "Launch plan generated");

        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milestones::{CompletionBackend, CompletionRequest, GenerationError, MilestoneStatus};
    use crate::models::ModelConfig;
    use async_trait::async_trait;

    struct FixedBackend(Option<String>);

    #[async_trait]
    impl CompletionBackend for FixedBackend {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<Option<String>, GenerationError> {
            assert!(request.prompt.contains("North America"));
            Ok(self.0.clone())
        }
    }

    fn generator(reply: Option<&str>) -> MilestoneGenerator {
        MilestoneGenerator::new(
            Arc::new(FixedBackend(reply.map(str::to_string))),
            &ModelConfig::default(),
        )
    }

    fn draft(title: &str, date: &str) -> MilestoneDraft {
        MilestoneDraft {
            title: title.to_string(),
            date: date.to_string(),
            status: MilestoneStatus::Planned,
            owner: "Regulatory".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_from_drafts_assigns_positional_status() {
        let drafts = (0..6).map(|i| draft(&format!("Step {}", i), "2024-10")).collect();
        let plan = LaunchPlan::from_drafts("launch-1", "North America", "2024-11-15", drafts);

        let ids: Vec<&str> = plan.milestones.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["ms-0", "ms-1", "ms-2", "ms-3", "ms-4", "ms-5"]);

        let summary = plan.status_summary();
        assert_eq!(summary.get(&PlanStatus::Completed), Some(&2));
        assert_eq!(summary.get(&PlanStatus::InProgress), Some(&2));
        assert_eq!(summary.get(&PlanStatus::Planned), Some(&2));
        assert_eq!(summary.get(&PlanStatus::Risk), None);
    }

    #[test]
    fn test_late_milestones() {
        let plan = LaunchPlan::from_drafts(
            "launch-1",
            "North America",
            "2024-11-15",
            vec![
                draft("Filing", "2024-03-01"),
                draft("Launch Readiness", "2024-11"),
                draft("Payer Contracts", "2024-12-01"),
                draft("Field Training", "TBD"),
            ],
        );
        let late: Vec<&str> = plan.late_milestones().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(late, vec!["Payer Contracts"]);
    }

    #[test]
    fn test_set_milestone_status() {
        let store = PortfolioStore::seeded();
        let manager = LaunchPlanManager::new(&store);
        manager
            .save(LaunchPlan::from_drafts(
                "launch-1",
                "North America",
                "2024-11-15",
                vec![draft("Filing", "2024-03-01")],
            ))
            .unwrap();

        let updated = manager
            .set_milestone_status("launch-1", "ms-0", PlanStatus::Risk, "launcher")
            .unwrap();
        assert_eq!(updated.status, PlanStatus::Risk);
        assert_eq!(
            manager.load("launch-1").unwrap().unwrap().milestones[0].status,
            PlanStatus::Risk
        );
        assert!(manager
            .set_milestone_status("launch-1", "ms-9", PlanStatus::Risk, "launcher")
            .is_err());
        assert!(manager
            .set_milestone_status("launch-2", "ms-0", PlanStatus::Risk, "launcher")
            .is_err());
    }

    #[tokio::test]
    async fn test_generate_for_project_stores_plan() {
        let store = PortfolioStore::seeded();
        let manager = LaunchPlanManager::new(&store);
        let reply = r#"[
            {"title":"BLA Submission","date":"2024-03-01","status":"Planned","owner":"Regulatory"},
            {"title":"Launch","date":"2024-11-15","status":"Planned","owner":"Commercial"}
        ]"#;

        let plan = manager
            .generate_for_project(&generator(Some(reply)), "launch-1")
            .await
            .unwrap();
        assert_eq!(plan.milestones.len(), 2);
        assert_eq!(plan.milestones[0].status, PlanStatus::Completed);
        assert_eq!(plan.target_launch_date, "2024-11-15");
        assert_eq!(manager.load("launch-1").unwrap(), Some(plan));
    }

    #[tokio::test]
    async fn test_empty_generation_still_stores_plan() {
        let store = PortfolioStore::seeded();
        let manager = LaunchPlanManager::new(&store);

        let plan = manager
            .generate_for_project(&generator(None), "launch-1")
            .await
            .unwrap();
        assert!(plan.milestones.is_empty());
        assert!(manager.load("launch-1").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_generate_requires_launch_project() {
        let store = PortfolioStore::seeded();
        let manager = LaunchPlanManager::new(&store);
        let result = manager
            .generate_for_project(&generator(Some("[]")), "aip-1")
            .await;
        assert!(result.is_err());
    }
}
