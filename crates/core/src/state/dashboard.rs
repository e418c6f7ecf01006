//! # Portfolio Dashboards
//!
//! Aggregate figures for the asset and launch workspaces, computed from a
//! snapshot of the store.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use super::innovations::{ImpactLevel, InnovationCategory};
use super::launch_plans::PlanStatus;
use super::projects::{Portfolio, ProjectPhase};
use super::store::PortfolioStore;

/// Share of projects in one phase
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhaseShare {
    pub phase: ProjectPhase,
    pub count: usize,
    /// Rounded to the nearest whole percent
    pub percent: u32,
}

/// Asset planning figures
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssetDashboard {
    pub active_projects: usize,
    pub total_innovations: usize,
    pub indication_expansions: usize,
    pub in_submission: usize,
    /// Every category, including empty ones, in declaration order
    pub by_category: Vec<(InnovationCategory, usize)>,
    pub by_impact: Vec<(ImpactLevel, usize)>,
    pub phase_distribution: Vec<PhaseShare>,
}

/// Phases shown in the distribution panel
const DISTRIBUTION_PHASES: [ProjectPhase; 4] = [
    ProjectPhase::Phase3,
    ProjectPhase::Phase2,
    ProjectPhase::Phase1,
    ProjectPhase::Submission,
];

impl AssetDashboard {
    pub fn compute(store: &PortfolioStore) -> Result<Self> {
        let tables = store.tables();
        let tables = tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let projects = tables.projects(Portfolio::Aip);
        let innovations = &tables.innovations;

        let phase_count = |phase: ProjectPhase| projects.iter().filter(|p| p.phase == phase).count();
        // avoid dividing by zero on an empty portfolio
        let total = projects.len().max(1) as f64;

        Ok(Self {
            active_projects: projects.len(),
            total_innovations: innovations.len(),
            indication_expansions: innovations
                .iter()
                .filter(|i| i.category == InnovationCategory::IndicationExpansion)
                .count(),
            in_submission: phase_count(ProjectPhase::Submission),
            by_category: InnovationCategory::all()
                .into_iter()
                .map(|c| (c, innovations.iter().filter(|i| i.category == c).count()))
                .collect(),
            by_impact: ImpactLevel::all()
                .into_iter()
                .map(|l| (l, innovations.iter().filter(|i| i.impact_level == l).count()))
                .collect(),
            phase_distribution: DISTRIBUTION_PHASES
                .into_iter()
                .map(|phase| {
                    let count = phase_count(phase);
                    PhaseShare {
                        phase,
                        count,
                        percent: (count as f64 / total * 100.0).round() as u32,
                    }
                })
                .collect(),
        })
    }
}

/// Launch planning figures
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LaunchDashboard {
    pub active_launches: usize,
    pub by_region: BTreeMap<String, usize>,
    pub by_therapeutic_area: BTreeMap<String, usize>,
    /// Totals across every stored plan
    pub milestone_status: BTreeMap<PlanStatus, usize>,
    pub plans: usize,
}

impl LaunchDashboard {
    pub fn compute(store: &PortfolioStore) -> Result<Self> {
        let tables = store.tables();
        let tables = tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let projects = tables.projects(Portfolio::Launch);
        let mut by_region = BTreeMap::new();
        let mut by_therapeutic_area = BTreeMap::new();
        for project in projects {
            let region = project.region.clone().unwrap_or_else(|| "N/A".to_string());
            *by_region.entry(region).or_insert(0) += 1;
            *by_therapeutic_area
                .entry(project.therapeutic_area.clone())
                .or_insert(0) += 1;
        }

        let mut milestone_status = BTreeMap::new();
        for plan in tables.launch_plans.values() {
            for (status, count) in plan.status_summary() {
                *milestone_status.entry(status).or_insert(0) += count;
            }
        }

        Ok(Self {
            active_launches: projects.len(),
            by_region,
            by_therapeutic_area,
            milestone_status,
            plans: tables.launch_plans.len(),
        })
    }
}
