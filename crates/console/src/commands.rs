//! # Console Commands
//!
//! One handler per subcommand. Handlers check the user's module access,
//! call into the core managers and print text or JSON.

use anyhow::{Context, Result};
use serde::Serialize;

use portfolio_core::milestones::MilestoneGenerator;
use portfolio_core::models::ModelConfig;
use portfolio_core::state::{
    AccessGrant, AccessLevel, AccessManager, AssetDashboard, AuditTrail, DocumentKind, GrantRequest,
    InnovationFilter, InnovationManager, LaunchDashboard, LaunchPlan, LaunchPlanManager, Module,
    NewDocument, NewInnovation, NewProject, Portfolio, PortfolioAccessStats, PortfolioStore, Project,
    ProjectManager, ProjectPhase, User, MANUAL_PLAN_ID,
};
use std::collections::BTreeMap;

use crate::config::PersistedConfig;

/// Module a portfolio's screens belong to
pub fn module_for(portfolio: Portfolio) -> Module {
    match portfolio {
        Portfolio::Aip => Module::AssetPlanning,
        Portfolio::Launch => Module::LaunchPlanning,
    }
}

/// Raw innovation filter arguments
#[derive(Debug, Clone, Default)]
pub struct InnovationQuery {
    pub project: Option<String>,
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub impacts: Vec<String>,
    pub horizons: Vec<String>,
}

impl InnovationQuery {
    pub fn into_filter(self) -> Result<InnovationFilter> {
        Ok(InnovationFilter {
            project_id: self.project,
            search: self.search.unwrap_or_default(),
            categories: parse_all(&self.categories)?,
            impacts: parse_all(&self.impacts)?,
            horizons: parse_all(&self.horizons)?,
        })
    }
}

fn parse_all<T>(values: &[String]) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = String>,
{
    values
        .iter()
        .map(|v| v.parse::<T>().map_err(anyhow::Error::msg))
        .collect()
}

/// What to plan
#[derive(Debug, Clone)]
pub enum PlanTarget {
    /// A launch project already in the portfolio
    Project(String),
    /// Parameters typed on the command line, optionally registered as a new launch
    AdHoc {
        name: Option<String>,
        area: String,
        date: String,
        region: String,
    },
}

/// A signed-in console session over a freshly seeded store
pub struct Console {
    store: PortfolioStore,
    user: User,
    model_config: ModelConfig,
    json: bool,
}

impl Console {
    pub fn new(user: User, model_config: ModelConfig, json: bool) -> Self {
        Self {
            store: PortfolioStore::seeded(),
            user,
            model_config,
            json,
        }
    }

    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }

    pub fn projects(&self, portfolio: Portfolio, search: Option<&str>) -> Result<()> {
        self.user.require(module_for(portfolio))?;
        let projects = ProjectManager::new(&self.store, portfolio).search(search.unwrap_or(""))?;

        self.emit(&projects, |projects| {
            println!("{} ({})", portfolio.display_name(), projects.len());
            for p in projects {
                print_project(p);
            }
        })
    }

    pub fn innovations(&self, query: InnovationQuery) -> Result<()> {
        self.user.require(Module::AssetPlanning)?;
        let filter = query.into_filter()?;
        let manager = InnovationManager::new(&self.store);
        let innovations = manager.filter(&filter)?;
        let high_impact = filter
            .project_id
            .as_deref()
            .map(|project_id| manager.high_impact_count(project_id).map(|n| (project_id, n)))
            .transpose()?;

        self.emit(&innovations, |innovations| {
            println!("Captured innovations ({})", innovations.len());
            for inn in innovations {
                println!(
                    "  {:<10} {:<26} {:<20} {:<12} {:<10} {}",
                    inn.id,
                    inn.title,
                    inn.category.as_str(),
                    inn.impact_level.as_str(),
                    inn.time_horizon.as_str(),
                    inn.status.as_str()
                );
                if inn.start_date.is_some() || inn.end_date.is_some() {
                    println!(
                        "             Timeline: {} to {}",
                        inn.start_date.as_deref().unwrap_or("TBD"),
                        inn.end_date.as_deref().unwrap_or("TBD")
                    );
                }
            }
            if let Some((project_id, high)) = high_impact {
                println!("High impact (patient or clinical) on {}: {}", project_id, high);
            }
        })
    }

    pub fn dashboard(&self, portfolio: Portfolio) -> Result<()> {
        self.user.require(module_for(portfolio))?;
        match portfolio {
            Portfolio::Aip => {
                let dashboard = AssetDashboard::compute(&self.store)?;
                self.emit(&dashboard, |d| {
                    println!("Active projects:        {}", d.active_projects);
                    println!("Total innovations:      {}", d.total_innovations);
                    println!("Indication expansions:  {}", d.indication_expansions);
                    println!("In submission:          {}", d.in_submission);
                    println!("Innovations by category:");
                    for (category, count) in &d.by_category {
                        println!("  {:<22} {}", category.as_str(), count);
                    }
                    println!("Innovations by impact:");
                    for (impact, count) in &d.by_impact {
                        println!("  {:<22} {}", impact.as_str(), count);
                    }
                    println!("Phase distribution:");
                    for share in &d.phase_distribution {
                        println!(
                            "  {:<22} {}% ({})",
                            share.phase.as_str(),
                            share.percent,
                            share.count
                        );
                    }
                })
            }
            Portfolio::Launch => {
                let dashboard = LaunchDashboard::compute(&self.store)?;
                self.emit(&dashboard, |d| {
                    println!("Active launches: {}", d.active_launches);
                    println!("By region:");
                    for (region, count) in &d.by_region {
                        println!("  {:<22} {}", region, count);
                    }
                    println!("By therapeutic area:");
                    for (area, count) in &d.by_therapeutic_area {
                        println!("  {:<22} {}", area, count);
                    }
                    println!("Milestones across {} plan(s):", d.plans);
                    for (status, count) in &d.milestone_status {
                        println!("  {:<22} {}", status.as_str(), count);
                    }
                })
            }
        }
    }

    pub async fn plan(&self, target: PlanTarget) -> Result<()> {
        self.user.require(Module::LaunchPlanning)?;
        let generator = MilestoneGenerator::from_config(&self.model_config)
            .context("Milestone generation is not configured")?;
        let plan = self.draft_plan(&generator, target).await?;
        self.emit(&plan, print_plan)
    }

    /// Generate a plan with the given generator.
    ///
    /// Plans for stored launch projects are saved; ad-hoc plans without a
    /// name are returned under the manual plan id and not stored.
    pub async fn draft_plan(
        &self,
        generator: &MilestoneGenerator,
        target: PlanTarget,
    ) -> Result<LaunchPlan> {
        self.user.require(Module::LaunchPlanning)?;
        let plans = LaunchPlanManager::new(&self.store);

        let plan = match target {
            PlanTarget::Project(project_id) => {
                plans.generate_for_project(generator, &project_id).await?
            }
            PlanTarget::AdHoc {
                name: Some(name),
                area,
                date,
                region,
            } => {
                let project = ProjectManager::new(&self.store, Portfolio::Launch).create(
                    NewProject {
                        name,
                        therapeutic_area: area,
                        target_date: date,
                        region: Some(region),
                        ..NewProject::default()
                    },
                    &self.user.username,
                )?;
                plans.generate_for_project(generator, &project.id).await?
            }
            PlanTarget::AdHoc {
                name: None,
                area,
                date,
                region,
            } => {
                let drafts = generator.generate_milestones(&area, &date, &region).await;
                LaunchPlan::from_drafts(MANUAL_PLAN_ID, region, date, drafts)
            }
        };

        Ok(plan)
    }

    pub fn add_project(&self, portfolio: Portfolio, new: NewProject) -> Result<()> {
        self.user.require(module_for(portfolio))?;
        let project =
            ProjectManager::new(&self.store, portfolio).create(new, &self.user.username)?;
        self.emit(&project, |p| {
            println!("Created {} in {}", p.id, portfolio.display_name());
            print_project(p);
        })
    }

    pub fn set_phase(&self, portfolio: Portfolio, project_id: &str, phase: ProjectPhase) -> Result<()> {
        self.user.require(module_for(portfolio))?;
        let project = ProjectManager::new(&self.store, portfolio).update_phase(
            project_id,
            phase,
            &self.user.username,
        )?;
        self.emit(&project, print_project)
    }

    pub fn tag(
        &self,
        portfolio: Portfolio,
        project_id: &str,
        kind: DocumentKind,
        tagged: bool,
    ) -> Result<()> {
        self.user.require(module_for(portfolio))?;
        let project = ProjectManager::new(&self.store, portfolio).tag_document(
            project_id,
            kind,
            tagged,
            &self.user.username,
        )?;
        self.emit(&project, print_project)
    }

    pub fn documents(&self, portfolio: Portfolio, project_id: &str) -> Result<()> {
        self.user.require(module_for(portfolio))?;
        let documents = ProjectManager::new(&self.store, portfolio).documents(project_id)?;
        self.emit(&documents, |documents| {
            println!("Documents on {} ({})", project_id, documents.len());
            for d in documents {
                let tags: Vec<&str> = d.tags.iter().map(|t| t.as_str()).collect();
                println!("  {:<10} {}  {:<30} [{}]  {}", d.id, d.date, d.name, tags.join(", "), d.added_by);
                println!("             {}", d.url);
            }
        })
    }

    pub fn add_document(&self, portfolio: Portfolio, project_id: &str, new: NewDocument) -> Result<()> {
        self.user.require(module_for(portfolio))?;
        let document = ProjectManager::new(&self.store, portfolio).add_document(
            project_id,
            new,
            &self.user.username,
        )?;
        self.emit(&document, |d| {
            println!("Added {} to {}: {}", d.id, d.project_id, d.name);
        })
    }

    /// Capture an innovation on an AIP project
    pub fn capture(&self, new: NewInnovation) -> Result<()> {
        self.user.require(Module::AssetPlanning)?;
        let innovation = InnovationManager::new(&self.store).create(new, &self.user.username)?;
        self.emit(&innovation, |inn| {
            println!(
                "Captured {} on {}: {} ({}, {}, {})",
                inn.id,
                inn.project_id,
                inn.title,
                inn.category.as_str(),
                inn.impact_level.as_str(),
                inn.time_horizon.as_str()
            );
        })
    }

    pub fn grant(
        &self,
        email: String,
        portfolios: Vec<Portfolio>,
        project_ids: Vec<String>,
        level: AccessLevel,
    ) -> Result<()> {
        self.user.require(Module::Administration)?;
        let grant = AccessManager::new(&self.store).grant(
            GrantRequest {
                email,
                portfolios,
                project_ids,
                level,
            },
            &self.user.username,
        )?;

        self.emit(&grant, |g| {
            println!(
                "Granted {} access to {} <{}> on {}",
                g.level.as_str().to_uppercase(),
                g.person.name,
                g.person.email,
                g.project_ids.join(", ")
            );
            println!("  {}", g.level.description());
        })
    }

    pub fn revoke(&self, grant_id: &str) -> Result<()> {
        self.user.require(Module::Administration)?;
        let grant = AccessManager::new(&self.store).revoke(grant_id, &self.user.username)?;
        self.emit(&grant, |g| {
            println!("Revoked {} from {} <{}>", g.id, g.person.name, g.person.email);
        })
    }

    pub fn access(&self) -> Result<()> {
        self.user.require(Module::Administration)?;
        let manager = AccessManager::new(&self.store);

        #[derive(Serialize)]
        struct AccessReport {
            grants: Vec<AccessGrant>,
            stats: BTreeMap<Portfolio, PortfolioAccessStats>,
        }

        let report = AccessReport {
            grants: manager.list()?,
            stats: manager.stats()?,
        };

        self.emit(&report, |r| {
            println!("Access grants ({})", r.grants.len());
            for g in &r.grants {
                println!(
                    "  {:<11} {:<24} {:<6} {}",
                    g.id,
                    g.person.email,
                    g.level.as_str(),
                    g.project_ids.join(", ")
                );
            }
            for (portfolio, stats) in &r.stats {
                let levels: Vec<String> = AccessLevel::all()
                    .iter()
                    .map(|l| format!("{} {}", l.as_str(), stats.grants_by_level.get(l).unwrap_or(&0)))
                    .collect();
                println!(
                    "{}: {} user(s); {}",
                    portfolio.display_name(),
                    stats.distinct_users,
                    levels.join(", ")
                );
            }
        })
    }

    /// Audit for one portfolio needs that portfolio's module; the full trail needs administration
    pub fn audit(&self, portfolio: Option<Portfolio>) -> Result<()> {
        match portfolio {
            Some(p) => self.user.require(module_for(p))?,
            None => self.user.require(Module::Administration)?,
        }
        let entries = AuditTrail::new(&self.store).list(portfolio)?;

        self.emit(&entries, |entries| {
            for e in entries {
                println!(
                    "  {}  {:<24} {:<14} -> {:<14} {}",
                    e.time.format("%Y-%m-%d %H:%M:%S"),
                    e.activity,
                    e.from,
                    e.to,
                    e.user
                );
            }
        })
    }
}

fn print_project(p: &Project) {
    println!(
        "  {:<10} {:<12} {:<14} {:<12} {}  {}  docs {}/3",
        p.id,
        p.name,
        p.therapeutic_area,
        p.phase.as_str(),
        p.target_date,
        p.region.as_deref().unwrap_or("N/A"),
        p.tagged_documents.coverage()
    );
}

fn print_plan(plan: &LaunchPlan) {
    println!(
        "Launch plan for {} ({}, target {})",
        plan.project_id, plan.region, plan.target_launch_date
    );
    if plan.milestones.is_empty() {
        println!("  No milestones generated. Run with RUST_LOG=portfolio_core=debug for details.");
        return;
    }

    let late: Vec<&str> = plan.late_milestones().iter().map(|m| m.id.as_str()).collect();
    for m in &plan.milestones {
        println!(
            "  {:<5} {:<10} {:<12} {} ({}){}",
            m.id,
            m.date,
            m.status.as_str(),
            m.title,
            m.owner,
            if late.contains(&m.id.as_str()) { "  LATE" } else { "" }
        );
        if let Some(description) = &m.description {
            println!("        {}", description);
        }
    }

    let summary: Vec<String> = plan
        .status_summary()
        .iter()
        .map(|(status, count)| format!("{} {}", status.as_str(), count))
        .collect();
    println!("  {}", summary.join(", "));
}

pub fn show_config(persisted: &PersistedConfig, json: bool) -> Result<()> {
    let resolved = persisted.to_model_config();
    if json {
        let value = serde_json::json!({
            "path": PersistedConfig::path(),
            "persisted": persisted,
            "effective": resolved,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Config file:  {}", PersistedConfig::path().display());
    println!("Model:        {}", resolved.model);
    println!("Endpoint:     {}", resolved.endpoint());
    println!("API key env:  {}", resolved.api_key_env);
    println!("Timeout:      {}s", resolved.timeout_secs);
    Ok(())
}
