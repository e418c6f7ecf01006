//! # Project Management
//!
//! AIP and launch projects live in two independent portfolios. Each
//! `ProjectManager` is bound to one of them.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use super::audit::AuditEntry;
use super::store::{PortfolioStore, Tables};

/// Region assumed for launch projects created without one
pub const DEFAULT_REGION: &str = "North America";

/// Which project collection a record belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Portfolio {
    /// Asset innovation planning
    Aip,
    /// Launch planning
    Launch,
}

impl Portfolio {
    pub fn all() -> [Portfolio; 2] {
        [Portfolio::Aip, Portfolio::Launch]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aip => "aip",
            Self::Launch => "launch",
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Aip => "Asset Innovation Planning",
            Self::Launch => "Launch Planning",
        }
    }

    fn id_prefix(&self) -> &'static str {
        self.as_str()
    }
}

impl FromStr for Portfolio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aip" | "asset" => Ok(Self::Aip),
            "launch" => Ok(Self::Launch),
            other => Err(format!("Unknown portfolio: {} (expected aip or launch)", other)),
        }
    }
}

/// Development phase of a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProjectPhase {
    #[serde(rename = "Pre-Clinical")]
    PreClinical,
    #[serde(rename = "Phase 1")]
    Phase1,
    #[serde(rename = "Phase 2")]
    Phase2,
    #[serde(rename = "Phase 3")]
    Phase3,
    Submission,
    Launched,
}

impl ProjectPhase {
    pub fn all() -> [ProjectPhase; 6] {
        [
            Self::PreClinical,
            Self::Phase1,
            Self::Phase2,
            Self::Phase3,
            Self::Submission,
            Self::Launched,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreClinical => "Pre-Clinical",
            Self::Phase1 => "Phase 1",
            Self::Phase2 => "Phase 2",
            Self::Phase3 => "Phase 3",
            Self::Submission => "Submission",
            Self::Launched => "Launched",
        }
    }
}

impl FromStr for ProjectPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::all()
            .into_iter()
            .find(|phase| phase.as_str().to_lowercase().replace('-', " ") == wanted)
            .ok_or_else(|| format!("Unknown project phase: {}", s))
    }
}

/// Planning documents that can be tagged on a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    /// Long-range financial plan
    Lrfp,
    /// Target product profile
    Tpp,
    /// Clinical development plan
    Cdp,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lrfp => "LRFP",
            Self::Tpp => "TPP",
            Self::Cdp => "CDP",
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LRFP" => Ok(Self::Lrfp),
            "TPP" => Ok(Self::Tpp),
            "CDP" => Ok(Self::Cdp),
            other => Err(format!("Unknown document tag: {} (expected LRFP, TPP or CDP)", other)),
        }
    }
}

/// Which planning documents are linked
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TaggedDocuments {
    pub lrfp: bool,
    pub tpp: bool,
    pub cdp: bool,
}

impl TaggedDocuments {
    pub fn get(&self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::Lrfp => self.lrfp,
            DocumentKind::Tpp => self.tpp,
            DocumentKind::Cdp => self.cdp,
        }
    }

    fn set(&mut self, kind: DocumentKind, tagged: bool) {
        match kind {
            DocumentKind::Lrfp => self.lrfp = tagged,
            DocumentKind::Tpp => self.tpp = tagged,
            DocumentKind::Cdp => self.cdp = tagged,
        }
    }

    /// Number of tagged documents out of three
    pub fn coverage(&self) -> usize {
        [self.lrfp, self.tpp, self.cdp].iter().filter(|t| **t).count()
    }
}

/// A file in a project's document library
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<DocumentKind>,
    /// ISO date the document was added
    pub date: String,
    pub added_by: String,
}

/// Input for adding a document to a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDocument {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<DocumentKind>,
}

/// A portfolio project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub asset: String,
    pub therapeutic_area: String,
    pub phase: ProjectPhase,
    /// ISO date
    pub target_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default)]
    pub sharepoint_url: String,
    #[serde(default)]
    pub tagged_documents: TaggedDocuments,
}

/// Input for creating a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub asset: Option<String>,
    pub therapeutic_area: String,
    /// Ignored for launch projects, which always start in Submission
    #[serde(default)]
    pub phase: Option<ProjectPhase>,
    pub target_date: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub sharepoint_url: Option<String>,
    #[serde(default)]
    pub tagged_documents: TaggedDocuments,
}

/// Manager for one portfolio's projects
pub struct ProjectManager {
    tables: Arc<Mutex<Tables>>,
    portfolio: Portfolio,
}

impl ProjectManager {
    pub fn new(store: &PortfolioStore, portfolio: Portfolio) -> Self {
        Self {
            tables: store.tables(),
            portfolio,
        }
    }

    pub fn portfolio(&self) -> Portfolio {
        self.portfolio
    }

    /// List all projects, newest first
    pub fn list(&self) -> Result<Vec<Project>> {
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        Ok(tables.projects(self.portfolio).clone())
    }

    /// Load a project by ID
    pub fn load(&self, id: &str) -> Result<Project> {
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        tables
            .projects(self.portfolio)
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .with_context(|| format!("Project not found in {}: {}", self.portfolio.as_str(), id))
    }

    /// Case-insensitive search over name and therapeutic area (and asset, for AIP).
    ///
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Result<Vec<Project>> {
        let needle = query.trim().to_lowercase();
        let include_asset = self.portfolio == Portfolio::Aip;
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.therapeutic_area.to_lowercase().contains(&needle)
                    || (include_asset && p.asset.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Create a new project at the front of the portfolio
    pub fn create(&self, new: NewProject, actor: &str) -> Result<Project> {
        let name = required(&new.name, "name")?;
        let therapeutic_area = required(&new.therapeutic_area, "therapeutic area")?;
        let target_date = required(&new.target_date, "target date")?;
        NaiveDate::parse_from_str(&target_date, "%Y-%m-%d")
            .with_context(|| format!("Target date must be YYYY-MM-DD, got '{}'", target_date))?;

        let non_blank = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (asset, phase, region) = match self.portfolio {
            Portfolio::Aip => (
                non_blank(new.asset).unwrap_or_else(|| name.clone()),
                new.phase.unwrap_or(ProjectPhase::Phase1),
                non_blank(new.region),
            ),
            Portfolio::Launch => (
                name.clone(),
                ProjectPhase::Submission,
                Some(non_blank(new.region).unwrap_or_else(|| DEFAULT_REGION.to_string())),
            ),
        };

        let mut tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let project = Project {
            id: tables.next_id(self.portfolio.id_prefix()),
            name,
            asset,
            therapeutic_area,
            phase,
            target_date,
            region,
            sharepoint_url: non_blank(new.sharepoint_url).unwrap_or_default(),
            tagged_documents: new.tagged_documents,
        };

        tables.projects_mut(self.portfolio).insert(0, project.clone());
        tables.record(AuditEntry::new(
            "Project Creation",
            "-",
            project.name.clone(),
            actor,
            Some(self.portfolio),
        ));
        tracing::info!(project_id = %project.id, portfolio = self.portfolio.as_str(), "Project created");

        Ok(project)
    }

    /// Move a project to another phase
    pub fn update_phase(&self, id: &str, phase: ProjectPhase, actor: &str) -> Result<Project> {
        self.modify(id, actor, |project| {
            let from = project.phase;
            project.phase = phase;
            ("Phase Shift", from.as_str().to_string(), phase.as_str().to_string())
        })
    }

    /// Tag or untag a planning document on a project
    pub fn tag_document(
        &self,
        id: &str,
        kind: DocumentKind,
        tagged: bool,
        actor: &str,
    ) -> Result<Project> {
        self.modify(id, actor, |project| {
            let before = project.tagged_documents.coverage();
            project.tagged_documents.set(kind, tagged);
            (
                "Document Tagging",
                format!("{}/3", before),
                format!("{}/3", project.tagged_documents.coverage()),
            )
        })
    }

    /// Add a document to a project's library.
    ///
    /// Each tag on the document marks that planning document as linked on
    /// the project.
    pub fn add_document(
        &self,
        project_id: &str,
        new: NewDocument,
        actor: &str,
    ) -> Result<ProjectDocument> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            anyhow::bail!("Document name is required");
        }
        let url = new.url.trim().to_string();
        if url.is_empty() {
            anyhow::bail!("Document URL is required");
        }
        let mut tags = new.tags;
        tags.sort();
        tags.dedup();

        let mut tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let project = tables
            .projects_mut(self.portfolio)
            .iter_mut()
            .find(|p| p.id == project_id)
            .with_context(|| {
                format!("Project not found in {}: {}", self.portfolio.as_str(), project_id)
            })?;
        let before = project.tagged_documents.coverage();
        for kind in &tags {
            project.tagged_documents.set(*kind, true);
        }
        let after = project.tagged_documents.coverage();

        let document = ProjectDocument {
            id: tables.next_id("doc"),
            project_id: project_id.to_string(),
            name,
            url,
            tags,
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            added_by: actor.to_string(),
        };

        tables.documents.insert(0, document.clone());
        tables.record(AuditEntry::new(
            "Document Added",
            "-",
            document.name.clone(),
            actor,
            Some(self.portfolio),
        ));
        if after != before {
            tables.record(AuditEntry::new(
                "Document Tagging",
                format!("{}/3", before),
                format!("{}/3", after),
                actor,
                Some(self.portfolio),
            ));
        }
        tracing::info!(document_id = %document.id, project_id, "Document added");

        Ok(document)
    }

    /// A project's document library, newest first
    pub fn documents(&self, project_id: &str) -> Result<Vec<ProjectDocument>> {
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        if !tables.projects(self.portfolio).iter().any(|p| p.id == project_id) {
            anyhow::bail!("Project not found in {}: {}", self.portfolio.as_str(), project_id);
        }
        Ok(tables
            .documents
            .iter()
            .filter(|d| d.project_id == project_id)
            .cloned()
            .collect())
    }

    fn modify(
        &self,
        id: &str,
        actor: &str,
        change: impl FnOnce(&mut Project) -> (&'static str, String, String),
    ) -> Result<Project> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let project = tables
            .projects_mut(self.portfolio)
            .iter_mut()
            .find(|p| p.id == id)
            .with_context(|| format!("Project not found in {}: {}", self.portfolio.as_str(), id))?;

        let (activity, from, to) = change(project);
        let updated = project.clone();
        tables.record(AuditEntry::new(activity, from, to, actor, Some(self.portfolio)));

        Ok(updated)
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        anyhow::bail!("Project {} is required", field);
    }
    Ok(value.to_string())
}
