//! # Portfolio Store
//!
//! Single in-memory store for all console state. Managers borrow a shared
//! handle to the tables; nothing outlives the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::access::{AccessGrant, Person};
use super::audit::AuditEntry;
use super::innovations::Innovation;
use super::launch_plans::LaunchPlan;
use super::projects::{Portfolio, Project, ProjectDocument};
use super::seed;

/// Backing collections shared by all managers
#[derive(Debug, Default)]
pub struct Tables {
    pub(crate) aip_projects: Vec<Project>,
    pub(crate) launch_projects: Vec<Project>,
    pub(crate) innovations: Vec<Innovation>,
    /// Project document libraries, newest first
    pub(crate) documents: Vec<ProjectDocument>,
    /// Keyed by launch project id; one plan per project
    pub(crate) launch_plans: HashMap<String, LaunchPlan>,
    pub(crate) grants: Vec<AccessGrant>,
    pub(crate) people: Vec<Person>,
    /// Oldest first
    pub(crate) audit: Vec<AuditEntry>,
    next_id: u64,
}

impl Tables {
    /// Allocate an id like `inn-0007`. Seed data uses unpadded ids, so the two never collide.
    pub(crate) fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{:04}", prefix, self.next_id)
    }

    pub(crate) fn projects(&self, portfolio: Portfolio) -> &Vec<Project> {
        match portfolio {
            Portfolio::Aip => &self.aip_projects,
            Portfolio::Launch => &self.launch_projects,
        }
    }

    pub(crate) fn projects_mut(&mut self, portfolio: Portfolio) -> &mut Vec<Project> {
        match portfolio {
            Portfolio::Aip => &mut self.aip_projects,
            Portfolio::Launch => &mut self.launch_projects,
        }
    }

    /// Portfolio a project id belongs to, if any
    pub(crate) fn portfolio_of(&self, project_id: &str) -> Option<Portfolio> {
        Portfolio::all()
            .into_iter()
            .find(|p| self.projects(*p).iter().any(|project| project.id == project_id))
    }

    pub(crate) fn record(&mut self, entry: AuditEntry) {
        self.audit.push(entry);
    }
}

/// In-memory store handle
#[derive(Clone, Default)]
pub struct PortfolioStore {
    tables: Arc<Mutex<Tables>>,
}

impl PortfolioStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store populated with the reference portfolio
    pub fn seeded() -> Self {
        let tables = Tables {
            aip_projects: seed::aip_projects(),
            launch_projects: seed::launch_projects(),
            innovations: seed::innovations(),
            documents: seed::documents(),
            people: seed::people(),
            audit: seed::audit_entries(),
            ..Tables::default()
        };
        tracing::debug!(
            aip = tables.aip_projects.len(),
            launch = tables.launch_projects.len(),
            innovations = tables.innovations.len(),
            "Seeded portfolio store"
        );
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    /// Get a shared handle to the tables for use by managers
    pub fn tables(&self) -> Arc<Mutex<Tables>> {
        Arc::clone(&self.tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let mut tables = Tables::default();
        let a = tables.next_id("aip");
        let b = tables.next_id("aip");
        assert_eq!(a, "aip-0001");
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_store_has_both_portfolios() {
        let store = PortfolioStore::seeded();
        let tables = store.tables();
        let tables = tables.lock().unwrap();
        assert_eq!(tables.aip_projects.len(), 5);
        assert_eq!(tables.launch_projects.len(), 2);
        assert_eq!(tables.documents.len(), 2);
        assert_eq!(tables.portfolio_of("aip-3"), Some(Portfolio::Aip));
        assert_eq!(tables.portfolio_of("launch-2"), Some(Portfolio::Launch));
        assert_eq!(tables.portfolio_of("nope"), None);
    }
}
