//! # Access Governance
//!
//! Directory lookup and project-level access grants across both portfolios.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use super::audit::AuditEntry;
use super::projects::{Portfolio, Project};
use super::store::{PortfolioStore, Tables};

/// Permission level carried by a grant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    View,
    Edit,
    Admin,
}

impl AccessLevel {
    pub fn all() -> [AccessLevel; 3] {
        [Self::View, Self::Edit, Self::Admin]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Admin => "admin",
        }
    }

    /// What a holder of this level may do
    pub fn description(&self) -> &'static str {
        match self {
            Self::View => "Read documents, timelines and innovations without changing them",
            Self::Edit => "Modify timelines, upload documents and capture innovations",
            Self::Admin => "Full control over the selected projects, including settings and team",
        }
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown access level: {} (expected view, edit or admin)", other)),
        }
    }
}

/// Directory entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub email: String,
    pub initials: String,
}

/// Request to grant one person access to a set of projects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantRequest {
    pub email: String,
    pub portfolios: Vec<Portfolio>,
    pub project_ids: Vec<String>,
    pub level: AccessLevel,
}

/// A recorded grant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub id: String,
    pub person: Person,
    pub portfolios: Vec<Portfolio>,
    pub project_ids: Vec<String>,
    pub level: AccessLevel,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
}

impl AccessGrant {
    /// Whether any granted project sits in the given portfolio
    pub fn covers(&self, portfolio: Portfolio) -> bool {
        self.portfolios.contains(&portfolio)
    }
}

/// Grant counts for one portfolio
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioAccessStats {
    pub grants_by_level: BTreeMap<AccessLevel, usize>,
    pub distinct_users: usize,
}

/// Manager for the people directory and access grants
pub struct AccessManager {
    tables: Arc<Mutex<Tables>>,
}

impl AccessManager {
    pub fn new(store: &PortfolioStore) -> Self {
        Self {
            tables: store.tables(),
        }
    }

    /// Case-insensitive match on name or email. A blank query matches nobody.
    pub fn search_people(&self, query: &str) -> Result<Vec<Person>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        Ok(tables
            .people
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    /// Projects selectable for the given portfolios, AIP first
    pub fn candidate_projects(&self, portfolios: &[Portfolio]) -> Result<Vec<Project>> {
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        Ok(candidates(&tables, portfolios))
    }

    /// Record a grant after validating person, portfolios and projects
    pub fn grant(&self, request: GrantRequest, granted_by: &str) -> Result<AccessGrant> {
        let mut portfolios = request.portfolios;
        portfolios.sort();
        portfolios.dedup();
        if portfolios.is_empty() {
            anyhow::bail!("Select at least one portfolio");
        }

        let mut seen = HashSet::new();
        let project_ids: Vec<String> = request
            .project_ids
            .into_iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty() && seen.insert(id.clone()))
            .collect();
        if project_ids.is_empty() {
            anyhow::bail!("Select at least one project");
        }

        let mut tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let email = request.email.trim().to_lowercase();
        let person = tables
            .people
            .iter()
            .find(|p| p.email.to_lowercase() == email)
            .cloned()
            .with_context(|| format!("No person in directory with email: {}", request.email))?;

        for id in &project_ids {
            match tables.portfolio_of(id) {
                Some(owner) if portfolios.contains(&owner) => {}
                Some(owner) => anyhow::bail!(
                    "Project {} belongs to {}, which is not among the selected portfolios ({})",
                    id,
                    owner.as_str(),
                    portfolios.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
                ),
                None => anyhow::bail!("Project not found: {}", id),
            }
        }

        let grant = AccessGrant {
            id: tables.next_id("grant"),
            person,
            portfolios,
            project_ids,
            level: request.level,
            granted_by: granted_by.to_string(),
            granted_at: Utc::now(),
        };

        tables.grants.push(grant.clone());
        let portfolio = match grant.portfolios.as_slice() {
            [single] => Some(*single),
            _ => None,
        };
        tables.record(AuditEntry::new(
            "Access Granted",
            grant.person.email.clone(),
            format!("{} on {} project(s)", grant.level.as_str().to_uppercase(), grant.project_ids.len()),
            granted_by,
            portfolio,
        ));
        tracing::info!(
            grant_id = %grant.id,
            email = %grant.person.email,
            level = grant.level.as_str(),
            projects = grant.project_ids.len(),
            "Access granted"
        );

        Ok(grant)
    }

    /// Remove a grant by id
    pub fn revoke(&self, grant_id: &str, revoked_by: &str) -> Result<AccessGrant> {
        let mut tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let index = tables
            .grants
            .iter()
            .position(|g| g.id == grant_id)
            .with_context(|| format!("Grant not found: {}", grant_id))?;
        let grant = tables.grants.remove(index);

        let portfolio = match grant.portfolios.as_slice() {
            [single] => Some(*single),
            _ => None,
        };
        tables.record(AuditEntry::new(
            "Access Revoked",
            grant.level.as_str().to_uppercase(),
            "-",
            revoked_by,
            portfolio,
        ));
        tracing::info!(grant_id, email = %grant.person.email, "Access revoked");

        Ok(grant)
    }

    /// All grants in the order they were made
    pub fn list(&self) -> Result<Vec<AccessGrant>> {
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;
        Ok(tables.grants.clone())
    }

    pub fn grants_for(&self, email: &str) -> Result<Vec<AccessGrant>> {
        let email = email.trim().to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|g| g.person.email.to_lowercase() == email)
            .collect())
    }

    /// Per-portfolio grant counts by level and distinct grantees
    pub fn stats(&self) -> Result<BTreeMap<Portfolio, PortfolioAccessStats>> {
        let grants = self.list()?;
        let mut stats = BTreeMap::new();

        for portfolio in Portfolio::all() {
            let mut entry = PortfolioAccessStats::default();
            let mut users = HashSet::new();
            for grant in grants.iter().filter(|g| g.covers(portfolio)) {
                *entry.grants_by_level.entry(grant.level).or_insert(0) += 1;
                users.insert(grant.person.email.to_lowercase());
            }
            entry.distinct_users = users.len();
            stats.insert(portfolio, entry);
        }

        Ok(stats)
    }
}

fn candidates(tables: &Tables, portfolios: &[Portfolio]) -> Vec<Project> {
    Portfolio::all()
        .into_iter()
        .filter(|p| portfolios.contains(p))
        .flat_map(|p| tables.projects(p).iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(portfolios: Vec<Portfolio>, ids: &[&str], level: AccessLevel) -> GrantRequest {
        GrantRequest {
            email: "john.m@jnj.com".to_string(),
            portfolios,
            project_ids: ids.iter().map(|s| s.to_string()).collect(),
            level,
        }
    }

    #[test]
    fn test_search_people() {
        let store = PortfolioStore::seeded();
        let access = AccessManager::new(&store);

        let found = access.search_people("RIPLEY").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].initials, "ER");

        assert_eq!(access.search_people("jnj.com").unwrap().len(), 4);
        assert!(access.search_people("   ").unwrap().is_empty());
    }

    #[test]
    fn test_candidate_projects_union() {
        let store = PortfolioStore::seeded();
        let access = AccessManager::new(&store);

        assert_eq!(access.candidate_projects(&[Portfolio::Launch]).unwrap().len(), 2);
        let both = access
            .candidate_projects(&[Portfolio::Launch, Portfolio::Aip])
            .unwrap();
        assert_eq!(both.len(), 7);
        assert_eq!(both[0].id, "aip-1");
        assert!(access.candidate_projects(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_grant_validates_and_dedupes() {
        let store = PortfolioStore::seeded();
        let access = AccessManager::new(&store);

        let grant = access
            .grant(
                request(vec![Portfolio::Aip], &["aip-1", "aip-2", "aip-1"], AccessLevel::Edit),
                "admin",
            )
            .unwrap();
        assert_eq!(grant.project_ids, vec!["aip-1", "aip-2"]);
        assert_eq!(grant.person.name, "John Miller");

        // project outside the selected portfolio
        let err = access
            .grant(request(vec![Portfolio::Aip], &["launch-1"], AccessLevel::View), "admin")
            .unwrap_err();
        assert!(err.to_string().contains("belongs to launch"));
        let err = access
            .grant(request(vec![Portfolio::Aip], &["aip-99"], AccessLevel::View), "admin")
            .unwrap_err();
        assert!(err.to_string().contains("Project not found: aip-99"));
        assert!(access
            .grant(request(vec![], &["aip-1"], AccessLevel::View), "admin")
            .is_err());
        assert!(access
            .grant(request(vec![Portfolio::Aip], &[], AccessLevel::View), "admin")
            .is_err());

        let mut stranger = request(vec![Portfolio::Aip], &["aip-1"], AccessLevel::View);
        stranger.email = "nobody@jnj.com".to_string();
        assert!(access.grant(stranger, "admin").is_err());

        assert_eq!(access.list().unwrap().len(), 1);
    }

    #[test]
    fn test_revoke_and_stats() {
        let store = PortfolioStore::seeded();
        let access = AccessManager::new(&store);

        let first = access
            .grant(
                request(vec![Portfolio::Aip, Portfolio::Launch], &["aip-3", "launch-1"], AccessLevel::Admin),
                "admin",
            )
            .unwrap();
        let mut second = request(vec![Portfolio::Launch], &["launch-2"], AccessLevel::View);
        second.email = "SARAH.C@jnj.com".to_string();
        access.grant(second, "admin").unwrap();

        let stats = access.stats().unwrap();
        assert_eq!(stats[&Portfolio::Aip].distinct_users, 1);
        assert_eq!(stats[&Portfolio::Launch].distinct_users, 2);
        assert_eq!(stats[&Portfolio::Launch].grants_by_level.get(&AccessLevel::View), Some(&1));

        assert_eq!(access.grants_for("john.m@jnj.com").unwrap().len(), 1);
        access.revoke(&first.id, "admin").unwrap();
        assert!(access.grants_for("john.m@jnj.com").unwrap().is_empty());
        assert!(access.revoke(&first.id, "admin").is_err());
    }
}
