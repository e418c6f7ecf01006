//! # Audit Trail
//!
//! Change log for portfolio mutations, appended by the managers.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use super::projects::Portfolio;
use super::store::{PortfolioStore, Tables};

/// One recorded change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub activity: String,
    pub from: String,
    pub to: String,
    pub user: String,
    pub time: DateTime<Utc>,
    /// `None` for changes spanning both portfolios
    #[serde(default)]
    pub portfolio: Option<Portfolio>,
}

impl AuditEntry {
    pub fn new(
        activity: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        user: impl Into<String>,
        portfolio: Option<Portfolio>,
    ) -> Self {
        Self {
            activity: activity.into(),
            from: from.into(),
            to: to.into(),
            user: user.into(),
            time: Utc::now(),
            portfolio,
        }
    }
}

/// Read access to the audit trail
pub struct AuditTrail {
    tables: Arc<Mutex<Tables>>,
}

impl AuditTrail {
    pub fn new(store: &PortfolioStore) -> Self {
        Self {
            tables: store.tables(),
        }
    }

    /// Entries newest first, optionally restricted to one portfolio.
    ///
    /// Cross-portfolio entries appear under every filter.
    pub fn list(&self, portfolio: Option<Portfolio>) -> Result<Vec<AuditEntry>> {
        let tables = self
            .tables
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let entries = tables
            .audit
            .iter()
            .rev()
            .filter(|entry| match (portfolio, entry.portfolio) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => true,
            })
            .cloned()
            .collect();
        Ok(entries)
    }
}
