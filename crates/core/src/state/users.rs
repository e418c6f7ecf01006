//! # Users and Role Gating
//!
//! Reference accounts and the module each role unlocks.

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Planner,
    Launcher,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Planner => "planner",
            Self::Launcher => "launcher",
        }
    }
}

/// Workspace modules a user may enter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Module {
    #[serde(rename = "Asset Planning")]
    AssetPlanning,
    #[serde(rename = "Launch Planning")]
    LaunchPlanning,
    Administration,
}

impl Module {
    pub fn all() -> [Module; 3] {
        [Self::AssetPlanning, Self::LaunchPlanning, Self::Administration]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssetPlanning => "Asset Planning",
            Self::LaunchPlanning => "Launch Planning",
            Self::Administration => "Administration",
        }
    }
}

/// An authenticated user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub role: UserRole,
    /// Display name
    pub name: String,
}

impl User {
    pub fn can_access(&self, module: Module) -> bool {
        can_access(self.role, module)
    }

    /// Fail unless this user's role unlocks `module`
    pub fn require(&self, module: Module) -> Result<()> {
        if !self.can_access(module) {
            anyhow::bail!(
                "{} is locked for {} ({})",
                module.as_str(),
                self.username,
                self.role.as_str()
            );
        }
        Ok(())
    }

    pub fn modules(&self) -> Vec<Module> {
        Module::all()
            .into_iter()
            .filter(|m| self.can_access(*m))
            .collect()
    }
}

struct Account {
    username: &'static str,
    password: &'static str,
    role: UserRole,
    name: &'static str,
}

static ACCOUNTS: [Account; 3] = [
    Account {
        username: "admin",
        password: "admin",
        role: UserRole::Admin,
        name: "System User",
    },
    Account {
        username: "planner",
        password: "plan",
        role: UserRole::Planner,
        name: "Strategic Planner",
    },
    Account {
        username: "launcher",
        password: "launch",
        role: UserRole::Launcher,
        name: "Launch Lead",
    },
];

/// Check credentials against the reference accounts.
///
/// Both inputs are trimmed; the username is compared case-insensitively.
pub fn authenticate(username: &str, password: &str) -> Option<User> {
    let username = username.trim().to_lowercase();
    let password = password.trim();

    let account = ACCOUNTS
        .iter()
        .find(|a| a.username == username && a.password == password);

    match account {
        Some(a) => {
            tracing::debug!(username = a.username, role = a.role.as_str(), "Authenticated");
            Some(User {
                username: a.username.to_string(),
                role: a.role,
                name: a.name.to_string(),
            })
        }
        None => {
            tracing::warn!(%username, "Rejected login");
            None
        }
    }
}

/// Admin unlocks everything; other roles unlock one module each
pub fn can_access(role: UserRole, module: Module) -> bool {
    match role {
        UserRole::Admin => true,
        UserRole::Planner => module == Module::AssetPlanning,
        UserRole::Launcher => module == Module::LaunchPlanning,
    }
}
