pub mod access;
pub mod audit;
pub mod dashboard;
pub mod innovations;
pub mod launch_plans;
pub mod projects;
pub mod seed;
pub mod store;
pub mod users;

pub use store::PortfolioStore;

pub use access::{AccessGrant, AccessLevel, AccessManager, GrantRequest, Person, PortfolioAccessStats};
pub use audit::{AuditEntry, AuditTrail};
pub use dashboard::{AssetDashboard, LaunchDashboard, PhaseShare};
pub use innovations::{
    ImpactLevel, Innovation, InnovationCategory, InnovationFilter, InnovationManager,
    InnovationStatus, NewInnovation, TimeHorizon,
};
pub use launch_plans::{LaunchPlan, LaunchPlanManager, Milestone, PlanStatus, MANUAL_PLAN_ID};
pub use projects::{
    DocumentKind, NewDocument, NewProject, Portfolio, Project, ProjectDocument, ProjectManager,
    ProjectPhase, TaggedDocuments,
};
pub use users::{authenticate, Module, User, UserRole};
