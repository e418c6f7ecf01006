//! # Portfolio Core
//!
//! Business logic for the portfolio planning console: launch milestone
//! generation, model configuration, and the in-memory portfolio store.
//!
//! ## Architecture
//!
//! - `milestones/` - Gemini-backed launch milestone generation
//! - `models/` - Model, endpoint and API key configuration
//! - `state/` - Projects, innovations, launch plans, access grants and audit trail
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portfolio_core::milestones::MilestoneGenerator;
//! use portfolio_core::models::ModelConfig;
//!
//! let generator = MilestoneGenerator::from_config(&ModelConfig::default())?;
//! let drafts = generator
//!     .generate_milestones("Immunology", "2025-06-30", "EMEA")
//!     .await;
//! ```

pub mod milestones;
pub mod models;
pub mod state;
