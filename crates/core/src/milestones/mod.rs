//! # Launch Milestones
//!
//! Generation of launch back-scheduling milestones through a generative
//! completion service with a structured JSON response schema.
//!
//! ## Flow
//!
//! ```text
//! GenerationRequest ──► prompts::render ──► CompletionBackend (Gemini)
//!                                                  │ raw text
//!                                                  ▼
//!                               schema::parse_milestones (per-item validation)
//!                                                  │
//!                                                  ▼
//!                                        Vec<MilestoneDraft>
//! ```
//!
//! `MilestoneGenerator::generate_milestones` never fails: every error is
//! logged and collapsed into an empty list. Use `try_generate` when the
//! caller needs to tell "nothing produced" apart from "call failed".

pub mod backend;
pub mod error;
pub mod generator;
pub mod prompts;
pub mod schema;
pub mod types;

pub use backend::{CompletionBackend, CompletionRequest, GeminiBackend};
pub use error::GenerationError;
pub use generator::{GenerationOutcome, MilestoneGenerator};
pub use types::{parse_milestone_date, GenerationRequest, MilestoneDraft, MilestoneStatus};
