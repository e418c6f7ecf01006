//! Portfolio Console
//!
//! Command-line surface over the in-memory portfolio store. Every run starts
//! from the reference portfolio; nothing but `config set` touches disk.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use portfolio_core::state::{
    authenticate, AccessLevel, DocumentKind, ImpactLevel, InnovationCategory, InnovationStatus,
    NewDocument, NewInnovation, NewProject, Portfolio, ProjectPhase, TimeHorizon,
};

use crate::commands::{Console, InnovationQuery, PlanTarget};
use crate::config::PersistedConfig;

const DEFAULT_LOG_FILTER: &str = "portfolio_core=info,portfolio_console=info";

#[derive(Parser, Clone)]
#[command(author, version, about = "Portfolio - Asset and Launch Planning Console")]
struct Args {
    /// Username (admin, planner or launcher)
    #[arg(short, long, global = true)]
    user: Option<String>,
    /// Password for the user
    #[arg(short, long, global = true)]
    password: Option<String>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    /// Override the generation model
    #[arg(long, global = true)]
    model: Option<String>,
    /// Override the generation endpoint
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// List or search projects in a portfolio
    Projects {
        #[arg(long, default_value = "aip")]
        portfolio: Portfolio,
        /// Case-insensitive search over name, therapeutic area and asset
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List and filter captured innovations
    Innovations {
        /// Restrict to one AIP project
        #[arg(long)]
        project: Option<String>,
        /// Search over title and description
        #[arg(short, long)]
        search: Option<String>,
        /// Category filter (repeatable)
        #[arg(long)]
        category: Vec<String>,
        /// Impact level filter (repeatable)
        #[arg(long)]
        impact: Vec<String>,
        /// Time horizon filter (repeatable)
        #[arg(long)]
        horizon: Vec<String>,
    },
    /// Create a project in a portfolio
    AddProject {
        #[arg(long, default_value = "aip")]
        portfolio: Portfolio,
        #[arg(long)]
        name: String,
        /// Therapeutic area
        #[arg(long)]
        area: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Asset (AIP only; defaults to the name)
        #[arg(long)]
        asset: Option<String>,
        /// Starting phase (AIP only; defaults to Phase 1)
        #[arg(long)]
        phase: Option<ProjectPhase>,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        sharepoint_url: Option<String>,
    },
    /// Move a project to another phase
    Phase {
        #[arg(long, default_value = "aip")]
        portfolio: Portfolio,
        #[arg(long)]
        project: String,
        /// New phase, e.g. "Phase 3"
        #[arg(long)]
        to: ProjectPhase,
    },
    /// Tag or untag a planning document (LRFP, TPP, CDP) on a project
    Tag {
        #[arg(long, default_value = "aip")]
        portfolio: Portfolio,
        #[arg(long)]
        project: String,
        #[arg(long)]
        document: DocumentKind,
        /// Remove the tag instead of setting it
        #[arg(long)]
        clear: bool,
    },
    /// List a project's document library
    Documents {
        #[arg(long, default_value = "aip")]
        portfolio: Portfolio,
        #[arg(long)]
        project: String,
    },
    /// Add a document to a project's library
    AddDocument {
        #[arg(long, default_value = "aip")]
        portfolio: Portfolio,
        #[arg(long)]
        project: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        /// Planning document tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<DocumentKind>,
    },
    /// Capture an innovation on an AIP project
    Capture {
        #[arg(long)]
        project: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<InnovationCategory>,
        #[arg(long)]
        impact: Option<ImpactLevel>,
        #[arg(long)]
        horizon: Option<TimeHorizon>,
        #[arg(long)]
        status: Option<InnovationStatus>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },
    /// Show portfolio dashboard figures
    Dashboard {
        #[arg(long, default_value = "aip")]
        portfolio: Portfolio,
    },
    /// Generate a launch milestone plan
    Plan {
        /// Existing launch project id
        #[arg(long, conflicts_with_all = ["area", "date", "region"])]
        project: Option<String>,
        /// Therapeutic area
        #[arg(long)]
        area: Option<String>,
        /// Target launch date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Launch region
        #[arg(long)]
        region: Option<String>,
        /// Register the launch under this name before planning
        #[arg(long, requires = "area")]
        name: Option<String>,
    },
    /// Grant a person access to projects
    Grant {
        /// Directory email of the grantee
        #[arg(long)]
        email: String,
        /// Portfolio(s) the projects belong to (repeatable)
        #[arg(long = "portfolio", required = true)]
        portfolios: Vec<Portfolio>,
        /// Project id(s) to grant (repeatable)
        #[arg(long = "project", required = true)]
        projects: Vec<String>,
        #[arg(long, default_value = "view")]
        level: AccessLevel,
    },
    /// Revoke an access grant
    Revoke {
        #[arg(long)]
        grant: String,
    },
    /// Show access grants and per-portfolio statistics
    Access,
    /// Show the audit trail, newest first
    Audit {
        #[arg(long)]
        portfolio: Option<Portfolio>,
    },
    /// Show or change persisted console settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set a key (model, base_url, api_key_env, timeout_secs); empty value clears it
    Set { key: String, value: String },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_files = config::load_env();
    init_tracing();
    for path in &env_files {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let args = Args::parse();

    let mut persisted = PersistedConfig::load().await;

    if let CliCommand::Config { action } = &args.command {
        return match action {
            ConfigAction::Show => commands::show_config(&persisted, args.json),
            ConfigAction::Set { key, value } => {
                persisted.set(key, value)?;
                persisted.save().await?;
                println!("Saved {} to {}", key, PersistedConfig::path().display());
                Ok(())
            }
        };
    }

    persisted.merge(PersistedConfig {
        model: args.model.clone(),
        base_url: args.base_url.clone(),
        ..PersistedConfig::default()
    });

    let (Some(username), Some(password)) = (args.user.as_deref(), args.password.as_deref()) else {
        anyhow::bail!("--user and --password are required");
    };
    let Some(user) = authenticate(username, password) else {
        anyhow::bail!("Invalid username or password");
    };
    tracing::debug!(user = %user.username, "Console session started");

    let console = Console::new(user, persisted.to_model_config(), args.json);

    match args.command {
        CliCommand::Projects { portfolio, search } => console.projects(portfolio, search.as_deref()),
        CliCommand::Innovations {
            project,
            search,
            category,
            impact,
            horizon,
        } => console.innovations(InnovationQuery {
            project,
            search,
            categories: category,
            impacts: impact,
            horizons: horizon,
        }),
        CliCommand::AddProject {
            portfolio,
            name,
            area,
            date,
            asset,
            phase,
            region,
            sharepoint_url,
        } => console.add_project(
            portfolio,
            NewProject {
                name,
                asset,
                therapeutic_area: area,
                phase,
                target_date: date,
                region,
                sharepoint_url,
                ..NewProject::default()
            },
        ),
        CliCommand::Phase {
            portfolio,
            project,
            to,
        } => console.set_phase(portfolio, &project, to),
        CliCommand::Tag {
            portfolio,
            project,
            document,
            clear,
        } => console.tag(portfolio, &project, document, !clear),
        CliCommand::Documents { portfolio, project } => console.documents(portfolio, &project),
        CliCommand::AddDocument {
            portfolio,
            project,
            name,
            url,
            tags,
        } => console.add_document(portfolio, &project, NewDocument { name, url, tags }),
        CliCommand::Capture {
            project,
            title,
            description,
            category,
            impact,
            horizon,
            status,
            start,
            end,
        } => {
            let mut new = NewInnovation::new(project, title);
            new.description = description.unwrap_or_default();
            new.category = category.unwrap_or(new.category);
            new.impact_level = impact.unwrap_or(new.impact_level);
            new.time_horizon = horizon.unwrap_or(new.time_horizon);
            new.status = status.unwrap_or(new.status);
            new.start_date = start;
            new.end_date = end;
            console.capture(new)
        }
        CliCommand::Dashboard { portfolio } => console.dashboard(portfolio),
        CliCommand::Plan {
            project,
            area,
            date,
            region,
            name,
        } => {
            let target = match (project, area, date, region) {
                (Some(project_id), _, _, _) => PlanTarget::Project(project_id),
                (None, Some(area), Some(date), Some(region)) => PlanTarget::AdHoc {
                    name,
                    area,
                    date,
                    region,
                },
                _ => anyhow::bail!("Provide --project, or --area with --date and --region"),
            };
            console.plan(target).await
        }
        CliCommand::Grant {
            email,
            portfolios,
            projects,
            level,
        } => console.grant(email, portfolios, projects, level),
        CliCommand::Revoke { grant } => console.revoke(&grant),
        CliCommand::Access => console.access(),
        CliCommand::Audit { portfolio } => console.audit(portfolio),
        CliCommand::Config { .. } => Ok(()),
    }
}
