//! Reference portfolio loaded into a fresh store.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::access::Person;
use super::audit::AuditEntry;
use super::innovations::{ImpactLevel, Innovation, InnovationCategory, InnovationStatus, TimeHorizon};
use super::projects::{DocumentKind, Portfolio, Project, ProjectDocument, ProjectPhase, TaggedDocuments};

/// Regions offered when planning a launch
pub const REGIONS: [&str; 4] = ["North America", "EMEA", "APAC", "LATAM"];

/// Therapeutic areas offered when creating projects
pub const THERAPEUTIC_AREAS: [&str; 8] = [
    "Oncology",
    "Immunology",
    "Neuroscience",
    "Cardiovascular & Metabolism",
    "Pulmonary Hypertension",
    "Infectious Diseases & Vaccines",
    "Retina/Ophthalmology",
    "Dermatology",
];

#[allow(clippy::too_many_arguments)]
fn project(
    id: &str,
    name: &str,
    area: &str,
    phase: ProjectPhase,
    target_date: &str,
    region: &str,
    sharepoint_url: &str,
    docs: (bool, bool, bool),
) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        asset: "Asset Name".to_string(),
        therapeutic_area: area.to_string(),
        phase,
        target_date: target_date.to_string(),
        region: Some(region.to_string()),
        sharepoint_url: sharepoint_url.to_string(),
        tagged_documents: TaggedDocuments {
            lrfp: docs.0,
            tpp: docs.1,
            cdp: docs.2,
        },
    }
}

pub fn aip_projects() -> Vec<Project> {
    vec![
        project(
            "aip-1",
            "Project 1",
            "Immunology",
            ProjectPhase::Phase3,
            "2025-06-30",
            "EMEA",
            "https://jnj.sharepoint.com/projects/2113",
            (true, true, false),
        ),
        project(
            "aip-2",
            "Project 2",
            "Dermatology",
            ProjectPhase::Phase2,
            "2026-12-01",
            "North America",
            "https://jnj.sharepoint.com/projects/tremfya",
            (true, true, true),
        ),
        project(
            "aip-3",
            "Project 3",
            "Immunology",
            ProjectPhase::Submission,
            "2024-11-15",
            "North America",
            "https://jnj.sharepoint.com/projects/stelara-psa",
            (true, true, true),
        ),
        project(
            "aip-4",
            "Project 4",
            "Immunology",
            ProjectPhase::Phase3,
            "2025-09-12",
            "Global",
            "https://jnj.sharepoint.com/projects/guselkumab-uc",
            (true, false, false),
        ),
        project(
            "aip-5",
            "Project 5",
            "Neuroscience",
            ProjectPhase::Phase2,
            "2027-02-20",
            "EMEA",
            "https://jnj.sharepoint.com/projects/nipocalimab",
            (false, true, false),
        ),
    ]
}

pub fn launch_projects() -> Vec<Project> {
    vec![
        project(
            "launch-1",
            "Project 6",
            "Immunology",
            ProjectPhase::Submission,
            "2024-11-15",
            "North America",
            "https://jnj.sharepoint.com/launch/stelara",
            (true, true, true),
        ),
        project(
            "launch-2",
            "Project 7",
            "Dermatology",
            ProjectPhase::Submission,
            "2025-03-20",
            "EMEA",
            "https://jnj.sharepoint.com/launch/tremfya-eu",
            (true, true, true),
        ),
    ]
}

/// One block of identical innovations differing only by index
struct InnovationBatch {
    id_prefix: &'static str,
    count: usize,
    project_id: &'static str,
    title: &'static str,
    description: &'static str,
    category: InnovationCategory,
    impact_level: ImpactLevel,
    time_horizon: TimeHorizon,
    status: InnovationStatus,
    created_at: &'static str,
    created_by: &'static str,
}

static INNOVATION_BATCHES: [InnovationBatch; 6] = [
    InnovationBatch {
        id_prefix: "inn-dev",
        count: 12,
        project_id: "aip-1",
        title: "Device Innovation",
        description: "Strategic device optimization.",
        category: InnovationCategory::Device,
        impact_level: ImpactLevel::Patient,
        time_horizon: TimeHorizon::Near,
        status: InnovationStatus::InPlan,
        created_at: "2024-01-15",
        created_by: "Admin",
    },
    InnovationBatch {
        id_prefix: "inn-dig",
        count: 2,
        project_id: "aip-1",
        title: "Digital Innovation",
        description: "Digital health platform.",
        category: InnovationCategory::Digital,
        impact_level: ImpactLevel::Patient,
        time_horizon: TimeHorizon::Mid,
        status: InnovationStatus::Idea,
        created_at: "2024-02-10",
        created_by: "Lead",
    },
    InnovationBatch {
        id_prefix: "inn-for",
        count: 6,
        project_id: "aip-2",
        title: "Formulation Innovation",
        description: "Next-gen formulation.",
        category: InnovationCategory::Formulation,
        impact_level: ImpactLevel::Clinical,
        time_horizon: TimeHorizon::Long,
        status: InnovationStatus::UnderEvaluation,
        created_at: "2024-03-05",
        created_by: "Planner",
    },
    InnovationBatch {
        id_prefix: "inn-acc",
        count: 5,
        project_id: "aip-3",
        title: "Access Innovation",
        description: "Market access strategy.",
        category: InnovationCategory::Access,
        impact_level: ImpactLevel::Commercial,
        time_horizon: TimeHorizon::Near,
        status: InnovationStatus::InPlan,
        created_at: "2024-04-12",
        created_by: "Lead",
    },
    InnovationBatch {
        id_prefix: "inn-ie",
        count: 1,
        project_id: "aip-3",
        title: "Indication Expansion",
        description: "Pediatric expansion study.",
        category: InnovationCategory::IndicationExpansion,
        impact_level: ImpactLevel::Clinical,
        time_horizon: TimeHorizon::Mid,
        status: InnovationStatus::InPlan,
        created_at: "2024-05-01",
        created_by: "Planner",
    },
    InnovationBatch {
        id_prefix: "inn-lc",
        count: 3,
        project_id: "aip-4",
        title: "Lifecycle Innovation",
        description: "Supply chain transparency.",
        category: InnovationCategory::Lifecycle,
        impact_level: ImpactLevel::Operational,
        time_horizon: TimeHorizon::Long,
        status: InnovationStatus::Idea,
        created_at: "2024-07-20",
        created_by: "Lead",
    },
];

pub fn innovations() -> Vec<Innovation> {
    INNOVATION_BATCHES
        .iter()
        .flat_map(|batch| {
            (0..batch.count).map(move |i| Innovation {
                id: format!("{}-{}", batch.id_prefix, i),
                project_id: batch.project_id.to_string(),
                title: format!("{} {}", batch.title, i),
                description: batch.description.to_string(),
                category: batch.category,
                impact_level: batch.impact_level,
                time_horizon: batch.time_horizon,
                status: batch.status,
                created_at: batch.created_at.to_string(),
                created_by: batch.created_by.to_string(),
                start_date: None,
                end_date: None,
            })
        })
        .collect()
}

pub fn people() -> Vec<Person> {
    [
        ("Sarah Connor", "sarah.c@jnj.com", "SC"),
        ("John Miller", "john.m@jnj.com", "JM"),
        ("Ellen Ripley", "ellen.r@jnj.com", "ER"),
        ("James Holden", "james.h@jnj.com", "JH"),
    ]
    .into_iter()
    .map(|(name, email, initials)| Person {
        name: name.to_string(),
        email: email.to_string(),
        initials: initials.to_string(),
    })
    .collect()
}

/// Document library of the first AIP project, newest first
pub fn documents() -> Vec<ProjectDocument> {
    let rows = [
        (
            "doc-1",
            "2024 Strategic LRFP Final",
            "https://jnj.sharepoint.com/sites/AIP/Docs/LRFP_2024.pdf",
            DocumentKind::Lrfp,
            "2024-03-10",
            "Jane Doe",
        ),
        (
            "doc-2",
            "Target Product Profile v2.1",
            "https://jnj.sharepoint.com/sites/AIP/Docs/TPP_Rev.docx",
            DocumentKind::Tpp,
            "2024-04-15",
            "John Smith",
        ),
    ];

    rows.into_iter()
        .map(|(id, name, url, tag, date, user)| ProjectDocument {
            id: id.to_string(),
            project_id: "aip-1".to_string(),
            name: name.to_string(),
            url: url.to_string(),
            tags: vec![tag],
            date: date.to_string(),
            added_by: user.to_string(),
        })
        .collect()
}

/// Historical audit rows, oldest first
pub fn audit_entries() -> Vec<AuditEntry> {
    let rows: [(&str, &str, &str, &str, &str, Portfolio); 10] = [
        ("Project Creation", "-", "Asset Name", "planner.s@jnj.com", "2024-05-17 14:00:00", Portfolio::Aip),
        ("LRFP Document Synced", "Not Set", "Linked", "bot.sys@jnj.com", "2024-05-18 16:22:11", Portfolio::Aip),
        ("Phase Shift", "Phase 2", "Phase 3", "admin.h@jnj.com", "2024-05-19 09:15:44", Portfolio::Aip),
        ("Innovation Tagging", "0/3", "1/3", "lead.i@jnj.com", "2024-05-20 10:45:00", Portfolio::Aip),
        ("Budget Approval", "Pending", "Approved", "finance.a@jnj.com", "2024-05-20 14:15:22", Portfolio::Launch),
        ("Budget Update", "$2.5M", "$3.1M", "planner.s@jnj.com", "2024-05-20 14:32:01", Portfolio::Aip),
        ("Regulatory Status", "Submitted", "Under Review", "compliance.o@jnj.com", "2024-05-20 16:30:00", Portfolio::Launch),
        ("Supply Chain Sync", "Initial Draft", "Synchronized", "ops.m@jnj.com", "2024-05-21 09:45:12", Portfolio::Launch),
        ("Milestone Date Update", "2024-11-15", "2024-12-01", "lead.l@jnj.com", "2024-05-21 10:20:00", Portfolio::Launch),
        ("Asset Valuation Update", "$4.2B", "$4.8B", "planner.s@jnj.com", "2024-05-21 11:15:33", Portfolio::Aip),
    ];

    rows.into_iter()
        .map(|(activity, from, to, user, time, portfolio)| AuditEntry {
            activity: activity.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            user: user.to_string(),
            time: seed_time(time),
            portfolio: Some(portfolio),
        })
        .collect()
}

fn seed_time(raw: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|t| t.and_utc())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innovation_seed_counts() {
        let all = innovations();
        assert_eq!(all.len(), 29);
        assert_eq!(all[0].id, "inn-dev-0");
        assert_eq!(all[0].title, "Device Innovation 0");
        assert_eq!(all.last().map(|i| i.id.as_str()), Some("inn-lc-2"));
    }

    #[test]
    fn test_audit_seed_is_chronological() {
        let entries = audit_entries();
        assert_eq!(entries.len(), 10);
        assert!(entries.iter().all(|e| e.time.timestamp() > 0));
        assert!(entries.windows(2).all(|w| w[0].time <= w[1].time));
    }
}
