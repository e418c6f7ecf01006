//! End-to-end flows across managers sharing one store.

use portfolio_core::state::{
    authenticate, AccessLevel, AccessManager, AssetDashboard, AuditTrail, GrantRequest,
    ImpactLevel, InnovationManager, Module, NewInnovation, NewProject, Portfolio, PortfolioStore,
    ProjectManager, ProjectPhase,
};

#[test]
fn test_planner_captures_innovation_on_new_project() {
    let store = PortfolioStore::seeded();
    let planner = authenticate("planner", "plan").unwrap();
    planner.require(Module::AssetPlanning).unwrap();

    let projects = ProjectManager::new(&store, Portfolio::Aip);
    let project = projects
        .create(
            NewProject {
                name: "Compound XR-447".to_string(),
                therapeutic_area: "Oncology".to_string(),
                phase: Some(ProjectPhase::PreClinical),
                target_date: "2028-01-31".to_string(),
                ..NewProject::default()
            },
            &planner.username,
        )
        .unwrap();

    let innovations = InnovationManager::new(&store);
    let mut idea = NewInnovation::new(&project.id, "Pediatric Formulation");
    idea.impact_level = ImpactLevel::Patient;
    innovations.create(idea, &planner.username).unwrap();

    assert_eq!(innovations.high_impact_count(&project.id).unwrap(), 1);

    let dashboard = AssetDashboard::compute(&store).unwrap();
    assert_eq!(dashboard.active_projects, 6);
    assert_eq!(dashboard.total_innovations, 30);

    let trail = AuditTrail::new(&store).list(Some(Portfolio::Aip)).unwrap();
    assert_eq!(trail[0].activity, "Innovation Tagging");
    assert_eq!(trail[1].activity, "Project Creation");
    assert_eq!(trail[1].user, "planner");
}

#[test]
fn test_admin_grants_across_portfolios() {
    let store = PortfolioStore::seeded();
    let admin = authenticate("admin", "admin").unwrap();
    admin.require(Module::Administration).unwrap();

    let access = AccessManager::new(&store);
    let person = access.search_people("holden").unwrap().remove(0);
    let candidates = access
        .candidate_projects(&[Portfolio::Aip, Portfolio::Launch])
        .unwrap();

    let grant = access
        .grant(
            GrantRequest {
                email: person.email.clone(),
                portfolios: vec![Portfolio::Launch, Portfolio::Aip],
                project_ids: candidates.iter().map(|p| p.id.clone()).collect(),
                level: AccessLevel::View,
            },
            &admin.username,
        )
        .unwrap();

    assert_eq!(grant.project_ids.len(), 7);
    assert_eq!(grant.portfolios, vec![Portfolio::Aip, Portfolio::Launch]);

    // cross-portfolio grants show under both filters
    for portfolio in Portfolio::all() {
        let trail = AuditTrail::new(&store).list(Some(portfolio)).unwrap();
        assert_eq!(trail[0].activity, "Access Granted");
    }
}
