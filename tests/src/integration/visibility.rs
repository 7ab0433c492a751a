//! # Role Visibility Matrix
//!
//! The single authorization filter every dashboard consumes: scoped
//! roles see only their organization's projects or their own, oversight
//! roles see everything.

#[cfg(test)]
mod tests {
    use crate::integration::support::*;
    use bc_02_project_registry::ProjectRegistryApi;
    use mrv_runtime::DashboardView;
    use shared_types::{OrgId, Role, User, UserId};

    #[tokio::test]
    async fn test_scoped_roles_see_only_their_organization() {
        let platform = demo_platform();

        let ngo = login(&platform, Role::Ngo);
        let panchayat = login(&platform, Role::Panchayat);
        let ngo_project = create_project(&platform, &ngo);
        let panchayat_project = create_project(&platform, &panchayat);

        let visible = platform.registry.projects_visible_to(&ngo.user);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, ngo_project.id);

        let visible = platform.registry.projects_visible_to(&panchayat.user);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, panchayat_project.id);

        // A project belonging solely to another organization never
        // appears, whatever the query.
        assert!(platform
            .registry
            .projects_visible_to(&ngo.user)
            .iter()
            .all(|p| p.id != panchayat_project.id));
    }

    #[tokio::test]
    async fn test_oversight_roles_see_all() {
        let platform = demo_platform();
        let ngo = login(&platform, Role::Ngo);
        let panchayat = login(&platform, Role::Panchayat);
        create_project(&platform, &ngo);
        create_project(&platform, &panchayat);

        for role in [Role::Admin, Role::Government, Role::Verifier] {
            let session = login(&platform, role);
            assert_eq!(
                platform.registry.projects_visible_to(&session.user).len(),
                2,
                "{role:?} should see every project"
            );
        }
    }

    #[tokio::test]
    async fn test_creator_visibility_survives_org_change() {
        let platform = demo_platform();
        let ngo = login(&platform, Role::Ngo);
        let project = create_project(&platform, &ngo);

        // The same user re-scoped to a different organization still
        // sees what they created.
        let moved = User {
            organization: OrgId::generate(),
            ..ngo.user.clone()
        };
        let visible = platform.registry.projects_visible_to(&moved);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, project.id);

        // A different user in that new organization sees nothing.
        let stranger = User {
            id: UserId::generate(),
            organization: moved.organization,
            ..moved.clone()
        };
        assert!(platform.registry.projects_visible_to(&stranger).is_empty());
    }

    #[tokio::test]
    async fn test_dashboards_are_built_from_the_same_filter() {
        let platform = demo_platform();
        let ngo = login(&platform, Role::Ngo);
        let panchayat = login(&platform, Role::Panchayat);
        create_project(&platform, &ngo);
        create_project(&platform, &panchayat);

        match platform.dashboard_for(&ngo.user) {
            DashboardView::Ngo(dashboard) => assert_eq!(dashboard.projects.len(), 1),
            other => panic!("expected NGO dashboard, got {other:?}"),
        }
        match platform.dashboard_for(&login(&platform, Role::Admin).user) {
            DashboardView::Admin(dashboard) => {
                assert_eq!(dashboard.total_projects, 2);
                assert_eq!(dashboard.projects_by_status.get("pending"), Some(&2));
            }
            other => panic!("expected admin dashboard, got {other:?}"),
        }
    }
}
