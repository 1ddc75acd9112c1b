//! The server and the client guard must reach the same verdict for every permission.

#[cfg(test)]
mod tests {
    use client::client::CheckMode;
    use client::ApiClient;
    use client::PermissionGuard;
    use common::rbac::check_permission;
    use common::rbac::AnalyticsAction;
    use common::rbac::CommentAction;
    use common::rbac::Permission;
    use common::rbac::PermissionName;
    use common::rbac::ProjectAction;
    use common::rbac::Requirement;
    use common::rbac::Resource;
    use common::rbac::Role;
    use common::rbac::TaskAction;
    use common::rbac::UserAction;
    use platform::Context;
    use reqwest::Client;
    use reqwest::Method;
    use reqwest::StatusCode;
    use serde_json::json;

    use crate::http::tests::create_acc_and_login;
    use crate::http::tests::run_http_service;
    use crate::http::tests::AUTH_CFG;

    /// Every defined pair plus names that don't exist.
    fn names() -> Vec<PermissionName> {
        let mut names: Vec<PermissionName> = Permission::all().into_iter().map(|p| p.into()).collect();
        for resource in Resource::ALL {
            names.push(PermissionName::new(resource.as_str(), "*"));
            names.push(PermissionName::new(resource.as_str(), ""));
        }
        names.push(PermissionName::new("widgets", "read"));
        names.push(PermissionName::new("Projects", "read"));
        names.push(PermissionName::new("", ""));
        names
    }

    #[tokio::test]
    async fn test_check_parity() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let names = names();

        for role in Role::ALL {
            let (acc, _) = create_acc_and_login(&md, &pp, *role).await.unwrap();
            let token = AUTH_CFG.make_access_token(acc.id).unwrap();
            let api = ApiClient::new(base_url.clone()).unwrap().with_token(token);

            let fetched = api.guard().await.unwrap();
            assert_eq!(fetched.role(), Some(role.as_str()));
            let compiled = PermissionGuard::with_current_matrix(Some(role.to_string()));
            let ctx = Context::new(acc.id, *role);

            let resp = api.check(CheckMode::Any, &names).await.unwrap();
            assert_eq!(resp.results.len(), names.len());

            for (name, result) in names.iter().zip(resp.results.iter()) {
                let expected = check_permission(Some(role.as_str()), &name.resource, &name.action);
                let what = format!("{role} {}:{}", name.resource, name.action);

                assert_eq!(result.allowed, expected, "server: {what}");
                assert_eq!(compiled.can(&name.resource, &name.action), expected, "compiled guard: {what}");
                assert_eq!(fetched.can(&name.resource, &name.action), expected, "fetched guard: {what}");
                if let Ok(p) = Permission::parse(&name.resource, &name.action) {
                    assert_eq!(ctx.can(p), expected, "context: {what}");
                    assert_eq!(ctx.check_permission(p).is_ok(), expected, "context check: {what}");
                }
            }
        }
    }

    #[test]
    fn test_unknown_roles_parity() {
        for role in ["", "superuser", "Admin", " admin", "guest"] {
            let guard = PermissionGuard::with_current_matrix(Some(role.to_string()));
            for name in names() {
                assert!(!check_permission(Some(role), &name.resource, &name.action));
                assert!(!guard.can(&name.resource, &name.action), "{role:?}");
            }
        }

        let anon = PermissionGuard::anonymous();
        let ctx = Context::default();
        for p in Permission::all() {
            assert!(!anon.allows(&Requirement::One(p)));
            assert!(!ctx.can(p));
            assert!(ctx.check_permission(p).is_err());
        }
    }

    #[tokio::test]
    async fn test_route_parity() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();

        let routes: Vec<(Method, &str, Requirement)> = vec![
            (Method::POST, "/users", Permission::Users(UserAction::Create).into()),
            (Method::GET, "/users", Permission::Users(UserAction::Read).into()),
            (Method::GET, "/users/100500", Permission::Users(UserAction::Read).into()),
            (Method::PUT, "/users/100500", Permission::Users(UserAction::Update).into()),
            (Method::DELETE, "/users/100500", Permission::Users(UserAction::Delete).into()),
            (Method::PUT, "/users/100500/role", Permission::Users(UserAction::ChangeRole).into()),
            (Method::POST, "/projects", Permission::Projects(ProjectAction::Create).into()),
            (Method::GET, "/projects", Permission::Projects(ProjectAction::Read).into()),
            (Method::GET, "/projects/100500", Permission::Projects(ProjectAction::Read).into()),
            (Method::PUT, "/projects/100500", Permission::Projects(ProjectAction::Update).into()),
            (Method::DELETE, "/projects/100500", Permission::Projects(ProjectAction::Delete).into()),
            (
                Method::PUT,
                "/projects/100500/members",
                Permission::Projects(ProjectAction::ManageMembers).into(),
            ),
            (Method::POST, "/projects/100500/tasks", Permission::Tasks(TaskAction::Create).into()),
            (Method::GET, "/projects/100500/tasks", Permission::Tasks(TaskAction::Read).into()),
            (Method::GET, "/tasks/100500", Permission::Tasks(TaskAction::Read).into()),
            (Method::PUT, "/tasks/100500", Permission::Tasks(TaskAction::Update).into()),
            (Method::DELETE, "/tasks/100500", Permission::Tasks(TaskAction::Delete).into()),
            (Method::GET, "/tasks/100500/subtasks", Permission::Tasks(TaskAction::Read).into()),
            (Method::GET, "/tasks/100500/progress", Permission::Tasks(TaskAction::Read).into()),
            (
                Method::PUT,
                "/tasks/100500/status",
                Requirement::any([
                    Permission::Tasks(TaskAction::Update),
                    Permission::Tasks(TaskAction::UpdateStatus),
                ]),
            ),
            (Method::PUT, "/tasks/100500/assignee", Permission::Tasks(TaskAction::Assign).into()),
            (Method::GET, "/tasks/100500/comments", Permission::Comments(CommentAction::Read).into()),
            (
                Method::POST,
                "/tasks/100500/comments",
                Permission::Comments(CommentAction::Create).into(),
            ),
            (
                Method::PUT,
                "/comments/100500",
                Requirement::any([
                    Permission::Comments(CommentAction::Update),
                    Permission::Comments(CommentAction::UpdateOwn),
                ]),
            ),
            (
                Method::DELETE,
                "/comments/100500",
                Requirement::any([
                    Permission::Comments(CommentAction::Delete),
                    Permission::Comments(CommentAction::DeleteOwn),
                ]),
            ),
            (
                Method::GET,
                "/analytics/summary",
                Requirement::any(AnalyticsAction::ALL.iter().map(|a| Permission::Analytics(*a))),
            ),
        ];

        for role in Role::ALL {
            let (_, headers) = create_acc_and_login(&md, &pp, *role).await.unwrap();
            let guard = PermissionGuard::with_current_matrix(Some(role.to_string()));

            for (method, path, required) in routes.iter() {
                let resp = cl
                    .request(method.clone(), format!("{base_url}{path}"))
                    .headers(headers.clone())
                    .json(&json!({}))
                    .send()
                    .await
                    .unwrap();

                let denied = resp.status() == StatusCode::FORBIDDEN;
                assert_eq!(
                    !denied,
                    guard.allows(required),
                    "{role} {method} {path} -> {}",
                    resp.status()
                );

                // without a token nothing gets through
                let resp = cl
                    .request(method.clone(), format!("{base_url}{path}"))
                    .json(&json!({}))
                    .send()
                    .await
                    .unwrap();
                assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {path}");
            }
        }
    }
}
