#[cfg(test)]
mod tests {
    use common::rbac::Role;
    use metadata::projects::CreateProjectRequest;
    use metadata::tasks::CreateTaskRequest;
    use metadata::tasks::TaskPriority;
    use metadata::tasks::TaskStatus;
    use reqwest::header::HeaderMap;
    use reqwest::Client;
    use reqwest::StatusCode;
    use serde_json::json;
    use serde_json::Value;

    use crate::http::tests::create_acc_and_login;
    use crate::http::tests::run_http_service;

    fn task(created_by: u64, project_id: u64, assignee_id: Option<u64>, status: TaskStatus) -> CreateTaskRequest {
        CreateTaskRequest {
            created_by,
            project_id,
            parent_id: None,
            title: "t".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            assignee_id,
            due_date: None,
        }
    }

    async fn summary(cl: &Client, base_url: &str, headers: &HeaderMap) -> Value {
        let resp = cl
            .get(format!("{base_url}/analytics/summary"))
            .headers(headers.clone())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }

    #[tokio::test]
    async fn test_summary_scope() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();
        let (_, admin) = create_acc_and_login(&md, &pp, Role::Admin).await.unwrap();
        let (manager_acc, manager) = create_acc_and_login(&md, &pp, Role::Manager).await.unwrap();
        let (user_acc, user) = create_acc_and_login(&md, &pp, Role::User).await.unwrap();

        let team = md
            .projects
            .create(CreateProjectRequest {
                created_by: manager_acc.id,
                name: "team".to_string(),
                description: None,
                members: vec![user_acc.id],
            })
            .unwrap();
        let foreign = md
            .projects
            .create(CreateProjectRequest {
                created_by: 1000,
                name: "foreign".to_string(),
                description: None,
                members: vec![],
            })
            .unwrap();

        md.tasks
            .create(task(manager_acc.id, team.id, Some(user_acc.id), TaskStatus::Done))
            .unwrap();
        md.tasks
            .create(task(manager_acc.id, team.id, None, TaskStatus::Todo))
            .unwrap();
        md.tasks
            .create(task(1000, foreign.id, None, TaskStatus::Review))
            .unwrap();

        let all = summary(&cl, &base_url, &admin).await;
        assert_eq!(all["scope"], json!("all"));
        assert_eq!(all["projects"], json!(2));
        assert_eq!(all["tasks"], json!(3));
        assert_eq!(
            all["byStatus"],
            json!({"todo": 1, "inProgress": 0, "review": 1, "done": 1})
        );

        let team_summary = summary(&cl, &base_url, &manager).await;
        assert_eq!(team_summary["scope"], json!("team"));
        assert_eq!(team_summary["projects"], json!(1));
        assert_eq!(team_summary["tasks"], json!(2));
        assert_eq!(team_summary["completionPercent"], json!(50.0));

        let own = summary(&cl, &base_url, &user).await;
        assert_eq!(own["scope"], json!("own"));
        assert_eq!(own["tasks"], json!(1));
        assert_eq!(own["byStatus"]["done"], json!(1));
    }
}
