#[cfg(test)]
mod tests {
    use common::rbac::Role;
    use metadata::projects::CreateProjectRequest;
    use metadata::tasks::CreateTaskRequest;
    use metadata::tasks::TaskPriority;
    use metadata::tasks::TaskStatus;
    use reqwest::Client;
    use reqwest::StatusCode;
    use serde_json::json;
    use serde_json::Value;

    use crate::assert_response_status_eq;
    use crate::http::tests::create_acc_and_login;
    use crate::http::tests::run_http_service;

    #[tokio::test]
    async fn test_comment_ownership() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();
        let (_, author) = create_acc_and_login(&md, &pp, Role::User).await.unwrap();
        let (_, other) = create_acc_and_login(&md, &pp, Role::User).await.unwrap();
        let (_, manager) = create_acc_and_login(&md, &pp, Role::Manager).await.unwrap();

        let project = md
            .projects
            .create(CreateProjectRequest {
                created_by: 1,
                name: "p1".to_string(),
                description: None,
                members: vec![],
            })
            .unwrap();
        let task = md
            .tasks
            .create(CreateTaskRequest {
                created_by: 1,
                project_id: project.id,
                parent_id: None,
                title: "t".to_string(),
                description: None,
                status: TaskStatus::Todo,
                priority: TaskPriority::Low,
                assignee_id: None,
                due_date: None,
            })
            .unwrap();

        let resp = cl
            .post(format!("{base_url}/tasks/{}/comments", task.id))
            .headers(author.clone())
            .json(&json!({"body": "first"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let comment_id = resp.json::<Value>().await.unwrap()["id"].as_u64().unwrap();

        let resp = cl
            .post(format!("{base_url}/tasks/{}/comments", task.id))
            .headers(author.clone())
            .json(&json!({"body": ""}))
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::BAD_REQUEST);

        // someone else's comment
        let resp = cl
            .put(format!("{base_url}/comments/{comment_id}"))
            .headers(other.clone())
            .json(&json!({"body": "hijacked"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["fields"]["resource"], json!("comments"));
        assert_eq!(body["error"]["fields"]["action"], json!("update"));
        assert_eq!(body["error"]["fields"]["role"], json!("user"));
        assert_eq!(md.comments.get_by_id(comment_id).unwrap().body, "first");

        let resp = cl
            .delete(format!("{base_url}/comments/{comment_id}"))
            .headers(other.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::FORBIDDEN);

        let resp = cl
            .put(format!("{base_url}/comments/{comment_id}"))
            .headers(author.clone())
            .json(&json!({"body": "edited"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.json::<Value>().await.unwrap()["body"], json!("edited"));

        // managers hold comments:update
        let resp = cl
            .put(format!("{base_url}/comments/{comment_id}"))
            .headers(manager.clone())
            .json(&json!({"body": "moderated"}))
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::OK);

        let resp = cl
            .get(format!("{base_url}/tasks/{}/comments", task.id))
            .headers(other.clone())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let list: Value = resp.json().await.unwrap();
        assert_eq!(list["data"][0]["body"], json!("moderated"));

        let resp = cl
            .delete(format!("{base_url}/comments/{comment_id}"))
            .headers(author.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::OK);
        assert!(md.comments.list_by_task(task.id).unwrap().is_empty());
    }
}
