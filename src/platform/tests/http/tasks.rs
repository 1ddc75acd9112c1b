#[cfg(test)]
mod tests {
    use common::rbac::Role;
    use reqwest::header::HeaderMap;
    use reqwest::Client;
    use reqwest::StatusCode;
    use serde_json::json;
    use serde_json::Value;

    use crate::assert_response_status_eq;
    use crate::http::tests::create_acc_and_login;
    use crate::http::tests::run_http_service;

    async fn post(cl: &Client, url: String, headers: &HeaderMap, body: Value) -> (StatusCode, Value) {
        let resp = cl
            .post(url)
            .headers(headers.clone())
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    async fn put(cl: &Client, url: String, headers: &HeaderMap, body: Value) -> (StatusCode, Value) {
        let resp = cl
            .put(url)
            .headers(headers.clone())
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_tasks() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();
        let (_, manager) = create_acc_and_login(&md, &pp, Role::Manager).await.unwrap();
        let (user_acc, user) = create_acc_and_login(&md, &pp, Role::User).await.unwrap();

        let (status, project) = post(
            &cl,
            format!("{base_url}/projects"),
            &manager,
            json!({"name": "p1"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let project_id = project["id"].as_u64().unwrap();

        let (status, _) = post(
            &cl,
            format!("{base_url}/projects/{project_id}/tasks"),
            &user,
            json!({"title": "t"}),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, task) = post(
            &cl,
            format!("{base_url}/projects/{project_id}/tasks"),
            &manager,
            json!({"title": "root", "priority": "high", "dueDate": "2030-01-01"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task["status"], json!("todo"));
        assert_eq!(task["priority"], json!("high"));
        let task_id = task["id"].as_u64().unwrap();

        for title in ["a", "b"] {
            let (status, subtask) = post(
                &cl,
                format!("{base_url}/projects/{project_id}/tasks"),
                &manager,
                json!({"title": title, "parentId": task_id}),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(subtask["parentId"], json!(task_id));
        }

        let (status, _) = post(
            &cl,
            format!("{base_url}/projects/{project_id}/tasks"),
            &manager,
            json!({"title": "orphan", "parentId": 100500}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let resp = cl
            .get(format!("{base_url}/tasks/{task_id}/subtasks"))
            .headers(user.clone())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let subtasks: Value = resp.json().await.unwrap();
        let subtasks = subtasks["data"].as_array().unwrap().clone();
        assert_eq!(subtasks.len(), 2);
        let first_subtask = subtasks[0]["id"].as_u64().unwrap();

        // users may only move the status
        let (status, body) = put(
            &cl,
            format!("{base_url}/tasks/{task_id}"),
            &user,
            json!({"title": "renamed"}),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["fields"]["action"], json!("update"));
        assert_eq!(md.tasks.get_by_id(task_id).unwrap().title, "root");

        let (status, body) = put(
            &cl,
            format!("{base_url}/tasks/{first_subtask}/status"),
            &user,
            json!({"status": "done"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("done"));

        let resp = cl
            .get(format!("{base_url}/tasks/{task_id}/progress"))
            .headers(user.clone())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.json::<Value>().await.unwrap(),
            json!({"total": 2, "done": 1, "percent": 50.0})
        );

        let (status, _) = put(
            &cl,
            format!("{base_url}/tasks/{task_id}/assignee"),
            &user,
            json!({"assigneeId": user_acc.id}),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = put(
            &cl,
            format!("{base_url}/tasks/{task_id}/assignee"),
            &manager,
            json!({"assigneeId": user_acc.id}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assigneeId"], json!(user_acc.id));

        let (status, _) = put(
            &cl,
            format!("{base_url}/tasks/{task_id}/assignee"),
            &manager,
            json!({"assigneeId": 100500}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = put(
            &cl,
            format!("{base_url}/tasks/{task_id}"),
            &manager,
            json!({"title": "renamed", "dueDate": null}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], json!("renamed"));
        assert_eq!(body["dueDate"], Value::Null);
        assert_eq!(body["priority"], json!("high"));

        // managers have no tasks:delete
        let resp = cl
            .delete(format!("{base_url}/tasks/{task_id}"))
            .headers(manager.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::FORBIDDEN);
        assert_eq!(md.tasks.list().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();
        let (_, admin) = create_acc_and_login(&md, &pp, Role::Admin).await.unwrap();

        let (_, project) = post(
            &cl,
            format!("{base_url}/projects"),
            &admin,
            json!({"name": "p1"}),
        )
        .await;
        let project_id = project["id"].as_u64().unwrap();

        let (_, root) = post(
            &cl,
            format!("{base_url}/projects/{project_id}/tasks"),
            &admin,
            json!({"title": "root"}),
        )
        .await;
        let root_id = root["id"].as_u64().unwrap();
        let (_, child) = post(
            &cl,
            format!("{base_url}/projects/{project_id}/tasks"),
            &admin,
            json!({"title": "child", "parentId": root_id}),
        )
        .await;
        let child_id = child["id"].as_u64().unwrap();
        let (status, _) = post(
            &cl,
            format!("{base_url}/tasks/{child_id}/comments"),
            &admin,
            json!({"body": "c"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let resp = cl
            .delete(format!("{base_url}/tasks/{root_id}"))
            .headers(admin.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::OK);

        let resp = cl
            .get(format!("{base_url}/tasks/{child_id}"))
            .headers(admin.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::NOT_FOUND);
        assert!(md.comments.list_by_task(child_id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_role_change_applies_to_next_request() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();
        let (_, admin) = create_acc_and_login(&md, &pp, Role::Admin).await.unwrap();
        let (user_acc, user) = create_acc_and_login(&md, &pp, Role::User).await.unwrap();

        let (status, _) = post(
            &cl,
            format!("{base_url}/projects"),
            &user,
            json!({"name": "p1"}),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = put(
            &cl,
            format!("{base_url}/users/{}/role", user_acc.id),
            &admin,
            json!({"role": "manager"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], json!("manager"));

        // same token, new role
        let (status, _) = post(
            &cl,
            format!("{base_url}/projects"),
            &user,
            json!({"name": "p1"}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}
