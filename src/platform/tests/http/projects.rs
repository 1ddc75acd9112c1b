#[cfg(test)]
mod tests {
    use common::rbac::Role;
    use reqwest::header::HeaderValue;
    use reqwest::header::AUTHORIZATION;
    use reqwest::Client;
    use reqwest::StatusCode;
    use serde_json::json;
    use serde_json::Value;

    use crate::assert_response_json_eq;
    use crate::assert_response_status_eq;
    use crate::http::tests::create_acc_and_login;
    use crate::http::tests::run_http_service;
    use crate::http::tests::EMPTY_LIST;

    #[tokio::test]
    async fn test_authentication() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();

        let resp = cl
            .get(format!("{base_url}/projects"))
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::UNAUTHORIZED);

        let resp = cl
            .get(format!("{base_url}/projects"))
            .header(AUTHORIZATION, HeaderValue::from_static("Bearer garbage"))
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::UNAUTHORIZED);

        // token of a deleted account
        let (acc, headers) = create_acc_and_login(&md, &pp, Role::Admin).await.unwrap();
        md.accounts.delete(acc.id).unwrap();
        let resp = cl
            .get(format!("{base_url}/projects"))
            .headers(headers)
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::UNAUTHORIZED);

        let (_, headers) = create_acc_and_login(&md, &pp, Role::User).await.unwrap();
        let resp = cl
            .get(format!("{base_url}/projects"))
            .headers(headers)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_response_json_eq!(resp, EMPTY_LIST.to_string());
    }

    #[tokio::test]
    async fn test_denied_body() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();
        let (_, headers) = create_acc_and_login(&md, &pp, Role::User).await.unwrap();

        let resp = cl
            .post(format!("{base_url}/projects"))
            .headers(headers)
            .body(r#"{"name":"p1"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            resp.json::<Value>().await.unwrap(),
            json!({
                "error": {
                    "status": 403,
                    "message": "permission denied: requires projects:create",
                    "fields": {"action": "create", "resource": "projects", "role": "user"}
                }
            })
        );
        assert!(md.projects.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_projects() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();
        let (manager, manager_headers) =
            create_acc_and_login(&md, &pp, Role::Manager).await.unwrap();
        let (_, admin_headers) = create_acc_and_login(&md, &pp, Role::Admin).await.unwrap();
        let (user, user_headers) = create_acc_and_login(&md, &pp, Role::User).await.unwrap();

        let resp = cl
            .post(format!("{base_url}/projects"))
            .headers(manager_headers.clone())
            .body(r#"{"name":"p1","description":"desc"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let project: Value = resp.json().await.unwrap();
        assert_eq!(project["createdBy"], json!(manager.id));
        assert_eq!(project["status"], json!("active"));
        let id = project["id"].as_u64().unwrap();

        // validation
        let resp = cl
            .post(format!("{base_url}/projects"))
            .headers(manager_headers.clone())
            .body(r#"{"name":" "}"#)
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::BAD_REQUEST);

        let resp = cl
            .put(format!("{base_url}/projects/{id}"))
            .headers(manager_headers.clone())
            .body(r#"{"status":"archived"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let project: Value = resp.json().await.unwrap();
        assert_eq!(project["status"], json!("archived"));
        assert_eq!(project["name"], json!("p1"));

        let resp = cl
            .put(format!("{base_url}/projects/{id}/members"))
            .headers(user_headers.clone())
            .body(format!(r#"{{"members":[{}]}}"#, user.id))
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::FORBIDDEN);

        let resp = cl
            .put(format!("{base_url}/projects/{id}/members"))
            .headers(manager_headers.clone())
            .body(format!(r#"{{"members":[{}]}}"#, user.id))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let project: Value = resp.json().await.unwrap();
        assert_eq!(project["members"], json!([user.id]));

        let resp = cl
            .put(format!("{base_url}/projects/{id}/members"))
            .headers(manager_headers.clone())
            .body(r#"{"members":[100500]}"#)
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::BAD_REQUEST);

        // managers can't delete, the project survives
        let resp = cl
            .delete(format!("{base_url}/projects/{id}"))
            .headers(manager_headers.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::FORBIDDEN);
        let resp = cl
            .get(format!("{base_url}/projects/{id}"))
            .headers(user_headers.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::OK);

        let resp = cl
            .delete(format!("{base_url}/projects/{id}"))
            .headers(admin_headers.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::OK);
        let resp = cl
            .get(format!("{base_url}/projects/{id}"))
            .headers(admin_headers.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let (base_url, md, pp) = run_http_service().await.unwrap();
        let cl = Client::new();
        let (_, admin_headers) = create_acc_and_login(&md, &pp, Role::Admin).await.unwrap();

        let resp = cl
            .post(format!("{base_url}/projects"))
            .headers(admin_headers.clone())
            .body(r#"{"name":"p1"}"#)
            .send()
            .await
            .unwrap();
        let project_id = resp.json::<Value>().await.unwrap()["id"].as_u64().unwrap();

        let resp = cl
            .post(format!("{base_url}/projects/{project_id}/tasks"))
            .headers(admin_headers.clone())
            .body(r#"{"title":"t1"}"#)
            .send()
            .await
            .unwrap();
        let task_id = resp.json::<Value>().await.unwrap()["id"].as_u64().unwrap();

        let resp = cl
            .post(format!("{base_url}/tasks/{task_id}/comments"))
            .headers(admin_headers.clone())
            .body(r#"{"body":"c1"}"#)
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::CREATED);

        let resp = cl
            .delete(format!("{base_url}/projects/{project_id}"))
            .headers(admin_headers.clone())
            .send()
            .await
            .unwrap();
        assert_response_status_eq!(resp, StatusCode::OK);

        assert!(md.tasks.list().unwrap().is_empty());
        assert!(md.comments.list_by_task(task_id).unwrap().is_empty());
    }
}
