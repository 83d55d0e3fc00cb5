//! Unit tests for GitHubClient using wiremock

#[cfg(test)]
mod tests {
    use crate::client::GitHubClient;
    use crate::error::GitHubError;
    use mirror_core::{CreateRepository, Credential, MirrorError, RepositoryHost};
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GitHubClient {
        GitHubClient::with_base_url(&server.uri(), &Credential::new("test-token"))
    }

    /// Helper to create a mock GitHub repository response
    fn mock_github_repo(org: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": 12345,
            "name": name,
            "full_name": format!("{}/{}", org, name),
            "description": "Test repository",
            "private": true,
            "visibility": "private",
            "default_branch": "main",
            "has_issues": true,
            "has_projects": false,
            "has_wiki": true,
            "has_downloads": true,
            "archived": false,
            "fork": false,
            "clone_url": format!("https://github.com/{}/{}.git", org, name)
        })
    }

    fn mock_repo_page(org: &str, start: usize, count: usize) -> serde_json::Value {
        serde_json::Value::Array(
            (start..start + count)
                .map(|i| mock_github_repo(org, &format!("repo-{}", i)))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_get_org_sends_auth_and_version_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/demo"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("Accept", "application/vnd.github+json"))
            .and(header("X-GitHub-Api-Version", "2022-11-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "demo",
                "id": 99,
                "name": "Demo Org",
                "description": null
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let org = client_for(&mock_server).get_org("demo").unwrap();

        assert_eq!(org.login, "demo");
        assert_eq!(org.id, 99);
        assert_eq!(org.name.as_deref(), Some("Demo Org"));
    }

    #[tokio::test]
    async fn test_get_org_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Not Found"})),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).get_org("missing").unwrap_err();
        match err {
            GitHubError::NotFound(resource) => assert_eq!(resource, "/orgs/missing"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forbidden_keeps_sso_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/emu-org"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-remaining", "4999")
                    .set_body_json(serde_json::json!({
                        "message": "Resource protected by organization SAML enforcement."
                    })),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).get_org("emu-org").unwrap_err();
        match err {
            GitHubError::Forbidden(message) => assert!(message.contains("SAML")),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exhausted_quota_is_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/demo"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-ratelimit-limit", "5000")
                    .insert_header("x-ratelimit-remaining", "0")
                    .insert_header("x-ratelimit-reset", "1700000000")
                    .set_body_json(serde_json::json!({"message": "API rate limit exceeded"})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.get_org("demo").unwrap_err();
        assert!(matches!(
            err,
            GitHubError::RateLimited {
                reset: Some(1700000000)
            }
        ));

        let status = client.last_rate_limit().unwrap();
        assert_eq!(status.remaining, 0);
        assert_eq!(status.limit, 5000);
        assert_eq!(status.reset.timestamp(), 1700000000);
    }

    #[tokio::test]
    async fn test_success_records_rate_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/demo/tools"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-limit", "5000")
                    .insert_header("x-ratelimit-remaining", "4321")
                    .insert_header("x-ratelimit-reset", "1700000100")
                    .set_body_json(mock_github_repo("demo", "tools")),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert!(client.last_rate_limit().is_none());

        let repo = client.get_repo("demo", "tools").unwrap();
        assert_eq!(repo.full_name, "demo/tools");
        assert_eq!(client.rate_limit().unwrap().remaining, 4321);
    }

    #[tokio::test]
    async fn test_list_org_repos_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/demo/repos"))
            .and(query_param("type", "all"))
            .and(query_param("per_page", "100"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_repo_page("demo", 0, 2)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let repos = client_for(&mock_server)
            .list_org_repos("demo", 100, 3)
            .unwrap();
        assert_eq!(repos.len(), 2);
        assert!(repos[0].private);
    }

    #[tokio::test]
    async fn test_list_repositories_follows_pages_until_short_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/demo/repos"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_repo_page("demo", 0, 100)))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/orgs/demo/repos"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mock_repo_page("demo", 100, 37)))
            .expect(1)
            .mount(&mock_server)
            .await;

        // A third page must never be requested
        Mock::given(method("GET"))
            .and(path("/orgs/demo/repos"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let repos = client_for(&mock_server).list_repositories("demo").unwrap();

        assert_eq!(repos.len(), 137);
        assert_eq!(repos[0].name, "repo-0");
        assert_eq!(repos[136].name, "repo-136");
    }

    #[tokio::test]
    async fn test_list_repositories_error_propagates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/demo/repos"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(serde_json::json!({"message": "boom"})),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).list_repositories("demo").unwrap_err();
        assert!(matches!(err, MirrorError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_create_repository_posts_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orgs/demo-mirror/repos"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({
                "name": "tools",
                "description": "Test repository",
                "private": true,
                "visibility": "private",
                "default_branch": "main",
                "has_issues": true,
                "has_projects": false,
                "has_wiki": true,
                "has_downloads": true
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(mock_github_repo("demo-mirror", "tools")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let source = client_for(&mock_server);
        let descriptor = mirror_core::RepositoryDescriptor {
            name: "tools".to_string(),
            description: Some("Test repository".to_string()),
            is_private: true,
            visibility: Some("private".to_string()),
            default_branch: Some("main".to_string()),
            has_issues: true,
            has_projects: false,
            has_wiki: true,
            has_downloads: true,
            archived: false,
            fork: false,
            clone_url: "https://github.com/demo/tools.git".to_string(),
        };

        let created = source
            .create_repository("demo-mirror", &CreateRepository::from_source(&descriptor))
            .unwrap();
        assert_eq!(created.name, "tools");
        assert_eq!(created.clone_url, "https://github.com/demo-mirror/tools.git");
    }

    #[tokio::test]
    async fn test_create_repository_already_exists() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orgs/demo-mirror/repos"))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "message": "Repository creation failed.",
                "errors": [{"resource": "Repository", "code": "custom", "field": "name",
                            "message": "name already exists on this account"}]
            })))
            .mount(&mock_server)
            .await;

        let payload = CreateRepository {
            name: "tools".to_string(),
            description: None,
            private: true,
            visibility: None,
            default_branch: None,
            has_issues: true,
            has_projects: true,
            has_wiki: true,
            has_downloads: true,
        };
        let err = client_for(&mock_server)
            .create_repository("demo-mirror", &payload)
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("Repository creation failed."));
    }

    #[tokio::test]
    async fn test_set_default_branch_patches_repo() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/repos/demo-mirror/tools"))
            .and(body_partial_json(serde_json::json!({"default_branch": "trunk"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(mock_github_repo("demo-mirror", "tools")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        client_for(&mock_server)
            .set_default_branch("demo-mirror", "tools", "trunk")
            .unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/demo"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Bad credentials"})),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).get_organization("demo").unwrap_err();
        assert!(matches!(err, MirrorError::Unauthorized));
    }

    #[tokio::test]
    async fn test_error_without_json_body_uses_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orgs/demo"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).get_org("demo").unwrap_err();
        match err {
            GitHubError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "HTTP 502");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
