use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::debug;
use url::Url;

use crate::error::{AdminError, Result};
use crate::types::{CreatedUser, NewUser, User, UserPage};

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// The remote user service.
///
/// Every call is a single attempt: no retry, no backoff.
#[async_trait]
pub trait UserService: Send + Sync {
    /// `GET /users?limit={limit}&skip={skip}`
    async fn list_users(&self, skip: u32, limit: u32) -> Result<UserPage>;

    /// `GET /users/{id}`
    async fn get_user(&self, id: u64) -> Result<User>;

    /// `POST /users/add`
    async fn add_user(&self, user: &NewUser) -> Result<CreatedUser>;

    /// `PUT /users/{id}` with the full record.
    async fn replace_user(&self, user: &User) -> Result<()>;

    /// `DELETE /users/{id}`
    async fn delete_user(&self, id: u64) -> Result<()>;
}

pub struct UserClient {
    http: Client,
    base_url: Url,
}

impl UserClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, mut base_url: Url) -> Self {
        // Url::join drops the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { http, base_url }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AdminError::InvalidUrl(format!("{}{path}: {e}", self.base_url)))
    }

    async fn send<F>(&self, method: Method, path: &str, build: F) -> Result<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "sending request");

        let response = build(self.http.request(method, url)).send().await?;

        if !response.status().is_success() {
            return Err(AdminError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl UserService for UserClient {
    async fn list_users(&self, skip: u32, limit: u32) -> Result<UserPage> {
        let response = self
            .send(Method::GET, "users", |req| {
                req.query(&[("limit", limit), ("skip", skip)])
            })
            .await?;

        Ok(response.json().await?)
    }

    async fn get_user(&self, id: u64) -> Result<User> {
        let response = self
            .send(Method::GET, &format!("users/{id}"), |req| req)
            .await
            .map_err(|e| match e {
                AdminError::ApiError { status: 404, .. } => AdminError::UserNotFound(id),
                other => other,
            })?;

        Ok(response.json().await?)
    }

    async fn add_user(&self, user: &NewUser) -> Result<CreatedUser> {
        let response = self
            .send(Method::POST, "users/add", |req| req.json(user))
            .await?;

        // The created record is not otherwise inspected; a body without an id is fine.
        Ok(response.json().await.unwrap_or_default())
    }

    async fn replace_user(&self, user: &User) -> Result<()> {
        self.send(Method::PUT, &format!("users/{}", user.id), |req| req.json(user))
            .await?;
        Ok(())
    }

    async fn delete_user(&self, id: u64) -> Result<()> {
        self.send(Method::DELETE, &format!("users/{id}"), |req| req)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, UserClient) {
        let server = MockServer::start().await;
        let client = UserClient::new(Url::parse(&server.uri()).unwrap());
        (server, client)
    }

    #[test]
    fn base_url_keeps_its_path_prefix() {
        let client = UserClient::new(Url::parse("https://example.com/api").unwrap());
        assert_eq!(
            client.endpoint("users/3").unwrap().as_str(),
            "https://example.com/api/users/3"
        );
    }

    #[tokio::test]
    async fn list_users_sends_limit_and_skip() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("limit", "5"))
            .and(query_param("skip", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [
                    { "id": 11, "firstName": "Ann", "lastName": "Lee" },
                    { "id": 12, "firstName": "Bob", "lastName": "Ray" }
                ],
                "total": 208,
                "skip": 10,
                "limit": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client.list_users(10, 5).await.unwrap();

        assert_eq!(page.total, 208);
        let ids: Vec<u64> = page.users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![11, 12]);
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let result = client.list_users(0, 5).await;

        assert!(
            matches!(
                &result,
                Err(AdminError::ApiError { status: 503, message }) if message == "unavailable"
            ),
            "expected ApiError, got: {result:?}"
        );
    }

    #[tokio::test]
    async fn get_user_maps_404_to_not_found() {
        let (server, client) = setup().await;

        Mock::given(method("GET"))
            .and(path("/users/999"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "User with id '999' not found"
            })))
            .mount(&server)
            .await;

        let result = client.get_user(999).await;
        assert!(matches!(result, Err(AdminError::UserNotFound(999))));
    }

    #[tokio::test]
    async fn add_user_posts_payload_and_reads_assigned_id() {
        let (server, client) = setup().await;

        Mock::given(method("POST"))
            .and(path("/users/add"))
            .and(body_json(json!({
                "firstName": "Maria",
                "lastName": "Garcia",
                "email": "maria@example.com",
                "phone": "5551234"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 209,
                "firstName": "Maria"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let created = client
            .add_user(&NewUser {
                first_name: "Maria".to_string(),
                last_name: "Garcia".to_string(),
                email: "maria@example.com".to_string(),
                phone: "5551234".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, Some(209));
    }

    #[tokio::test]
    async fn replace_user_puts_full_record_at_its_id() {
        let (server, client) = setup().await;

        Mock::given(method("PUT"))
            .and(path("/users/7"))
            .and(body_partial_json(json!({
                "id": 7,
                "firstName": "Anne",
                "company": { "name": "Acme" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7 })))
            .expect(1)
            .mount(&server)
            .await;

        let mut user = User {
            id: 7,
            first_name: "Anne".to_string(),
            ..User::default()
        };
        user.company.name = "Acme".to_string();

        client.replace_user(&user).await.unwrap();
    }

    #[tokio::test]
    async fn delete_user_hits_record_path() {
        let (server, client) = setup().await;

        Mock::given(method("DELETE"))
            .and(path("/users/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "isDeleted": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        client.delete_user(3).await.unwrap();
    }
}
