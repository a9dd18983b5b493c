//! Directory service: the remote API holding users, invites and students.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use shds_auth::Profile;
use shds_core::StudentId;

use crate::config::ClientConfig;
use crate::dto::{
    InviteRequest, InviteResponse, MeResponse, SetupRequest, SetupResponse, StudentDoc,
    StudentSummary,
};
use crate::error::ClientError;
use crate::session::IdToken;

/// Header carrying the identity token on every authenticated request.
pub const TOKEN_HEADER: &str = "x-firebase-token";

/// Calls the portal makes against the directory service.
///
/// Every call is a single attempt; failures are returned, never retried.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// `GET /users/me`, validated into a [`Profile`].
    async fn me(&self, token: &IdToken) -> Result<Profile, ClientError>;

    /// `GET /students`
    async fn list_students(&self, token: &IdToken) -> Result<Vec<StudentSummary>, ClientError>;

    /// `GET /collections/students?id=<id>`, first match.
    async fn find_student(
        &self,
        token: &IdToken,
        id: &StudentId,
    ) -> Result<Option<StudentDoc>, ClientError>;

    /// `POST /users/invites`
    async fn create_invite(
        &self,
        token: &IdToken,
        request: &InviteRequest,
    ) -> Result<InviteResponse, ClientError>;

    /// `POST /users/setup`; the response carries the new roles and branch.
    async fn setup(&self, token: &IdToken, request: &SetupRequest) -> Result<Profile, ClientError>;
}

/// `reqwest`-backed directory client.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    base_url: String,
    http: reqwest::Client,
}

impl HttpDirectory {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self::with_client(config.api_base.clone(), http))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T>(
        &self,
        request: RequestBuilder,
        token: &IdToken,
        path: &str,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Default,
    {
        let response = request
            .header(TOKEN_HEADER, token.as_str())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(path, error = %e, "directory request failed");
                ClientError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = error_detail(status, &body);
            tracing::warn!(
                path,
                status = status.as_u16(),
                %detail,
                "directory returned an error"
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(path, error = %e, "could not decode directory response");
            ClientError::Decode(e.to_string())
        })
    }
}

/// Message for a failed response: `detail` if it is a non-empty string, else the JSON body,
/// else `HTTP <status>`.
fn error_detail(status: StatusCode, body: &[u8]) -> String {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
            _ => serde_json::to_string(&map).unwrap_or_default(),
        },
        Ok(other) => other.to_string(),
        Err(_) => format!("HTTP {}", status.as_u16()),
    }
}

#[async_trait]
impl DirectoryService for HttpDirectory {
    async fn me(&self, token: &IdToken) -> Result<Profile, ClientError> {
        let path = "/users/me";
        let me: MeResponse = self
            .execute(self.http.get(self.endpoint(path)), token, path)
            .await?;
        Ok(me.into_profile())
    }

    async fn list_students(&self, token: &IdToken) -> Result<Vec<StudentSummary>, ClientError> {
        let path = "/students";
        self.execute(self.http.get(self.endpoint(path)), token, path).await
    }

    async fn find_student(
        &self,
        token: &IdToken,
        id: &StudentId,
    ) -> Result<Option<StudentDoc>, ClientError> {
        let path = "/collections/students";
        let request = self
            .http
            .get(self.endpoint(path))
            .query(&[("id", id.as_str())]);
        let docs: Vec<StudentDoc> = self.execute(request, token, path).await?;
        Ok(docs.into_iter().next())
    }

    async fn create_invite(
        &self,
        token: &IdToken,
        request: &InviteRequest,
    ) -> Result<InviteResponse, ClientError> {
        let path = "/users/invites";
        self.execute(self.http.post(self.endpoint(path)).json(request), token, path)
            .await
    }

    async fn setup(&self, token: &IdToken, request: &SetupRequest) -> Result<Profile, ClientError> {
        let path = "/users/setup";
        let response: SetupResponse = self
            .execute(self.http.post(self.endpoint(path)).json(request), token, path)
            .await?;
        Ok(response.into_profile())
    }
}
