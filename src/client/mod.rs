//! Typed HTTP client for the SkillTrack API.
//!
//! The client holds no credentials. Callers keep the token returned by
//! [`SkillTrackClient::register`] or [`SkillTrackClient::login`] and pass it to
//! each authenticated call; a [`ClientError::Unauthorized`] means that token
//! should be discarded.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::handlers::{AuthResponse, Empty, Envelope};
use crate::models::{Skill, SkillHistory, SkillInput, SkillStats, UserResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing, invalid or expired token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, Serialize)]
struct Credentials<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct SkillTrackClient {
    base_url: Url,
    http: Client,
}

impl SkillTrackClient {
    /// `base_url` may carry a path prefix (`http://host/skilltrack`); a
    /// trailing slash is added so request paths resolve beneath it.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut base_url = Url::parse(base_url).map_err(|e| ClientError::Url(e.to_string()))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            http: Client::new(),
        })
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<AuthResponse> {
        let body = Credentials {
            name: Some(name),
            email,
            password,
        };
        let request = self.request(Method::POST, "/api/auth/register")?.json(&body);
        Self::decode(request.send().await?).await
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<AuthResponse> {
        let body = Credentials {
            name: None,
            email,
            password,
        };
        let request = self.request(Method::POST, "/api/auth/login")?.json(&body);
        Self::decode(request.send().await?).await
    }

    pub async fn me(&self, token: &str) -> ClientResult<UserResponse> {
        let request = self.authorized(Method::GET, "/api/auth/me", token)?;
        Self::decode(request.send().await?).await
    }

    /// `sort` uses the server syntax, e.g. `-proficiencyLevel,name`
    pub async fn list_skills(
        &self,
        token: &str,
        category: Option<&str>,
        sort: Option<&str>,
    ) -> ClientResult<Vec<Skill>> {
        let request = self.list_request(token, category, sort)?;
        Self::decode(request.send().await?).await
    }

    pub async fn get_skill(&self, token: &str, id: Uuid) -> ClientResult<Skill> {
        let request = self.authorized(Method::GET, &format!("/api/skills/{}", id), token)?;
        Self::decode(request.send().await?).await
    }

    pub async fn create_skill(&self, token: &str, input: &SkillInput) -> ClientResult<Skill> {
        let request = self.authorized(Method::POST, "/api/skills", token)?.json(input);
        Self::decode(request.send().await?).await
    }

    pub async fn update_skill(
        &self,
        token: &str,
        id: Uuid,
        input: &SkillInput,
    ) -> ClientResult<Skill> {
        let request = self
            .authorized(Method::PUT, &format!("/api/skills/{}", id), token)?
            .json(input);
        Self::decode(request.send().await?).await
    }

    pub async fn delete_skill(&self, token: &str, id: Uuid) -> ClientResult<()> {
        let request = self.authorized(Method::DELETE, &format!("/api/skills/{}", id), token)?;
        Self::decode::<Empty>(request.send().await?).await?;
        Ok(())
    }

    pub async fn stats(&self, token: &str) -> ClientResult<SkillStats> {
        let request = self.authorized(Method::GET, "/api/skills/stats", token)?;
        Self::decode(request.send().await?).await
    }

    pub async fn skill_history(&self, token: &str, id: Uuid) -> ClientResult<Vec<SkillHistory>> {
        let path = format!("/api/skills/{}/history", id);
        let request = self.authorized(Method::GET, &path, token)?;
        Self::decode(request.send().await?).await
    }

    /// Request carrying `Authorization: Bearer <token>`
    pub fn authorized(
        &self,
        method: Method,
        path: &str,
        token: &str,
    ) -> ClientResult<RequestBuilder> {
        Ok(self.request(method, path)?.bearer_auth(token))
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.join(path)?;
        Ok(self.http.request(method, url))
    }

    fn list_request(
        &self,
        token: &str,
        category: Option<&str>,
        sort: Option<&str>,
    ) -> ClientResult<RequestBuilder> {
        let mut url = self.join("/api/skills")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(category) = category {
                pairs.append_pair("category", category);
            }
            if let Some(sort) = sort {
                pairs.append_pair("sort", sort);
            }
        }
        // Drop the dangling `?` when no pair was appended
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(self.http.request(Method::GET, url).bearer_auth(token))
    }

    /// Resolve an API path relative to the base, keeping any prefix
    fn join(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Url(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let envelope: Option<Envelope<T>> = response.json().await.ok();

        if status.is_success() {
            return match envelope.and_then(|e| e.data) {
                Some(data) => Ok(data),
                None => Err(ClientError::Api {
                    status,
                    message: "Response carried no data".to_string(),
                }),
            };
        }

        let message = envelope
            .and_then(|e| e.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!(%message, "Token rejected by server");
            Err(ClientError::Unauthorized(message))
        } else {
            Err(ClientError::Api { status, message })
        }
    }
}
