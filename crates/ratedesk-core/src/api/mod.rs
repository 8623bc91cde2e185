//! HTTP client for the store-rating REST API.
//!
//! Every request passes through [`ApiClient::request`], which reads the
//! current token from the shared [`SessionStore`] and attaches
//! `Authorization: Bearer <token>` when one exists. There are no retries and
//! no caching; each call resolves to a payload or an [`ApiError`].

mod error;
mod types;

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

pub use self::error::{ApiError, ApiErrorKind, extract_server_message};
pub use self::types::*;
use crate::config::Config;
use crate::listing::ListQuery;
use crate::session::SessionStore;

/// Standard User-Agent header for ratedesk API requests.
pub const USER_AGENT: &str = concat!("ratedesk/", env!("CARGO_PKG_VERSION"));

pub type ApiResult<T> = Result<T, ApiError>;

/// Shared API client. Cloning shares the connection pool and session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Creates a client for `base_url` (including the `/api` prefix).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        session: SessionStore,
        timeout: Option<Duration>,
    ) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|err| ApiError::network(&err))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Creates a client from the resolved config.
    ///
    /// # Errors
    /// Returns an error if no base URL is configured.
    pub fn from_config(config: &Config, session: SessionStore) -> anyhow::Result<Self> {
        let base_url = config.resolve_base_url()?;
        Ok(Self::new(base_url, session, config.request_timeout())?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Builds a request and runs the attach step.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, path, "api request");

        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    /// Sends and returns the raw body of a success response.
    async fn execute(&self, builder: RequestBuilder, path: &str) -> ApiResult<String> {
        let response = builder.send().await.map_err(|err| {
            tracing::warn!(path, %err, "api request failed");
            ApiError::network(&err)
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::network(&err))?;

        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "api error response");
            return Err(ApiError::http_status(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> ApiResult<T> {
        let body = self.execute(builder, path).await?;
        serde_json::from_str(&body).map_err(|err| ApiError::parse(path, &err, &body))
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// `POST /auth/login`. Does not touch the session; see [`crate::auth::login`].
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<LoginResponse> {
        let path = "/auth/login";
        self.send_json(self.request(Method::POST, path).json(credentials), path)
            .await
    }

    /// `POST /auth/register`.
    pub async fn register(&self, registration: &Registration) -> ApiResult<()> {
        let path = "/auth/register";
        self.execute(self.request(Method::POST, path).json(registration), path)
            .await
            .map(drop)
    }

    // ------------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------------

    /// `GET /admin/dashboard`.
    pub async fn admin_stats(&self) -> ApiResult<DashboardStats> {
        let path = "/admin/dashboard";
        self.send_json(self.request(Method::GET, path), path).await
    }

    /// `GET /admin/users?search&sortBy&sortOrder`.
    pub async fn admin_users(&self, query: &ListQuery) -> ApiResult<Vec<User>> {
        let path = "/admin/users";
        let builder = self.request(Method::GET, path).query(&query.to_params());
        self.send_json(builder, path).await
    }

    /// `GET /admin/stores?search&sortBy&sortOrder`.
    pub async fn admin_stores(&self, query: &ListQuery) -> ApiResult<Vec<Store>> {
        let path = "/admin/stores";
        let builder = self.request(Method::GET, path).query(&query.to_params());
        self.send_json(builder, path).await
    }

    /// `POST /admin/users`.
    pub async fn create_user(&self, user: &NewUser) -> ApiResult<()> {
        let path = "/admin/users";
        self.execute(self.request(Method::POST, path).json(user), path)
            .await
            .map(drop)
    }

    /// `POST /admin/stores`.
    pub async fn create_store(&self, store: &NewStore) -> ApiResult<()> {
        let path = "/admin/stores";
        self.execute(self.request(Method::POST, path).json(store), path)
            .await
            .map(drop)
    }

    // ------------------------------------------------------------------------
    // Store owner
    // ------------------------------------------------------------------------

    /// `GET /store-owner/dashboard`.
    pub async fn owner_dashboard(&self) -> ApiResult<OwnerDashboard> {
        let path = "/store-owner/dashboard";
        self.send_json(self.request(Method::GET, path), path).await
    }

    // ------------------------------------------------------------------------
    // End user
    // ------------------------------------------------------------------------

    /// `GET /stores?search`.
    pub async fn browse_stores(&self, search: &str) -> ApiResult<Vec<StoreListing>> {
        let path = "/stores";
        let builder = self.request(Method::GET, path).query(&[("search", search)]);
        self.send_json(builder, path).await
    }

    /// `POST /ratings` with `{storeId, rating}`.
    pub async fn submit_rating(&self, rating: RatingSubmission) -> ApiResult<()> {
        let path = "/ratings";
        self.execute(self.request(Method::POST, path).json(&rating), path)
            .await
            .map(drop)
    }

    /// `PUT /users/password`.
    pub async fn change_password(&self, update: &PasswordUpdate) -> ApiResult<()> {
        let path = "/users/password";
        self.execute(self.request(Method::PUT, path).json(update), path)
            .await
            .map(drop)
    }
}
