//! The authenticated HTTP client.
//!
//! Every backend call goes through [`ApiClient`]. Two hooks wrap each call:
//!
//! - [`ApiClient::authorize`] runs before sending and attaches
//!   `Authorization: Bearer <access>` when the session holds an access token.
//! - [`ApiClient::intercept`] runs on the response. Success passes through.
//!   A 401 clears the session, sends the [`Navigator`] to the login path and
//!   fails the call with [`Error::Unauthorized`]. Any other status fails with
//!   [`Error::Http`] and leaves the session alone.
//!
//! There is no retry and no refresh-token exchange: one 401 ends the session.

mod base;
mod navigator;

pub use base::ApiBase;
pub use navigator::{LogNavigator, Navigator, RecordingNavigator};

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;

/// Login location used when none is configured.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// HTTP client bound to one backend and one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: ApiBase,
    session: Session,
    navigator: Arc<dyn Navigator>,
    http: reqwest::Client,
    login_path: String,
}

impl ApiClient {
    /// Create a client with a default `reqwest` client.
    #[must_use]
    pub fn new(base: ApiBase, session: Session, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            base,
            session,
            navigator,
            http: reqwest::Client::new(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    /// Create a client from configuration: origin, timeout, user agent and
    /// login path.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn from_config(
        config: &Config,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let base = ApiBase::new(&config.api.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.api.user_agent.clone())
            .build()?;
        debug!(base = %base, "Created API client");
        Ok(Self::new(base, session, navigator)
            .with_http(http)
            .with_login_path(config.session.login_path.clone()))
    }

    /// Replace the underlying `reqwest` client.
    #[must_use]
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Set the location visited after a forced logout.
    #[must_use]
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    /// The normalized request prefix.
    #[must_use]
    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    /// The session this client reads tokens from.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The location visited after a forced logout.
    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Start an authorized request to a resource path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not resolve or the session cannot be
    /// read.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base.endpoint(path)?;
        debug!(%method, %url, "Preparing request");
        self.authorize(self.http.request(method, url))
    }

    /// Attach the bearer header if the session holds an access token.
    ///
    /// The token is read on every call, so a login or logout between requests
    /// takes effect immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        Ok(match self.session.access_token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Apply the response rules described in the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] for 401 and [`Error::Http`] for any
    /// other non-success status.
    pub async fn intercept(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %response.url(), "Server rejected credentials, ending session");
            if let Err(e) = self.session.clear() {
                warn!("Failed to clear session: {e}");
            }
            self.navigator.navigate(&self.login_path);
            return Err(Error::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, "Request failed");
        Err(Error::http(status, body))
    }

    /// Send a prepared request and run it through [`Self::intercept`].
    ///
    /// # Errors
    ///
    /// Returns transport errors as [`Error::Request`], plus anything
    /// [`Self::intercept`] returns.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        debug!(status = %response.status(), url = %response.url(), "Received response");
        self.intercept(response).await
    }

    /// `GET` a resource and decode its JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, path)?).await?;
        decode(response).await
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    /// `PUT` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await
    }

    /// `PATCH` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    /// `POST` without a body, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::POST, path)?).await?;
        Ok(())
    }

    /// `DELETE` a resource, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    /// `PATCH` a multipart form and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not decode.
    pub async fn patch_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let builder = self.request(Method::PATCH, path)?.multipart(form);
        decode(self.send(builder).await?).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path)?.json(body);
        decode(self.send(builder).await?).await
    }
}

/// Decode a JSON body. An empty body decodes as `null`, so `()` and
/// `Option<_>` accept `204 No Content`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response.text().await?;
    let text = if text.trim().is_empty() { "null" } else { &text };
    Ok(serde_json::from_str(text)?)
}
