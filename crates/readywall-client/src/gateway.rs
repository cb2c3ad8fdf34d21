//! HTTP client for the `ReadyWall` REST gateway

use crate::entity::{Entity, endpoint_path};
use crate::error::{GatewayError, GatewayResult, UNAUTHORIZED_FALLBACK};
use crate::session::{Credentials, Session};
use crate::status::StatusField;
use crate::upload::Payload;
use readywall_core::config::GatewayConfig;
use readywall_core::{AdminUser, RecordId, StatsSummary};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Search and paging parameters for list requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Server-side search term
    pub search: Option<String>,
    /// Page number, starting at 1
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

impl ListQuery {
    /// A single page of `limit` records
    pub const fn page(page: u32, limit: u32) -> Self {
        Self {
            search: None,
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Query string including the leading `?`, or empty
    pub fn to_query_string(&self) -> String {
        let mut query_params = Vec::new();

        if let Some(ref search) = self.search
            && !search.trim().is_empty()
        {
            query_params.push(format!("search={}", urlencoding::encode(search.trim())));
        }
        if let Some(page) = self.page {
            query_params.push(format!("page={page}"));
        }
        if let Some(limit) = self.limit {
            query_params.push(format!("limit={limit}"));
        }

        if query_params.is_empty() {
            String::new()
        } else {
            format!("?{}", query_params.join("&"))
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    user: Option<AdminUser>,
}

/// Client for the admin gateway
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    /// Gateway at `base_url` with default transport settings
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Gateway built from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &GatewayConfig) -> GatewayResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url().to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(request: RequestBuilder, session: &Session) -> GatewayResult<RequestBuilder> {
        Ok(request.bearer_auth(session.bearer()?))
    }

    fn with_payload(request: RequestBuilder, payload: Payload) -> GatewayResult<RequestBuilder> {
        Ok(match payload {
            Payload::Json(body) => request.json(&body),
            Payload::Multipart(form) => request.multipart(form.into_form()?),
        })
    }

    /// Send a request and classify the response
    ///
    /// 2xx bodies are returned as JSON (`Null` when empty). 401 becomes
    /// [`GatewayError::Unauthorized`]; any other status becomes
    /// [`GatewayError::Business`] carrying the body's `message` or `fallback`.
    async fn send(&self, request: RequestBuilder, fallback: &str) -> GatewayResult<Value> {
        let response = request.send().await.inspect_err(|e| {
            error!(error = %e, "gateway unreachable");
        })?;
        let status = response.status();
        let bytes = response.bytes().await.inspect_err(|e| {
            error!(error = %e, "failed to read gateway response");
        })?;

        let body: Option<Value> = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        if status.is_success() {
            return Ok(body.unwrap_or(Value::Null));
        }

        let message = body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string);

        warn!(status = status.as_u16(), message = message.as_deref().unwrap_or(fallback), "gateway request failed");

        if status == StatusCode::UNAUTHORIZED {
            Err(GatewayError::Unauthorized {
                message: message.unwrap_or_else(|| UNAUTHORIZED_FALLBACK.to_string()),
            })
        } else {
            Err(GatewayError::Business {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| fallback.to_string()),
            })
        }
    }

    /// Exchange credentials for a session
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unauthorized`] for rejected credentials, or a
    /// transport/decode error.
    pub async fn login(&self, credentials: &Credentials) -> GatewayResult<Session> {
        let request = self
            .client
            .post(self.url("/api/admin/login"))
            .json(credentials);

        let body = self.send(request, "Login failed").await?;
        let response: LoginResponse = serde_json::from_value(body)
            .map_err(|e| GatewayError::decode("log in", e.to_string()))?;

        if response.token.trim().is_empty() {
            return Err(GatewayError::decode("log in", "response carried an empty token"));
        }

        Ok(Session::new(response.token, response.user))
    }

    /// Fetch a list of records
    ///
    /// # Errors
    ///
    /// Returns an error if the session has no token, the request fails, or
    /// the body does not carry the expected list.
    pub async fn list<E: Entity>(&self, session: &Session, query: &ListQuery) -> GatewayResult<Vec<E>> {
        let context = format!("fetch {}", E::PLURAL);
        let url = format!("{}{}", self.url(E::ENDPOINTS.list), query.to_query_string());
        debug!(entity = E::NAME, %url, "listing records");

        let request = Self::authorized(self.client.get(&url), session)?;
        let body = self.send(request, &format!("Failed to {context}")).await?;
        E::ENVELOPE.decode_many(body, &context)
    }

    /// Fetch one record by id
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unsupported`] when the entity has no detail
    /// endpoint, or any request/decode error.
    pub async fn fetch<E: Entity>(&self, session: &Session, id: &RecordId) -> GatewayResult<E> {
        let template = E::ENDPOINTS.fetch.ok_or(GatewayError::Unsupported {
            entity: E::NAME,
            operation: "fetched individually",
        })?;
        let context = format!("fetch {}", E::NAME);

        let request = Self::authorized(self.client.get(self.url(&endpoint_path(template, id))), session)?;
        let body = self.send(request, &format!("Failed to {context}")).await?;
        E::ENVELOPE.decode_one(body, &context)
    }

    /// Create a record; the server must echo the created record back
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unsupported`] when the entity cannot be created,
    /// or any request/decode error.
    pub async fn create<E: Entity>(&self, session: &Session, payload: Payload) -> GatewayResult<E> {
        let path = E::ENDPOINTS.create.ok_or(GatewayError::Unsupported {
            entity: E::NAME,
            operation: "created",
        })?;
        let context = format!("create {}", E::NAME);
        debug!(entity = E::NAME, "creating record");

        let request = Self::authorized(self.client.post(self.url(path)), session)?;
        let request = Self::with_payload(request, payload)?;
        let body = self.send(request, &format!("Failed to {context}")).await?;
        E::ENVELOPE.decode_one(body, &context)
    }

    /// Update a record; returns the server's copy when it echoes one
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unsupported`] when the entity cannot be updated,
    /// or any request/decode error.
    pub async fn update<E: Entity>(
        &self,
        session: &Session,
        id: &RecordId,
        payload: Payload,
    ) -> GatewayResult<Option<E>> {
        let template = E::ENDPOINTS.update.ok_or(GatewayError::Unsupported {
            entity: E::NAME,
            operation: "updated",
        })?;
        let context = format!("update {}", E::NAME);
        debug!(entity = E::NAME, %id, "updating record");

        let request = Self::authorized(self.client.put(self.url(&endpoint_path(template, id))), session)?;
        let request = Self::with_payload(request, payload)?;
        let body = self.send(request, &format!("Failed to {context}")).await?;
        E::ENVELOPE.decode_echo(body, &context)
    }

    /// Delete a record
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unsupported`] when the entity cannot be deleted,
    /// or any request error.
    pub async fn delete<E: Entity>(&self, session: &Session, id: &RecordId) -> GatewayResult<()> {
        let template = E::ENDPOINTS.delete.ok_or(GatewayError::Unsupported {
            entity: E::NAME,
            operation: "deleted",
        })?;
        debug!(entity = E::NAME, %id, "deleting record");

        let request =
            Self::authorized(self.client.delete(self.url(&endpoint_path(template, id))), session)?;
        let body = self
            .send(request, &format!("Failed to delete {}", E::NAME))
            .await?;
        E::ENVELOPE.check_ack(&body)
    }

    /// Change a record's status field
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the change.
    pub async fn change_status<E: StatusField>(
        &self,
        session: &Session,
        id: &RecordId,
        status: &E::Status,
    ) -> GatewayResult<()> {
        let change = E::status_request(id, status);
        debug!(entity = E::NAME, %id, path = %change.path, "changing status");

        let request = Self::authorized(
            self.client.request(change.method, self.url(&change.path)),
            session,
        )?;
        let body = self
            .send(request.json(&change.body), &format!("Failed to update {} status", E::NAME))
            .await?;
        E::ENVELOPE.check_ack(&body)
    }

    /// Fetch the record totals shown on the dashboard
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a summary.
    pub async fn stats_summary(&self, session: &Session) -> GatewayResult<StatsSummary> {
        let request = Self::authorized(self.client.get(self.url("/api/stats/summary")), session)?;
        let body = self.send(request, "Failed to load stats").await?;
        serde_json::from_value(body)
            .map_err(|e| GatewayError::decode("load stats", e.to_string()))
    }
}
