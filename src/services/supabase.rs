use crate::models::{Farmer, SourcingRequest};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the hosted store
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or session token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Caller identity for a single request
///
/// Carries the caller's access token, if any, so the store can apply its
/// row-level policies. Without a token the service key is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExporterSession {
    access_token: Option<String>,
}

impl ExporterSession {
    pub fn anonymous() -> Self {
        Self { access_token: None }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.access_token.is_none()
    }
}

/// Table names in the hosted store
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub sourcing_requests: String,
    pub farmers: String,
}

/// PostgREST client for the hosted store
///
/// Handles the reads the matcher depends on:
/// - Fetching a sourcing request by id
/// - Fetching the farmer catalog
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: SupabaseTables,
}

impl SupabaseClient {
    /// Create a new store client
    pub fn new(
        base_url: String,
        api_key: String,
        timeout: Duration,
        tables: SupabaseTables,
    ) -> Result<Self, SupabaseError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
            tables,
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn authorized(&self, builder: RequestBuilder, session: &ExporterSession) -> RequestBuilder {
        let token = session.access_token().unwrap_or(self.api_key.as_str());

        builder
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", token))
            .header("Accept", "application/json")
    }

    /// Fetch a single sourcing request by id
    pub async fn get_sourcing_request(
        &self,
        request_id: &str,
        session: &ExporterSession,
    ) -> Result<SourcingRequest, SupabaseError> {
        let url = format!(
            "{}?id=eq.{}&select=*",
            self.rest_url(&self.tables.sourcing_requests),
            urlencoding::encode(request_id)
        );

        tracing::debug!("Fetching sourcing request from: {}", url);

        let response = self.authorized(self.client.get(&url), session).send().await?;
        let response = check_status(response, "fetch sourcing request").await?;

        let rows: Vec<Value> = response.json().await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound(format!("Sourcing request {} not found", request_id)))?;

        serde_json::from_value(row)
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse sourcing request: {}", e)))
    }

    /// Fetch the whole farmer catalog
    ///
    /// Rows that cannot be read as a farmer are skipped.
    pub async fn list_farmers(&self, session: &ExporterSession) -> Result<Vec<Farmer>, SupabaseError> {
        let url = format!("{}?select=*", self.rest_url(&self.tables.farmers));

        let response = self.authorized(self.client.get(&url), session).send().await?;
        let response = check_status(response, "list farmers").await?;

        let json: Value = response.json().await?;

        let rows = json
            .as_array()
            .ok_or_else(|| SupabaseError::InvalidResponse("Expected an array of farmers".into()))?;

        let farmers: Vec<Farmer> = rows
            .iter()
            .filter_map(|row| match serde_json::from_value::<Farmer>(row.clone()) {
                Ok(farmer) => Some(farmer),
                Err(e) => {
                    tracing::warn!("Skipping unreadable farmer row {:?}: {}", row.get("id"), e);
                    None
                }
            })
            .collect();

        tracing::debug!("Fetched {} farmers ({} rows)", farmers.len(), rows.len());

        Ok(farmers)
    }

    /// Check that the REST endpoint answers with the configured key
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/rest/v1/", self.base_url.trim_end_matches('/'));

        match self.authorized(self.client.get(&url), &ExporterSession::anonymous()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Store health check failed: {}", e);
                false
            }
        }
    }
}

async fn check_status(response: Response, action: &str) -> Result<Response, SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SupabaseError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
    tracing::error!("Failed to {}: {} - {}", action, status, body);

    Err(SupabaseError::ApiError(format!("Failed to {}: {}", action, status)))
}
