use crate::auth::Session;
use crate::config::Config;
use crate::models::{NewVilla, Villa, VillaId};
use crate::store::traits::RecordStore;
use crate::store::types::StoreError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, warn};

/// Record store backed by a Supabase table through its PostgREST API
pub struct SupabaseStore {
    client: Client,
    rest_url: String,
    anon_key: String,
    access_token: Option<String>,
}

/// PostgREST error body
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    details: Option<String>,
}

impl SupabaseStore {
    /// Create a store for `config.table`, authorized with the anon key only
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("villa-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1/{}", config.supabase_url, config.table),
            anon_key: config.supabase_anon_key.clone(),
            access_token: None,
        })
    }

    /// Act on behalf of a signed-in operator so row level security applies
    pub fn with_session(mut self, session: &Session) -> Self {
        self.access_token = Some(session.access_token.clone());
        self
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }

    fn row_url(&self, id: VillaId) -> String {
        format!("{}?id=eq.{}", self.rest_url, id)
    }

    /// Read a successful response as rows, or turn a failure into `StoreError`
    async fn rows(response: Response) -> Result<Vec<Villa>, StoreError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Store returned status: {}", status);
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status.as_u16(), &body),
            });
        }

        debug!("Received {} bytes from store", body.len());
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Pick the most useful human-readable message out of an error body
fn rejection_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(PostgrestError { message: Some(message), .. }) => message,
        Ok(PostgrestError { details: Some(details), .. }) => details,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => format!("request failed with status {}", status),
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    #[tracing::instrument(skip(self))]
    async fn select_all(&self) -> Result<Vec<Villa>, StoreError> {
        let url = format!("{}?select=*&order=created_at.desc", self.rest_url);
        let response = self.request(Method::GET, &url).send().await?;
        Self::rows(response).await
    }

    #[tracing::instrument(skip(self, villa), fields(name = %villa.name))]
    async fn insert(&self, villa: &NewVilla) -> Result<Villa, StoreError> {
        let response = self
            .request(Method::POST, &self.rest_url)
            .header("Prefer", "return=representation")
            .json(&[villa])
            .send()
            .await?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_string()))
    }

    #[tracing::instrument(skip(self, villa))]
    async fn update_by_id(&self, id: VillaId, villa: &NewVilla) -> Result<Villa, StoreError> {
        let response = self
            .request(Method::PATCH, &self.row_url(id))
            .header("Prefer", "return=representation")
            .json(villa)
            .send()
            .await?;

        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound(id))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_by_id(&self, id: VillaId) -> Result<(), StoreError> {
        let response = self
            .request(Method::DELETE, &self.row_url(id))
            .header("Prefer", "return=representation")
            .send()
            .await?;

        if Self::rows(response).await?.is_empty() {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "Supabase"
    }
}
