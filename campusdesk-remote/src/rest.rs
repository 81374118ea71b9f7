//! REST implementation of the gateway.
//!
//! Speaks a PostgREST-style dialect: `GET /rest/v1/<table>?select=*`,
//! `POST` with `Prefer: return=representation`, and
//! `PATCH /rest/v1/<table>?id=eq.<id>`. Every call carries the API key in
//! both the `apikey` header and a bearer token.

use crate::config::RemoteConfig;
use crate::error::{RemoteError, RemoteResult};
use crate::rows::{HostelRoomRow, PaymentRow, StudentRow, TableRow};
use crate::service::{EntityService, RemoteGateway};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Shared HTTP client bound to one backend.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    /// Builds a client. Fails with `NotConfigured` if the configuration
    /// does not pass [`RemoteConfig::is_configured`].
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        if !config.is_configured() {
            return Err(RemoteError::NotConfigured(
                "missing or malformed remote URL / API key".to_string(),
            ));
        }
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RemoteError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Sends a request and decodes a JSON array of rows.
    async fn send_rows<R: TableRow>(&self, request: RequestBuilder) -> RemoteResult<Vec<R>> {
        let response = self.authorize(request).send().await?;
        let response = check_status(response).await?;
        let rows = response.json::<Vec<R>>().await?;
        Ok(rows)
    }

    /// Builds the full gateway over this client.
    pub fn gateway(self) -> RemoteGateway {
        let client = Arc::new(self);
        RemoteGateway::new(
            Arc::new(RestTable::<StudentRow>::new(client.clone())),
            Arc::new(RestTable::<PaymentRow>::new(client.clone())),
            Arc::new(RestTable::<HostelRoomRow>::new(client)),
        )
    }
}

async fn check_status(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Auth(body),
        StatusCode::NOT_FOUND => RemoteError::NotFound(body),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            RemoteError::Validation(body)
        }
        _ => RemoteError::Http {
            status: status.as_u16(),
            body,
        },
    })
}

/// [`EntityService`] over one REST table.
pub struct RestTable<R> {
    client: Arc<RestClient>,
    _row: PhantomData<fn() -> R>,
}

impl<R> RestTable<R> {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self {
            client,
            _row: PhantomData,
        }
    }
}

#[async_trait]
impl<R: TableRow + 'static> EntityService for RestTable<R> {
    type Entity = R::Entity;
    type Patch = R::Patch;

    fn name(&self) -> &'static str {
        R::TABLE
    }

    async fn list_all(&self) -> RemoteResult<Vec<R::Entity>> {
        let request = self
            .client
            .http
            .get(self.client.table_url(R::TABLE))
            .query(&[("select", "*")]);
        let rows: Vec<R> = self.client.send_rows(request).await?;
        debug!("Fetched {} rows from {}", rows.len(), R::TABLE);
        rows.into_iter().map(TableRow::into_entity).collect()
    }

    async fn create(&self, entity: &R::Entity) -> RemoteResult<R::Entity> {
        let request = self
            .client
            .http
            .post(self.client.table_url(R::TABLE))
            .header("Prefer", "return=representation")
            .json(&R::from_entity(entity));
        let rows: Vec<R> = self.client.send_rows(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::Decode(format!("{}: create returned no row", R::TABLE)))?
            .into_entity()
    }

    async fn update(&self, id: &str, patch: &R::Patch) -> RemoteResult<R::Entity> {
        let request = self
            .client
            .http
            .patch(self.client.table_url(R::TABLE))
            .query(&[(R::KEY_COLUMN, format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&R::patch_body(patch));
        let rows: Vec<R> = self.client.send_rows(request).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RemoteError::NotFound(format!("{} row {id}", R::TABLE)))?
            .into_entity()
    }
}
