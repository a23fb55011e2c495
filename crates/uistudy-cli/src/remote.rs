//! Retrieval of survey responses from the Supabase REST interface.

use std::time::Duration;

use anyhow::{Context, bail};
use reqwest::{
    blocking::{Client, RequestBuilder},
    header::ACCEPT,
};
use serde::de::DeserializeOwned;
use tracing::info;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection options shared by every command that reads the remote table.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RemoteArg {
    /// Base URL of the Supabase project
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,
    /// API key sent with every request
    #[arg(long, env = "SUPABASE_SERVICE_KEY", hide_env_values = true)]
    pub service_key: Option<String>,
    /// Table holding the survey responses
    #[arg(long, default_value = "survey_responses")]
    pub table: String,
    /// Maximum number of responses to retrieve
    #[arg(long)]
    pub limit: Option<usize>,
}

impl RemoteArg {
    pub fn client(&self) -> anyhow::Result<SupabaseClient> {
        let (Some(url), Some(key)) = (&self.supabase_url, &self.service_key) else {
            bail!("SUPABASE_URL and SUPABASE_SERVICE_KEY must be set (or pass --supabase-url and --service-key)");
        };
        SupabaseClient::new(url, key)
    }

    /// Downloads every row of the configured table.
    pub fn fetch_rows<T>(&self) -> anyhow::Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.client()?.fetch_rows(&self.table, self.limit)
    }
}

#[derive(Debug)]
pub(crate) struct SupabaseClient {
    client: Client,
    base_url: String,
    key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, key: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            key: key.to_owned(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn rows_request(&self, table: &str, limit: Option<usize>) -> RequestBuilder {
        let mut query = vec![("select", "*".to_owned())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.client
            .get(self.table_url(table))
            .query(&query)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header(ACCEPT, "application/json")
    }

    /// Retrieves the rows of `table`, at most `limit` of them.
    pub fn fetch_rows<T>(&self, table: &str, limit: Option<usize>) -> anyhow::Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.table_url(table);
        info!(%url, ?limit, "Fetching survey responses");
        let response = self
            .rows_request(table, limit)
            .send()
            .with_context(|| format!("Failed to request {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("Request to {url} failed with status {status}: {body}");
        }

        let rows = response
            .json::<Vec<T>>()
            .with_context(|| format!("Failed to decode response from {url}"))?;
        info!(rows = rows.len(), "Fetched survey responses");
        Ok(rows)
    }
}
