//! OpenTSDB HTTP API client (`POST /api/put`)

use super::{DataPoint, MetricSink};
use crate::{
    error::{AppError, Result},
    models::TsdbConfig,
};
use async_trait::async_trait;
use reqwest::{Client, Url};

/// Sends datapoints to an OpenTSDB server
#[derive(Debug, Clone)]
pub struct TsdbClient {
    client: Client,
    endpoint: Url,
    username: Option<String>,
    password: Option<String>,
}

impl TsdbClient {
    pub fn new(config: &TsdbConfig) -> Result<Self> {
        let base = config
            .url
            .as_deref()
            .ok_or_else(|| AppError::config("TSDB URL is not configured"))?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("conncheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::metric_emission(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: put_endpoint(base)?,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MetricSink for TsdbClient {
    async fn emit(&self, points: &[DataPoint]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }

        let mut request = self.client.post(self.endpoint.clone()).json(points);
        if let Some(ref user) = self.username {
            request = request.basic_auth(user, self.password.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::metric_emission(format!(
            "OpenTSDB rejected {} datapoint(s) with HTTP {}: {}",
            points.len(),
            status.as_u16(),
            body.trim()
        )))
    }

    fn name(&self) -> &str {
        "opentsdb"
    }
}

/// `<base>/api/put`, keeping any path prefix on the base URL
pub fn put_endpoint(base: &str) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| AppError::config(format!("Invalid TSDB URL '{}': {}", base, e)))?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url.join("api/put")
        .map_err(|e| AppError::config(format!("Invalid TSDB URL '{}': {}", base, e)))
}
