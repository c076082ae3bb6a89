use crate::error::{ClientError, Result};
use crate::record::{Balance, BacklinksResponse, MetricMap};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://domdetailer.com/";
pub const DEFAULT_APP_NAME: &str = "BacklinksAnalyzer";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const BACKLINKS_ENDPOINT: &str = "api2/getBacklinks.php";
const DOMAIN_METRICS_ENDPOINT: &str = "api/checkDomain.php";
const BALANCE_ENDPOINT: &str = "api/checkBalance.php";

/// Client for the backlink data provider.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    api_key: String,
    app_name: String,
    base_url: Url,
}

impl ApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("Backlens/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        let base_url = Url::parse(DEFAULT_API_BASE)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", DEFAULT_API_BASE, e)))?;

        Ok(Self {
            client,
            api_key: api_key.into().trim().to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            base_url,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends in '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        self.base_url = Url::parse(&normalized)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        Ok(self)
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the backlink list and summary metrics for `domain`.
    pub async fn backlinks(&self, domain: &str, one_per_domain: bool) -> Result<BacklinksResponse> {
        info!("Fetching backlinks for {}", domain);
        let one_per_domain = if one_per_domain { "1" } else { "0" };
        let body = self
            .get(
                BACKLINKS_ENDPOINT,
                &[("domain", domain), ("onePerDomain", one_per_domain)],
            )
            .await?;
        let response: BacklinksResponse = serde_json::from_str(&body)?;
        info!("Received {} backlinks for {}", response.backlinks.len(), domain);
        Ok(response)
    }

    /// Fetch authority metrics (Moz, Majestic, ...) for `domain`.
    pub async fn domain_metrics(&self, domain: &str) -> Result<MetricMap> {
        info!("Fetching domain metrics for {}", domain);
        let body = self.get(DOMAIN_METRICS_ENDPOINT, &[("domain", domain)]).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Remaining API credits. The provider answers with `["UnitsLeft", "49110"]`.
    pub async fn balance(&self) -> Result<Balance> {
        let body = self.get(BALANCE_ENDPOINT, &[]).await?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&body)
            .map_err(|_| ClientError::UnexpectedResponse(body.clone()))?;

        let credits = values.get(1).and_then(|value| match value {
            serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
            serde_json::Value::Number(n) => n.as_u64(),
            _ => None,
        });

        match credits {
            Some(credits_remaining) => Ok(Balance { credits_remaining }),
            None => Err(ClientError::UnexpectedResponse(body)),
        }
    }

    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", endpoint, e)))?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("apikey", self.api_key.as_str()), ("app", self.app_name.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("{} answered {} ({} bytes)", endpoint, status, body.len());

        if status.is_success() {
            return Ok(body);
        }

        Err(match status.as_u16() {
            401 | 403 => ClientError::InvalidApiKey,
            402 => ClientError::OutOfCredits,
            code => ClientError::Status { code, body },
        })
    }
}
