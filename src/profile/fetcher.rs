// Profile enrichment client
//
// Live mode asks the Scrapin enrichment endpoint for the profile behind a
// LinkedIn URL. Mock mode ignores the URL and downloads a fixed public
// fixture, which keeps manual runs deterministic and free of API credits.

use super::ProfileRecord;
use crate::error::Result;
use crate::services::traits::ProfileSource;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_ENRICHMENT_ENDPOINT: &str = "https://api.scrapin.io/enrichment/profile";

/// Scrapin response for Eden Marco, published as a gist
pub const MOCK_PROFILE_FIXTURE_URL: &str = "https://gist.githubusercontent.com/govinda-lienart/78c49ecaffcc77b61db1568abea39761/raw/491b6640cbdb95a192992a0e3d7f1258edef6eca/eden-marco-scrapin.json";

/// Default limit for every enrichment request; not retried
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where profile data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Static fixture, for deterministic testing only
    Mock,
    /// Hosted enrichment API
    #[default]
    Live,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("SCRAPIN_API_KEY is required for live profile fetches")]
    MissingApiKey,

    #[error("profile request timed out")]
    Timeout,

    #[error("enrichment API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response has no 'person' object")]
    MissingPerson,

    #[error("transport error: {0}")]
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err)
        }
    }
}

pub struct ProfileFetcher {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    fixture_url: String,
    timeout: Duration,
}

impl ProfileFetcher {
    /// Create a fetcher; `api_key` may be `None` when only mock mode is used
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::version::user_agent())
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            endpoint: DEFAULT_ENRICHMENT_ENDPOINT.to_string(),
            fixture_url: MOCK_PROFILE_FIXTURE_URL.to_string(),
            timeout: FETCH_TIMEOUT,
        })
    }

    /// Override the per-request limit (defaults to [`FETCH_TIMEOUT`])
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_fixture_url(mut self, fixture_url: impl Into<String>) -> Self {
        self.fixture_url = fixture_url.into();
        self
    }

    /// Fetch and normalize the profile behind `url`
    ///
    /// # Errors
    /// - `FetchError::MissingApiKey` in live mode without a key (no request is sent)
    /// - `FetchError::Timeout` / `Transport` / `Status` for HTTP failures
    /// - `FetchError::MissingPerson` when the payload lacks a `person` object
    pub async fn fetch(&self, url: &str, mode: FetchMode) -> Result<ProfileRecord> {
        let request = match mode {
            FetchMode::Mock => {
                debug!("Mock mode: ignoring {} and loading the fixture", url);
                self.client.get(&self.fixture_url)
            }
            FetchMode::Live => {
                let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
                info!("Fetching profile data for {}", url);
                self.client
                    .get(&self.endpoint)
                    .query(&[("apikey", api_key), ("linkedInUrl", url)])
            }
        };

        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let payload: Value = response.json().await.map_err(FetchError::from)?;
        let person = match payload.get("person") {
            Some(Value::Object(person)) => person.clone(),
            _ => return Err(FetchError::MissingPerson.into()),
        };

        let record = ProfileRecord::from_person(person);
        debug!("Profile record: {:?}", record);
        Ok(record)
    }
}

#[async_trait]
impl ProfileSource for ProfileFetcher {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<ProfileRecord> {
        ProfileFetcher::fetch(self, url, mode).await
    }
}
