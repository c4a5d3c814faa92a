use std::error::Error as _;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument};

use super::types::ZoneQueryResult;
use crate::config::{ApiToken, PollerConfig};
use crate::error::{PollError, Result, ZoneWatchError};

/// Longest slice of a non-JSON body quoted in a protocol error.
const MAX_BODY_EXCERPT: usize = 200;

/// Anything that can answer "what is the zone's status right now".
///
/// [`ZoneClient`] is the real implementation; the poller only sees this trait.
#[async_trait]
pub trait ZoneStatusSource: Send + Sync {
    async fn fetch_zone(&self) -> std::result::Result<ZoneQueryResult, PollError>;
}

/// Client for the Cloudflare zone details endpoint
#[derive(Debug, Clone)]
pub struct ZoneClient {
    http: Client,
    url: String,
    zone_id: String,
    token: ApiToken,
    timeout: Duration,
}

impl ZoneClient {
    /// Build a client for the zone named in `config`.
    pub fn new(config: &PollerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("zonewatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ZoneWatchError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            url: config.zone_url(),
            zone_id: config.zone_id().to_string(),
            token: config.token().clone(),
            timeout: config.request_timeout(),
        })
    }

    /// GET the zone and interpret the envelope.
    #[instrument(skip(self), fields(zone_id = %self.zone_id))]
    pub async fn fetch(&self) -> std::result::Result<ZoneQueryResult, PollError> {
        debug!("Requesting zone status from {}", self.url);

        let response = self
            .http
            .get(&self.url)
            .bearer_auth(self.token.expose())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&e))?;

        debug!(http_status = status.as_u16(), bytes = body.len(), "Zone response received");

        // Cloudflare answers auth and lookup failures with a 4xx *and* a JSON
        // envelope carrying `success: false`; that stays an API error. A
        // non-2xx can never report a status, whatever its body claims.
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(raw) => match ZoneQueryResult::from_document(raw) {
                Ok(_) if !status.is_success() => Err(PollError::Protocol(format!(
                    "HTTP {} with a success envelope",
                    status
                ))),
                other => other,
            },
            Err(_) if !status.is_success() => Err(PollError::Protocol(format!(
                "HTTP {} with non-JSON body: {}",
                status,
                excerpt(&body)
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn transport_error(&self, error: &reqwest::Error) -> PollError {
        if error.is_timeout() {
            return PollError::Transport(format!(
                "request timed out after {}s",
                self.timeout.as_secs_f64()
            ));
        }
        PollError::Transport(describe_error_chain(error))
    }
}

#[async_trait]
impl ZoneStatusSource for ZoneClient {
    async fn fetch_zone(&self) -> std::result::Result<ZoneQueryResult, PollError> {
        self.fetch().await
    }
}

/// reqwest's top-level message hides the cause ("error sending request"),
/// so walk the source chain.
fn describe_error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_BODY_EXCERPT {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX_BODY_EXCERPT).collect();
    format!("{}...", cut)
}
