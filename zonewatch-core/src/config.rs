//! Poller configuration and the API credential.

use std::fmt;
use std::time::Duration;

use crate::error::{Result, ZoneWatchError};
use crate::validation::{normalize_api_base, normalize_zone_id};

pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_ZONE_ID: &str = "b3220969343cf767a56095ddbd6d91a";

pub const TOKEN_ENV_VAR: &str = "CLOUDFLARE_API_TOKEN";
pub const ZONE_ID_ENV_VAR: &str = "CLOUDFLARE_ZONE_ID";

/// Used when no token is configured. Every request made with it fails
/// authorization, which shows up as an API error in the report.
pub const PLACEHOLDER_TOKEN: &str = "your_cloudflare_api_token_here";

/// Nine minutes between checks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(540);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer token for the Cloudflare API.
///
/// The secret is never printed: `Debug` and `Display` are redacted, and the
/// raw value is only reachable through [`ApiToken::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Read the token from `CLOUDFLARE_API_TOKEN`, falling back to the placeholder.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(TOKEN_ENV_VAR).ok())
    }

    /// Resolve an optional raw value the same way [`ApiToken::from_env`] does.
    /// Blank values count as unset.
    pub fn from_env_value(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self(v.trim().to_string()),
            _ => Self(PLACEHOLDER_TOKEN.to_string()),
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_TOKEN
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

impl fmt::Display for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Everything the poller needs, fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    zone_id: String,
    token: ApiToken,
    api_base: String,
    interval: Duration,
    request_timeout: Duration,
}

impl PollerConfig {
    /// Create a config for one zone with default endpoint, interval and timeout.
    /// Call [`PollerConfig::validate`] before use.
    pub fn new(zone_id: impl Into<String>, token: ApiToken) -> Self {
        Self {
            zone_id: zone_id.into(),
            token,
            api_base: DEFAULT_API_BASE.to_string(),
            interval: DEFAULT_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Build from `CLOUDFLARE_ZONE_ID` and `CLOUDFLARE_API_TOKEN`, with defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self> {
        let zone_id = std::env::var(ZONE_ID_ENV_VAR)
            .ok()
            .filter(|z| !z.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ZONE_ID.to_string());

        Self::new(zone_id, ApiToken::from_env()).validate()
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Normalize the zone id and API base and reject zero durations.
    pub fn validate(mut self) -> Result<Self> {
        self.zone_id = normalize_zone_id(&self.zone_id)?;
        self.api_base = normalize_api_base(&self.api_base)?;

        if self.interval.is_zero() {
            return Err(ZoneWatchError::InvalidInterval(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ZoneWatchError::InvalidInterval(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(self)
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn token(&self) -> &ApiToken {
        &self.token
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// `{api_base}/zones/{zone_id}`
    pub fn zone_url(&self) -> String {
        format!("{}/zones/{}", self.api_base, self.zone_id)
    }
}
