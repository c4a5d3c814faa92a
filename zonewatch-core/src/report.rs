//! The record of a single zone status check.

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PollError;
use crate::zone::ZoneQueryResult;

/// Whether the zone was seen live on a check. Nothing carries over between checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    Live,
    NotLive,
}

impl PollOutcome {
    pub fn is_live(self) -> bool {
        matches!(self, PollOutcome::Live)
    }
}

impl From<bool> for PollOutcome {
    fn from(live: bool) -> Self {
        if live {
            PollOutcome::Live
        } else {
            PollOutcome::NotLive
        }
    }
}

/// What a check observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckKind {
    /// `result.status == "active"`
    Live { zone_name: Option<String> },
    /// Any other status; normal while DNS propagates
    Syncing { status: String },
    /// `success: false`, with the document as received
    ApiError { raw: Value },
    /// Transport or protocol failure
    Failure { error_kind: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub checked_at: DateTime<Local>,
    pub zone_id: String,
    pub live: bool,
    pub message: String,
    #[serde(flatten)]
    pub kind: CheckKind,
}

impl CheckReport {
    /// Classify the result of one fetch.
    pub fn from_result(
        zone_id: &str,
        checked_at: DateTime<Local>,
        result: Result<ZoneQueryResult, PollError>,
    ) -> Self {
        let kind = match result {
            Ok(zone) if zone.is_active() => CheckKind::Live {
                zone_name: zone.name,
            },
            Ok(zone) => CheckKind::Syncing {
                status: zone.status.as_str().to_string(),
            },
            Err(PollError::Application { raw }) => CheckKind::ApiError { raw },
            Err(e) => CheckKind::Failure {
                error_kind: e.kind().to_string(),
                error: e.to_string(),
            },
        };

        let message = match &kind {
            CheckKind::Live { .. } => "DNS is LIVE on Cloudflare!".to_string(),
            CheckKind::Syncing { status } => format!("DNS Status: {} (still syncing)", status),
            CheckKind::ApiError { raw } => format!("Error: {}", raw),
            CheckKind::Failure { error, .. } => format!("Exception occurred: {}", error),
        };

        Self {
            checked_at,
            zone_id: zone_id.to_string(),
            live: matches!(kind, CheckKind::Live { .. }),
            message,
            kind,
        }
    }

    pub fn outcome(&self) -> PollOutcome {
        PollOutcome::from(self.live)
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.kind,
            CheckKind::ApiError { .. } | CheckKind::Failure { .. }
        )
    }

    /// ISO-8601 local time with millisecond precision.
    pub fn timestamp(&self) -> String {
        self.checked_at.to_rfc3339_opts(SecondsFormat::Millis, false)
    }

    /// `[<timestamp>] <message>`, without decoration.
    pub fn line(&self) -> String {
        format!("[{}] {}", self.timestamp(), self.message)
    }
}
