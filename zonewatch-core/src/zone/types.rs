use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PollError;

/// Zone status as reported by the provider.
///
/// Only [`ZoneStatus::Active`] means DNS is live. Unknown values are kept
/// verbatim in [`ZoneStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ZoneStatus {
    Active,
    Pending,
    Initializing,
    Moved,
    Deleted,
    Deactivated,
    Other(String),
}

impl ZoneStatus {
    /// The literal provider string.
    pub fn as_str(&self) -> &str {
        match self {
            ZoneStatus::Active => "active",
            ZoneStatus::Pending => "pending",
            ZoneStatus::Initializing => "initializing",
            ZoneStatus::Moved => "moved",
            ZoneStatus::Deleted => "deleted",
            ZoneStatus::Deactivated => "deactivated",
            ZoneStatus::Other(s) => s,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ZoneStatus::Active)
    }
}

// Exact match: "Active" is not "active".
impl From<String> for ZoneStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => ZoneStatus::Active,
            "pending" => ZoneStatus::Pending,
            "initializing" => ZoneStatus::Initializing,
            "moved" => ZoneStatus::Moved,
            "deleted" => ZoneStatus::Deleted,
            "deactivated" => ZoneStatus::Deactivated,
            _ => ZoneStatus::Other(s),
        }
    }
}

impl From<&str> for ZoneStatus {
    fn from(s: &str) -> Self {
        ZoneStatus::from(s.to_string())
    }
}

impl From<ZoneStatus> for String {
    fn from(status: ZoneStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One successful answer from the zone endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneQueryResult {
    /// Always true; `success: false` documents become [`PollError::Application`]
    pub success: bool,
    /// Value of `result.status`
    pub status: ZoneStatus,
    /// Value of `result.name`, when present
    pub name: Option<String>,
    /// The full response document
    pub raw: Value,
}

impl ZoneQueryResult {
    /// Parse a response body.
    pub fn parse(body: &str) -> Result<Self, PollError> {
        let raw: Value = serde_json::from_str(body)?;
        Self::from_document(raw)
    }

    /// Interpret an already-decoded response document.
    pub fn from_document(raw: Value) -> Result<Self, PollError> {
        let success = raw
            .get("success")
            .and_then(Value::as_bool)
            .ok_or_else(|| {
                PollError::Protocol("response has no boolean `success` field".to_string())
            })?;

        if !success {
            return Err(PollError::Application { raw });
        }

        let result = raw
            .get("result")
            .ok_or_else(|| PollError::Protocol("response has no `result` object".to_string()))?;

        let status = result
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| PollError::Protocol("response has no `result.status` string".to_string()))?;

        let status = ZoneStatus::from(status);
        let name = result.get("name").and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            success,
            status,
            name,
            raw,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
