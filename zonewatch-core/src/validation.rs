//! Zone id and API base validation

use crate::error::{Result, ZoneWatchError};

/// Normalize and validate a zone identifier
///
/// Zone ids are opaque, but they end up in a URL path, so only ASCII
/// alphanumerics are accepted. Surrounding whitespace is trimmed and the
/// id is lowercased (Cloudflare ids are lowercase hex).
pub fn normalize_zone_id(zone_id: &str) -> Result<String> {
    let zone_id = zone_id.trim().to_lowercase();

    if zone_id.is_empty() {
        return Err(ZoneWatchError::InvalidZoneId(zone_id));
    }

    if !zone_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ZoneWatchError::InvalidZoneId(zone_id));
    }

    Ok(zone_id)
}

/// Normalize an API base URL
///
/// Requires an http(s) scheme and strips trailing slashes so paths can be
/// appended with a single `/`.
pub fn normalize_api_base(base: &str) -> Result<String> {
    let base = base.trim();

    let rest = base
        .strip_prefix("https://")
        .or_else(|| base.strip_prefix("http://"))
        .ok_or_else(|| ZoneWatchError::InvalidApiBase(base.to_string()))?;

    if rest.trim_end_matches('/').is_empty() || rest.contains(char::is_whitespace) {
        return Err(ZoneWatchError::InvalidApiBase(base.to_string()));
    }

    Ok(base.trim_end_matches('/').to_string())
}
