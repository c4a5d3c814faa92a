//! The zone status polling loop.
//!
//! One check at a time: fetch, classify, report, sleep. The sleep is a fixed
//! interval whatever the previous check saw, and there are no retries.
//! Every loop takes a [`CancellationToken`] so callers can stop it between
//! or during checks.

use std::time::Duration;

use chrono::Local;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::config::PollerConfig;
use crate::error::{PollError, Result};
use crate::report::{CheckKind, CheckReport};
use crate::zone::{ZoneClient, ZoneQueryResult, ZoneStatusSource};

/// Polls one zone until cancelled.
#[derive(Debug)]
pub struct ZoneStatusPoller<S = ZoneClient> {
    source: S,
    zone_id: String,
    interval: Duration,
}

impl ZoneStatusPoller<ZoneClient> {
    /// Validate `config` and build a poller backed by the HTTP client.
    pub fn from_config(config: PollerConfig) -> Result<Self> {
        let config = config.validate()?;
        let client = ZoneClient::new(&config)?;
        Ok(Self::new(client, &config))
    }
}

impl<S: ZoneStatusSource> ZoneStatusPoller<S> {
    /// Poll `source` using the zone id and interval from `config`.
    pub fn new(source: S, config: &PollerConfig) -> Self {
        Self {
            source,
            zone_id: config.zone_id().to_string(),
            interval: config.interval(),
        }
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch once and return the typed result. Failures stay as errors.
    pub async fn check(&self) -> std::result::Result<ZoneQueryResult, PollError> {
        self.source.fetch_zone().await
    }

    /// Fetch once and classify. Never fails: every error becomes a
    /// report whose outcome is not live.
    #[instrument(skip(self), fields(zone_id = %self.zone_id))]
    pub async fn check_zone_status(&self) -> CheckReport {
        let result = self.check().await;
        let report = CheckReport::from_result(&self.zone_id, Local::now(), result);

        match &report.kind {
            CheckKind::Live { zone_name } => {
                info!(zone_name = ?zone_name, "Zone is active")
            }
            CheckKind::Syncing { status } => info!(status = %status, "Zone still syncing"),
            CheckKind::ApiError { raw } => error!(response = %raw, "Zone API reported failure"),
            CheckKind::Failure { error_kind, error } => {
                error!(kind = %error_kind, error = %error, "Zone status check failed")
            }
        }

        report
    }

    /// Check, report, sleep, repeat until `cancel` fires. Returns the number
    /// of completed checks.
    pub async fn run_until_cancelled<F>(&self, cancel: &CancellationToken, on_report: F) -> usize
    where
        F: FnMut(&CheckReport),
    {
        self.run_loop(cancel, on_report, false).await
    }

    /// Like [`run_until_cancelled`](Self::run_until_cancelled), but also stops
    /// after the first live check.
    pub async fn run_until_live<F>(&self, cancel: &CancellationToken, on_report: F) -> usize
    where
        F: FnMut(&CheckReport),
    {
        self.run_loop(cancel, on_report, true).await
    }

    /// Poll with no exit condition. Only ends when the process does.
    pub async fn run_forever<F>(&self, on_report: F)
    where
        F: FnMut(&CheckReport),
    {
        self.run_until_cancelled(&CancellationToken::new(), on_report)
            .await;
    }

    async fn run_loop<F>(
        &self,
        cancel: &CancellationToken,
        mut on_report: F,
        stop_when_live: bool,
    ) -> usize
    where
        F: FnMut(&CheckReport),
    {
        let mut checks = 0;

        loop {
            let report = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("Polling cancelled");
                    break;
                }
                report = self.check_zone_status() => report,
            };

            checks += 1;
            on_report(&report);

            if stop_when_live && report.is_live() {
                info!(checks, "Zone is live, stopping");
                break;
            }

            debug!(
                interval_secs = self.interval.as_secs(),
                "Sleeping until next check"
            );
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("Polling cancelled during sleep");
                    break;
                }
                () = tokio::time::sleep(self.interval) => {}
            }
        }

        checks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiToken;
    use crate::report::PollOutcome;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    type FetchResult = std::result::Result<ZoneQueryResult, PollError>;

    /// Replays canned results, repeating the last one, and records call times.
    struct ScriptedSource {
        script: Mutex<VecDeque<FetchResult>>,
        last: Mutex<Option<FetchResult>>,
        calls: Arc<Mutex<Vec<Instant>>>,
        cancel_after: Option<(usize, CancellationToken)>,
    }

    impl ScriptedSource {
        fn new(script: Vec<FetchResult>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                last: Mutex::new(None),
                calls: Arc::new(Mutex::new(Vec::new())),
                cancel_after: None,
            }
        }

        fn cancelling_after(mut self, calls: usize, token: CancellationToken) -> Self {
            self.cancel_after = Some((calls, token));
            self
        }
    }

    #[async_trait]
    impl ZoneStatusSource for ScriptedSource {
        async fn fetch_zone(&self) -> FetchResult {
            let count = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(Instant::now());
                calls.len()
            };
            if let Some((limit, token)) = &self.cancel_after {
                if count >= *limit {
                    token.cancel();
                }
            }

            let next = self.script.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            match next {
                Some(result) => {
                    *last = Some(result.clone());
                    result
                }
                None => last
                    .clone()
                    .unwrap_or_else(|| Err(PollError::Transport("script exhausted".to_string()))),
            }
        }
    }

    fn zone(status: &str) -> FetchResult {
        ZoneQueryResult::from_document(json!({"success": true, "result": {"status": status}}))
    }

    fn config() -> PollerConfig {
        PollerConfig::new("abc123", ApiToken::new("test-token"))
            .validate()
            .unwrap()
    }

    #[tokio::test]
    async fn test_active_zone_is_live_and_repeatable() {
        let poller = ZoneStatusPoller::new(ScriptedSource::new(vec![zone("active")]), &config());

        let first = poller.check_zone_status().await;
        let second = poller.check_zone_status().await;

        assert_eq!(first.outcome(), PollOutcome::Live);
        assert!(first.message.contains("LIVE"));
        assert_eq!(second.outcome(), PollOutcome::Live);
        assert_eq!(first.message, second.message);
    }

    #[tokio::test]
    async fn test_pending_zone_is_not_live() {
        let poller = ZoneStatusPoller::new(ScriptedSource::new(vec![zone("pending")]), &config());

        let report = poller.check_zone_status().await;
        assert!(!report.is_live());
        assert!(report.message.contains("pending"));
    }

    #[tokio::test]
    async fn test_api_failure_is_not_live_and_logs_document() {
        let raw = json!({"success": false, "errors": [{"code": 10000, "message": "Authentication error"}]});
        let poller = ZoneStatusPoller::new(
            ScriptedSource::new(vec![Err(PollError::Application { raw: raw.clone() })]),
            &config(),
        );

        let report = poller.check_zone_status().await;
        assert!(!report.is_live());
        assert!(report.message.contains(&raw.to_string()));
        assert!(report.message.contains("Authentication error"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_contained() {
        let poller = ZoneStatusPoller::new(
            ScriptedSource::new(vec![Err(PollError::Transport(
                "dns error: failed to lookup address information".to_string(),
            ))]),
            &config(),
        );

        let report = poller.check_zone_status().await;
        assert!(!report.is_live());
        assert!(report.message.contains("failed to lookup address information"));

        // The typed path keeps the error inspectable.
        assert_eq!(poller.check().await.unwrap_err().kind(), "transport");
    }

    #[tokio::test]
    async fn test_malformed_body_is_contained() {
        let poller = ZoneStatusPoller::new(
            ScriptedSource::new(vec![ZoneQueryResult::parse("<html>oops</html>")]),
            &config(),
        );

        let report = poller.check_zone_status().await;
        assert!(!report.is_live());
        assert!(report.is_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_checks_are_separated_by_interval() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource::new(vec![zone("pending")]).cancelling_after(3, cancel.clone());
        let calls = source.calls.clone();
        let poller = ZoneStatusPoller::new(source, &config());

        let mut reports = Vec::new();
        let checks = poller
            .run_until_cancelled(&cancel, |r| reports.push(r.clone()))
            .await;

        assert_eq!(checks, 3);
        assert_eq!(reports.len(), 3);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(540));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcome_does_not_stop_plain_loop() {
        let cancel = CancellationToken::new();
        let source = ScriptedSource::new(vec![
            zone("pending"),
            zone("active"),
            Err(PollError::Protocol("truncated".to_string())),
            zone("active"),
        ])
        .cancelling_after(4, cancel.clone());
        let poller = ZoneStatusPoller::new(source, &config());

        let mut outcomes = Vec::new();
        let checks = poller
            .run_until_cancelled(&cancel, |r| outcomes.push(r.is_live()))
            .await;

        assert_eq!(checks, 4);
        assert_eq!(outcomes, vec![false, true, false, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_live_stops_on_first_active() {
        let source = ScriptedSource::new(vec![zone("initializing"), zone("pending"), zone("active")]);
        let calls = source.calls.clone();
        let poller = ZoneStatusPoller::new(source, &config());

        let checks = poller
            .run_until_live(&CancellationToken::new(), |_| {})
            .await;

        assert_eq!(checks, 3);
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_prevents_any_check() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let source = ScriptedSource::new(vec![zone("active")]);
        let calls = source.calls.clone();
        let poller = ZoneStatusPoller::new(source, &config());

        let checks = poller.run_until_cancelled(&cancel, |_| {}).await;

        assert_eq!(checks, 0);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_sleep_returns_promptly() {
        let cancel = CancellationToken::new();
        let poller = ZoneStatusPoller::new(ScriptedSource::new(vec![zone("pending")]), &config());

        let start = Instant::now();
        let canceller = {
            let cancel = cancel.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                cancel.cancel();
            }
        };
        let (checks, ()) = tokio::join!(poller.run_until_cancelled(&cancel, |_| {}), canceller);

        assert_eq!(checks, 1);
        assert!(Instant::now() - start < Duration::from_secs(540));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_forever_keeps_polling() {
        let poller = ZoneStatusPoller::new(ScriptedSource::new(vec![zone("active")]), &config());

        let mut checks = 0;
        let result = tokio::time::timeout(
            Duration::from_secs(540 * 2 + 1),
            poller.run_forever(|_| checks += 1),
        )
        .await;

        assert!(result.is_err());
        // Checks at 0s, 540s and 1080s; a live zone does not end the loop.
        assert_eq!(checks, 3);
    }

    #[test]
    fn test_from_config_rejects_bad_zone_id() {
        let config = PollerConfig::new("../etc", ApiToken::new("t"));
        assert!(ZoneStatusPoller::from_config(config).is_err());
    }
}
