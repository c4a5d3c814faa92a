pub mod colors;
pub mod config;
pub mod error;
pub mod output;
pub mod poller;
pub mod report;
pub mod validation;
pub mod zone;

pub use error::{PollError, Result, ZoneWatchError};
pub use validation::normalize_zone_id;

pub use config::{ApiToken, PollerConfig};
pub use poller::ZoneStatusPoller;
pub use report::{CheckKind, CheckReport, PollOutcome};
pub use zone::{ZoneClient, ZoneQueryResult, ZoneStatus, ZoneStatusSource};

pub use output::{OutputFormat, OutputFormatter};

pub use tokio_util::sync::CancellationToken;
