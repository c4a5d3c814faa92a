use colored::Colorize;

use super::OutputFormatter;
use crate::colors::CatppuccinExt;
use crate::report::{CheckKind, CheckReport};

pub struct HumanFormatter {
    use_colors: bool,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn timestamp(&self, text: &str) -> String {
        if self.use_colors {
            text.overlay0().to_string()
        } else {
            text.to_string()
        }
    }

    fn success(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn warning(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.use_colors {
            text.ctp_red().to_string()
        } else {
            text.to_string()
        }
    }

    fn failure(&self, text: &str) -> String {
        if self.use_colors {
            text.peach().to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_report(&self, report: &CheckReport) -> String {
        let (icon, message) = match &report.kind {
            CheckKind::Live { .. } => ("✅", self.success(&report.message)),
            CheckKind::Syncing { .. } => ("⏳", self.warning(&report.message)),
            CheckKind::ApiError { .. } => ("❌", self.error(&report.message)),
            CheckKind::Failure { .. } => ("⚠️", self.failure(&report.message)),
        };

        format!(
            "{} {} {}",
            self.timestamp(&format!("[{}]", report.timestamp())),
            icon,
            message
        )
    }
}
