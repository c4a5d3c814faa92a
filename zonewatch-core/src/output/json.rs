use super::OutputFormatter;
use crate::report::CheckReport;

/// One compact JSON object per report, for piping into log collectors.
pub struct JsonFormatter;

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &CheckReport) -> String {
        serde_json::to_string(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}
