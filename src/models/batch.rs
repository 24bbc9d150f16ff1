use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BatchResult — in-band outcome of bulk adds and CSV imports
// ---------------------------------------------------------------------------

/// Result of a batched write.
///
/// Returned with HTTP 200 even when every row failed; the counters, not the
/// transport status, decide whether the batch succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(default)]
    pub success_count: u32,
    #[serde(default)]
    pub error_count: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    Success,
    Partial,
    Failed,
}

impl BatchResult {
    pub fn outcome(&self) -> BatchOutcome {
        if self.success_count == 0 {
            BatchOutcome::Failed
        } else if self.error_count > 0 || !self.errors.is_empty() {
            BatchOutcome::Partial
        } else {
            BatchOutcome::Success
        }
    }

    /// Error lines for display: at most `cap` literal entries, followed by an
    /// "... and N more" line when the list was cut.
    pub fn error_lines(&self, cap: usize) -> Vec<String> {
        let mut lines: Vec<String> = self.errors.iter().take(cap).cloned().collect();
        if self.errors.len() > cap {
            lines.push(format!("... and {} more", self.errors.len() - cap));
        }
        lines
    }
}

/// Acknowledgement for a custom import queued for manual processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportAck {
    pub message: String,
}
