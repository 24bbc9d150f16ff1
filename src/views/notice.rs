//! User-visible notices (toasts) raised by views.

use crate::config;
use crate::error::ClientError;
use crate::models::{BatchOutcome, BatchResult, ImportAck};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Extra lines for a detail panel, e.g. per-row batch errors.
    pub details: Vec<String>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn from_error(err: &ClientError) -> Self {
        Self::error(err.user_message())
    }

    /// Render a batch result.
    ///
    /// Zero successes is an error notice even though the call itself
    /// succeeded; a mix of successes and errors is a warning. Error lines are
    /// capped at [`config::MAX_BATCH_ERROR_LINES`].
    pub fn from_batch(result: &BatchResult) -> Self {
        Self::from_batch_capped(result, config::MAX_BATCH_ERROR_LINES)
    }

    pub fn from_batch_capped(result: &BatchResult, cap: usize) -> Self {
        let (level, message) = match result.outcome() {
            BatchOutcome::Success => (
                NoticeLevel::Success,
                format!("{} cards added", result.success_count),
            ),
            BatchOutcome::Partial => (
                NoticeLevel::Warning,
                format!(
                    "{} cards added, {} failed",
                    result.success_count, result.error_count
                ),
            ),
            BatchOutcome::Failed => (
                NoticeLevel::Error,
                result
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| format!("No cards added, {} failed", result.error_count)),
            ),
        };
        Self {
            level,
            message,
            details: result.error_lines(cap),
        }
    }

    pub fn from_ack(ack: &ImportAck) -> Self {
        Self::success(ack.message.clone())
    }
}

/// Pending notices of a view, drained by the UI.
#[derive(Debug, Default, Clone)]
pub struct Notices {
    queue: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        self.queue.push(notice);
    }

    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.queue)
    }

    pub fn last(&self) -> Option<&Notice> {
        self.queue.last()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
