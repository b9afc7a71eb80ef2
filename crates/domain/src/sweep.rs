use crate::reminder::SkipReason;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why dispatching a due reminder did not complete
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The email never left. The marker was not touched so a later sweep retries.
    #[error("Unable to send reminder email: {0}")]
    SendFailed(String),
    /// The email went out but the marker could not be stored. The next sweep
    /// may send it again.
    #[error("Reminder was sent but could not be recorded: {0}")]
    CommitFailed(String),
}

/// Result of processing a single candidate in a sweep
#[derive(Debug, Clone, PartialEq)]
pub enum ReminderOutcome {
    Sent,
    Skipped(SkipReason),
    Failed(DispatchError),
}

/// Aggregated counters of one reminder sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepStats {
    pub reminders_sent: usize,
    pub reminders_skipped: usize,
    pub errors: usize,
    pub total_processed: usize,
}

impl SweepStats {
    pub fn record(&mut self, outcome: &ReminderOutcome) {
        match outcome {
            ReminderOutcome::Sent => self.reminders_sent += 1,
            ReminderOutcome::Skipped(_) => self.reminders_skipped += 1,
            ReminderOutcome::Failed(_) => self.errors += 1,
        }
        self.total_processed += 1;
    }

    pub fn success(&self) -> bool {
        self.errors == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Processed {} subscriptions. Sent {} reminders, skipped {}, encountered {} errors.",
            self.total_processed, self.reminders_sent, self.reminders_skipped, self.errors
        )
    }
}
