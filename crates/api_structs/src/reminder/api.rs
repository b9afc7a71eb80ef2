use serde::{Deserialize, Serialize};
use subtrack_domain::SweepStats;

pub mod run_reminders {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct QueryParams {
        #[serde(default)]
        pub within_days: Option<i64>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub success: bool,
        pub reminders_sent: usize,
        pub reminders_skipped: usize,
        pub errors: usize,
        pub total_processed: usize,
        pub message: String,
    }

    impl APIResponse {
        pub fn new(stats: SweepStats) -> Self {
            Self {
                success: stats.success(),
                reminders_sent: stats.reminders_sent,
                reminders_skipped: stats.reminders_skipped,
                errors: stats.errors,
                total_processed: stats.total_processed,
                message: stats.summary(),
            }
        }
    }
}
