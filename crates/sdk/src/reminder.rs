use crate::{APIResponse, BaseClient};
use reqwest::StatusCode;
use std::sync::Arc;
use subtrack_api_structs::*;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    /// Triggers a reminder sweep. `None` lets the server use its default window.
    pub async fn run(&self, within_days: Option<i64>) -> APIResponse<run_reminders::APIResponse> {
        let path = match within_days {
            Some(days) => format!("internal/run-reminders?within_days={}", days),
            None => "internal/run-reminders".into(),
        };
        self.base
            .post::<_, ()>(None, path, StatusCode::OK)
            .await
    }
}
