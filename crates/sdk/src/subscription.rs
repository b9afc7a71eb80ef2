use crate::{APIResponse, BaseClient};
use reqwest::StatusCode;
use std::sync::Arc;
use subtrack_api_structs::*;
use subtrack_domain::ID;

#[derive(Clone)]
pub struct SubscriptionClient {
    base: Arc<BaseClient>,
}

pub struct CreateSubscriptionInput {
    pub user_id: ID,
    pub body: create_subscription::RequestBody,
}

pub struct UpdateSubscriptionInput {
    pub user_id: ID,
    pub subscription_id: ID,
    pub body: update_subscription::RequestBody,
}

impl SubscriptionClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateSubscriptionInput,
    ) -> APIResponse<create_subscription::APIResponse> {
        self.base
            .post(
                Some(input.body),
                format!("user/{}/subscriptions", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get(
        &self,
        user_id: ID,
        subscription_id: ID,
    ) -> APIResponse<get_subscription::APIResponse> {
        self.base
            .get(
                format!("user/{}/subscriptions/{}", user_id, subscription_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_by_user(&self, user_id: ID) -> APIResponse<get_subscriptions::APIResponse> {
        self.base
            .get(format!("user/{}/subscriptions", user_id), StatusCode::OK)
            .await
    }

    pub async fn update(
        &self,
        input: UpdateSubscriptionInput,
    ) -> APIResponse<update_subscription::APIResponse> {
        self.base
            .put(
                input.body,
                format!(
                    "user/{}/subscriptions/{}",
                    input.user_id, input.subscription_id
                ),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(
        &self,
        user_id: ID,
        subscription_id: ID,
    ) -> APIResponse<delete_subscription::APIResponse> {
        self.base
            .delete(
                format!("user/{}/subscriptions/{}", user_id, subscription_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn summary(&self, user_id: ID) -> APIResponse<get_subscriptions_summary::APIResponse> {
        self.base
            .get(
                format!("user/{}/subscriptions/summary", user_id),
                StatusCode::OK,
            )
            .await
    }

    /// `None` lets the server use its default window
    pub async fn upcoming(
        &self,
        user_id: ID,
        within_days: Option<i64>,
    ) -> APIResponse<get_upcoming_renewals::APIResponse> {
        let mut path = format!("user/{}/subscriptions/upcoming", user_id);
        if let Some(days) = within_days {
            path = format!("{}?within_days={}", path, days);
        }
        self.base.get(path, StatusCode::OK).await
    }
}
