use crate::dtos::{SubscriptionDTO, SubscriptionSummaryDTO};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use subtrack_domain::{Subscription, SubscriptionSummary, ID};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub subscription: SubscriptionDTO,
}

impl SubscriptionResponse {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription: SubscriptionDTO::new(subscription),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionsResponse {
    pub subscriptions: Vec<SubscriptionDTO>,
}

impl SubscriptionsResponse {
    pub fn new(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: subscriptions.into_iter().map(SubscriptionDTO::new).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserPathParams {
    pub user_id: ID,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SubscriptionPathParams {
    pub user_id: ID,
    pub subscription_id: ID,
}

pub mod create_subscription {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        pub price: f64,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub billing_cycle: Option<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub next_billing_date: Option<NaiveDate>,
        #[serde(default)]
        pub is_active: Option<bool>,
        #[serde(default)]
        pub reminder_enabled: Option<bool>,
        /// Defaults to the setting of the user
        #[serde(default)]
        pub reminder_days_before: Option<u32>,
    }

    pub type PathParams = UserPathParams;
    pub type APIResponse = SubscriptionResponse;
}

pub mod get_subscription {
    use super::*;

    pub type PathParams = SubscriptionPathParams;
    pub type APIResponse = SubscriptionResponse;
}

pub mod get_subscriptions {
    use super::*;

    pub type PathParams = UserPathParams;
    pub type APIResponse = SubscriptionsResponse;
}

pub mod update_subscription {
    use super::*;

    /// Only the given fields are changed
    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub price: Option<f64>,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub billing_cycle: Option<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub next_billing_date: Option<NaiveDate>,
        #[serde(default)]
        pub is_active: Option<bool>,
        #[serde(default)]
        pub reminder_enabled: Option<bool>,
        #[serde(default)]
        pub reminder_days_before: Option<u32>,
    }

    pub type PathParams = SubscriptionPathParams;
    pub type APIResponse = SubscriptionResponse;
}

pub mod delete_subscription {
    use super::*;

    pub type PathParams = SubscriptionPathParams;
    pub type APIResponse = SubscriptionResponse;
}

pub mod get_subscriptions_summary {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub summary: SubscriptionSummaryDTO,
    }

    impl APIResponse {
        pub fn new(summary: SubscriptionSummary) -> Self {
            Self {
                summary: SubscriptionSummaryDTO::new(summary),
            }
        }
    }

    pub type PathParams = UserPathParams;
}

pub mod get_upcoming_renewals {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    pub struct QueryParams {
        #[serde(default)]
        pub within_days: Option<i64>,
    }

    pub type PathParams = UserPathParams;
    pub type APIResponse = SubscriptionsResponse;
}
