use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use subtrack_domain::{BillingCycleTotals, Subscription, SubscriptionSummary, ID};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDTO {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub billing_cycle: String,
    pub category: Option<String>,
    pub next_billing_date: Option<NaiveDate>,
    pub is_active: bool,
    pub reminder_enabled: bool,
    pub reminder_days_before: u32,
    pub last_reminder_sent_at: Option<DateTime<Utc>>,
}

impl SubscriptionDTO {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            id: subscription.id,
            user_id: subscription.user_id,
            name: subscription.name,
            price: subscription.price,
            currency: subscription.currency,
            billing_cycle: subscription.billing_cycle,
            category: subscription.category,
            next_billing_date: subscription.next_billing_date,
            is_active: subscription.is_active,
            reminder_enabled: subscription.reminder_enabled,
            reminder_days_before: subscription.reminder_days_before,
            last_reminder_sent_at: subscription.last_reminder_sent_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct BillingCycleTotalsDTO {
    pub monthly: f64,
    pub yearly: f64,
    pub weekly: f64,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummaryDTO {
    pub total_active: usize,
    pub total_monthly_cost: f64,
    pub by_billing_cycle: BillingCycleTotalsDTO,
}

impl SubscriptionSummaryDTO {
    pub fn new(summary: SubscriptionSummary) -> Self {
        let BillingCycleTotals {
            monthly,
            yearly,
            weekly,
        } = summary.by_billing_cycle;
        Self {
            total_active: summary.total_active,
            total_monthly_cost: summary.total_monthly_cost,
            by_billing_cycle: BillingCycleTotalsDTO {
                monthly,
                yearly,
                weekly,
            },
        }
    }
}
