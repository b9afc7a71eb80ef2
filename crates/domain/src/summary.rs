use crate::subscription::{BillingCycle, Subscription};

/// Sum of prices per billing cycle, not normalized
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BillingCycleTotals {
    pub monthly: f64,
    pub yearly: f64,
    pub weekly: f64,
}

/// Spending overview over the active `Subscription`s of a `User`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubscriptionSummary {
    pub total_active: usize,
    /// Every active `Subscription` converted to its monthly cost
    pub total_monthly_cost: f64,
    pub by_billing_cycle: BillingCycleTotals,
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

impl SubscriptionSummary {
    /// Inactive `Subscription`s are ignored. Amounts are rounded to cents.
    pub fn new<'a>(subscriptions: impl IntoIterator<Item = &'a Subscription>) -> Self {
        let mut summary = Self::default();
        for subscription in subscriptions.into_iter().filter(|s| s.is_active) {
            summary.total_active += 1;
            summary.total_monthly_cost += subscription.monthly_cost();
            let totals = &mut summary.by_billing_cycle;
            match BillingCycle::parse(&subscription.billing_cycle) {
                BillingCycle::Monthly => totals.monthly += subscription.price,
                BillingCycle::Yearly => totals.yearly += subscription.price,
                BillingCycle::Weekly => totals.weekly += subscription.price,
            }
        }

        summary.total_monthly_cost = round_cents(summary.total_monthly_cost);
        let totals = &mut summary.by_billing_cycle;
        totals.monthly = round_cents(totals.monthly);
        totals.yearly = round_cents(totals.yearly);
        totals.weekly = round_cents(totals.weekly);
        summary
    }
}
