use crate::{
    shared::entity::{Entity, ID},
    user::DEFAULT_REMINDER_DAYS_BEFORE,
};
use chrono::{DateTime, NaiveDate, Utc};

const WEEKS_PER_MONTH: f64 = 4.345;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingCycle {
    Monthly,
    Yearly,
    Weekly,
}

impl BillingCycle {
    /// Case insensitive, falls back to `Monthly`
    pub fn parse(cycle: &str) -> Self {
        match cycle.trim().to_lowercase().as_str() {
            "yearly" => Self::Yearly,
            "weekly" => Self::Weekly,
            _ => Self::Monthly,
        }
    }
}

/// A recurring payment tracked on behalf of a `User`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub price: f64,
    pub currency: String,
    /// Free form, e.g. "monthly", "yearly" or "weekly". Only used for display
    pub billing_cycle: String,
    pub category: Option<String>,
    /// The upcoming renewal. Advancing it after billing is the
    /// responsibility of whoever records the payment.
    pub next_billing_date: Option<NaiveDate>,
    pub is_active: bool,
    pub reminder_enabled: bool,
    pub reminder_days_before: u32,
    /// Set every time a renewal reminder has been delivered. `None` until the
    /// first reminder goes out.
    pub last_reminder_sent_at: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn new(user_id: ID, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: Default::default(),
            user_id,
            name: name.into(),
            price,
            currency: "USD".into(),
            billing_cycle: "monthly".into(),
            category: None,
            next_billing_date: None,
            is_active: true,
            reminder_enabled: true,
            reminder_days_before: DEFAULT_REMINDER_DAYS_BEFORE,
            last_reminder_sent_at: None,
        }
    }

    /// Price normalized to a monthly amount. Unknown billing cycles count as monthly.
    pub fn monthly_cost(&self) -> f64 {
        match BillingCycle::parse(&self.billing_cycle) {
            BillingCycle::Yearly => self.price / 12.0,
            BillingCycle::Weekly => self.price * WEEKS_PER_MONTH,
            BillingCycle::Monthly => self.price,
        }
    }

    /// Whether the sweep for the given date range should look at this `Subscription`
    pub fn is_reminder_candidate(&self, from: NaiveDate, to: NaiveDate) -> bool {
        if !self.is_active || !self.reminder_enabled {
            return false;
        }
        match self.next_billing_date {
            Some(date) => from <= date && date <= to,
            None => false,
        }
    }
}

impl Entity for Subscription {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("Valid date")
    }

    #[test]
    fn applies_defaults() {
        let sub = Subscription::new(ID::new(), "Netflix", 15.99);
        assert_eq!(sub.currency, "USD");
        assert_eq!(sub.billing_cycle, "monthly");
        assert_eq!(sub.reminder_days_before, 3);
        assert!(sub.is_active && sub.reminder_enabled);
        assert!(sub.last_reminder_sent_at.is_none());
    }

    #[test]
    fn normalizes_cost_to_a_month() {
        let mut sub = Subscription::new(ID::new(), "Cloud", 120.0);
        assert_eq!(sub.monthly_cost(), 120.0);
        sub.billing_cycle = "Yearly".into();
        assert_eq!(sub.monthly_cost(), 10.0);
        sub.billing_cycle = "weekly".into();
        assert!((sub.monthly_cost() - 521.4).abs() < 1e-9);
        sub.billing_cycle = "fortnightly".into();
        assert_eq!(sub.monthly_cost(), 120.0);
    }

    #[test]
    fn candidate_filter() {
        let from = date(2024, 3, 1);
        let to = date(2024, 3, 8);
        let mut sub = Subscription::new(ID::new(), "Spotify", 9.99);
        assert!(!sub.is_reminder_candidate(from, to));

        sub.next_billing_date = Some(from);
        assert!(sub.is_reminder_candidate(from, to));
        sub.next_billing_date = Some(to);
        assert!(sub.is_reminder_candidate(from, to));
        sub.next_billing_date = Some(date(2024, 2, 29));
        assert!(!sub.is_reminder_candidate(from, to));
        sub.next_billing_date = Some(date(2024, 3, 9));
        assert!(!sub.is_reminder_candidate(from, to));

        sub.next_billing_date = Some(date(2024, 3, 4));
        sub.reminder_enabled = false;
        assert!(!sub.is_reminder_candidate(from, to));
        sub.reminder_enabled = true;
        sub.is_active = false;
        assert!(!sub.is_reminder_candidate(from, to));
    }
}
