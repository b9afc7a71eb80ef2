use crate::subscription::Subscription;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::fmt::Display;

const PRODUCT_NAME: &str = "SubTrack";

/// A `Subscription` that was sent a reminder less than this long ago is never
/// reminded again, even if the renewal date would otherwise qualify.
pub fn reminder_suppression_window() -> Duration {
    Duration::hours(24)
}

/// How many days ahead a reminder sweep looks for upcoming renewals.
///
/// Values outside of `[MIN_DAYS, MAX_DAYS]` are clamped instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderWindow(i64);

impl ReminderWindow {
    pub const MIN_DAYS: i64 = 1;
    pub const MAX_DAYS: i64 = 60;
    pub const DEFAULT_DAYS: i64 = 7;

    pub fn new(within_days: i64) -> Self {
        Self(within_days.clamp(Self::MIN_DAYS, Self::MAX_DAYS))
    }

    pub fn days(&self) -> i64 {
        self.0
    }

    /// Last renewal date (inclusive) covered by a sweep running on `today`
    pub fn last_date(&self, today: NaiveDate) -> NaiveDate {
        today + Duration::days(self.0)
    }
}

impl Default for ReminderWindow {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

/// A `Subscription` selected by the sweep together with the address of its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderCandidate {
    pub subscription: Subscription,
    /// `None` if the owning `User` could not be resolved
    pub owner_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl ReminderMessage {
    pub fn render(to: &str, subscription: &Subscription, renewal_date: NaiveDate) -> Self {
        let advance_notice = match subscription.reminder_days_before {
            0 => "on the day of the renewal".to_string(),
            1 => "1 day before the renewal".to_string(),
            days => format!("{} days before the renewal", days),
        };

        let body = format!(
            "Hello,\n\
             \n\
             Your subscription {name} renews soon.\n\
             \n\
             Subscription details:\n\
             - Name: {name}\n\
             - Price: {currency} {price:.2}\n\
             - Billing cycle: {cycle}\n\
             - Next billing date: {date}\n\
             \n\
             You asked {product} to remind you {notice}.\n\
             \n\
             You can manage your subscriptions from your {product} dashboard.\n\
             \n\
             Best regards,\n\
             The {product} team\n",
            name = subscription.name,
            currency = subscription.currency,
            price = subscription.price,
            cycle = subscription.billing_cycle,
            date = renewal_date.format("%B %d, %Y"),
            product = PRODUCT_NAME,
            notice = advance_notice,
        );

        Self {
            to: to.to_string(),
            subject: format!("Upcoming subscription renewal: {}", subscription.name),
            body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Today is not exactly `reminder_days_before` days ahead of the renewal
    NotDue,
    /// A reminder went out within the suppression window
    AlreadySent,
    /// The owner has no usable email address
    MissingEmail,
}

impl SkipReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotDue => "not-due",
            Self::AlreadySent => "already-sent",
            Self::MissingEmail => "missing-email",
        }
    }
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReminderDecision {
    Send(ReminderMessage),
    Skip(SkipReason),
}

/// Decides whether a renewal reminder has to go out for the candidate right now.
///
/// A reminder is due only on the single day where exactly `reminder_days_before`
/// days remain until `next_billing_date`. Even then it is suppressed when the
/// previous reminder is younger than the suppression window. A marker in the
/// future counts as recent.
pub fn evaluate_reminder(
    candidate: &ReminderCandidate,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> ReminderDecision {
    let subscription = &candidate.subscription;
    let renewal_date = match subscription.next_billing_date {
        Some(date) => date,
        None => return ReminderDecision::Skip(SkipReason::NotDue),
    };

    let days_until = (renewal_date - today).num_days();
    if days_until != i64::from(subscription.reminder_days_before) {
        return ReminderDecision::Skip(SkipReason::NotDue);
    }

    if let Some(sent_at) = subscription.last_reminder_sent_at {
        if now.signed_duration_since(sent_at) < reminder_suppression_window() {
            return ReminderDecision::Skip(SkipReason::AlreadySent);
        }
    }

    match candidate.owner_email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => {
            ReminderDecision::Send(ReminderMessage::render(email, subscription, renewal_date))
        }
        _ => ReminderDecision::Skip(SkipReason::MissingEmail),
    }
}
