mod date;
mod reminder;
mod shared;
mod subscription;
mod summary;
mod sweep;
mod user;

pub use date::{assume_timezone, local_date};
pub use reminder::{
    evaluate_reminder, reminder_suppression_window, ReminderCandidate, ReminderDecision,
    ReminderMessage, ReminderWindow, SkipReason,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use subscription::{BillingCycle, Subscription};
pub use summary::{BillingCycleTotals, SubscriptionSummary};
pub use sweep::{DispatchError, ReminderOutcome, SweepStats};
pub use user::{User, DEFAULT_REMINDER_DAYS_BEFORE};

pub use chrono_tz::Tz;
