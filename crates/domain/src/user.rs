use crate::shared::entity::{Entity, ID};

pub const DEFAULT_REMINDER_DAYS_BEFORE: u32 = 3;

/// A `User` owns `Subscription`s and receives their renewal reminders
/// at `email`.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub full_name: Option<String>,
    /// Used for new `Subscription`s when the client does not specify
    /// how many days in advance it wants to be reminded
    pub default_reminder_days_before: u32,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Default::default(),
            email: email.into(),
            full_name: None,
            default_reminder_days_before: DEFAULT_REMINDER_DAYS_BEFORE,
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
