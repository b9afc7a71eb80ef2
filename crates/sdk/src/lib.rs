mod base;
mod reminder;
mod status;
mod subscription;
mod user;

use reminder::ReminderClient;
use status::StatusClient;
use std::sync::Arc;
use subscription::SubscriptionClient;
use user::UserClient;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
pub use subscription::{CreateSubscriptionInput, UpdateSubscriptionInput};
pub use subtrack_api_structs::{create_subscription, update_subscription};
pub use subtrack_domain::ID;
pub use user::CreateUserInput;

/// SubTrack Server SDK
///
/// The SDK contains methods for interacting with the SubTrack server API.
#[derive(Clone)]
pub struct SubtrackSDK {
    pub reminders: ReminderClient,
    pub status: StatusClient,
    pub subscriptions: SubscriptionClient,
    pub users: UserClient,
}

impl SubtrackSDK {
    pub fn new<T: Into<String>>(address: String, internal_api_key: T) -> Self {
        let mut base = BaseClient::new(address);
        let internal_api_key = internal_api_key.into();
        if !internal_api_key.is_empty() {
            base.set_internal_api_key(internal_api_key);
        }
        let base = Arc::new(base);
        let reminders = ReminderClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let subscriptions = SubscriptionClient::new(base.clone());
        let users = UserClient::new(base);

        Self {
            reminders,
            status,
            subscriptions,
            users,
        }
    }
}
