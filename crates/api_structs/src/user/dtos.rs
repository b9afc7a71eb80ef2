use serde::{Deserialize, Serialize};
use subtrack_domain::{User, ID};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: ID,
    pub email: String,
    pub full_name: Option<String>,
    pub default_reminder_days_before: u32,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            default_reminder_days_before: user.default_reminder_days_before,
        }
    }
}
