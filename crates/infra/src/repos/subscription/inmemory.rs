use super::ISubscriptionRepo;
use crate::repos::{shared::inmemory_repo::*, user::InMemoryUserRepo};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use subtrack_domain::{ReminderCandidate, Subscription, ID};

pub struct InMemorySubscriptionRepo {
    subscriptions: std::sync::Mutex<Vec<Subscription>>,
    users: Arc<InMemoryUserRepo>,
}

impl InMemorySubscriptionRepo {
    pub fn new(users: Arc<InMemoryUserRepo>) -> Self {
        Self {
            subscriptions: std::sync::Mutex::new(Vec::new()),
            users,
        }
    }
}

#[async_trait::async_trait]
impl ISubscriptionRepo for InMemorySubscriptionRepo {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()> {
        insert(subscription, &self.subscriptions);
        Ok(())
    }

    async fn save(&self, subscription: &Subscription) -> anyhow::Result<()> {
        if save(subscription, &self.subscriptions) {
            Ok(())
        } else {
            Err(anyhow::Error::msg(format!(
                "Subscription {} not found",
                subscription.id
            )))
        }
    }

    async fn find(&self, subscription_id: &ID) -> Option<Subscription> {
        find(subscription_id, &self.subscriptions)
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Subscription> {
        find_by(&self.subscriptions, |s| &s.user_id == user_id)
    }

    async fn delete(&self, subscription_id: &ID) -> Option<Subscription> {
        delete(subscription_id, &self.subscriptions)
    }

    async fn find_reminder_candidates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<ReminderCandidate>> {
        let candidates = find_by(&self.subscriptions, |s| s.is_reminder_candidate(from, to))
            .into_iter()
            .map(|subscription| ReminderCandidate {
                owner_email: self
                    .users
                    .find_sync(&subscription.user_id)
                    .map(|user| user.email),
                subscription,
            })
            .collect();
        Ok(candidates)
    }

    async fn mark_reminder_sent(
        &self,
        subscription_id: &ID,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let found = update(subscription_id, &self.subscriptions, |s| {
            s.last_reminder_sent_at = Some(sent_at)
        });
        if found {
            Ok(())
        } else {
            Err(anyhow::Error::msg(format!(
                "Subscription {} not found",
                subscription_id
            )))
        }
    }
}
