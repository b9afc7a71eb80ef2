mod inmemory;
mod postgres;

use chrono::{DateTime, NaiveDate, Utc};
pub use inmemory::InMemorySubscriptionRepo;
pub use postgres::PostgresSubscriptionRepo;
use subtrack_domain::{ReminderCandidate, Subscription, ID};

#[async_trait::async_trait]
pub trait ISubscriptionRepo: Send + Sync {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()>;
    /// Fails if the `Subscription` does not exist
    async fn save(&self, subscription: &Subscription) -> anyhow::Result<()>;
    async fn find(&self, subscription_id: &ID) -> Option<Subscription>;
    /// Every `Subscription` of the `User`, oldest first
    async fn find_by_user(&self, user_id: &ID) -> Vec<Subscription>;
    async fn delete(&self, subscription_id: &ID) -> Option<Subscription>;
    /// Active `Subscription`s with reminders enabled that renew between `from`
    /// and `to` (both inclusive), together with the email of their owner
    async fn find_reminder_candidates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<ReminderCandidate>>;
    /// Durably stores that a reminder was delivered at `sent_at`.
    /// Fails if the `Subscription` no longer exists.
    async fn mark_reminder_sent(
        &self,
        subscription_id: &ID,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use crate::{setup_context, SubtrackContext};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use subtrack_domain::{ReminderCandidate, Subscription, User, ID};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("Valid date")
    }

    async fn insert_user(ctx: &SubtrackContext) -> User {
        let user = User::new(format!("jane+{}@example.com", ID::new()));
        ctx.repos.users.insert(&user).await.expect("To insert user");
        user
    }

    async fn insert(ctx: &SubtrackContext, subscription: &Subscription) {
        ctx.repos
            .subscriptions
            .insert(subscription)
            .await
            .expect("To insert subscription");
    }

    #[tokio::test]
    async fn create_save_and_delete() {
        let ctx = setup_context().await;
        let user = insert_user(&ctx).await;
        let mut subscription = Subscription::new(user.id, "Netflix", 15.99);
        subscription.category = Some("Streaming".into());
        subscription.next_billing_date = Some(date(2024, 3, 4));

        insert(&ctx, &subscription).await;
        assert_eq!(
            ctx.repos.subscriptions.find(&subscription.id).await,
            Some(subscription.clone())
        );

        subscription.price = 17.99;
        subscription.reminder_days_before = 7;
        assert!(ctx.repos.subscriptions.save(&subscription).await.is_ok());
        assert_eq!(
            ctx.repos.subscriptions.find(&subscription.id).await,
            Some(subscription.clone())
        );

        assert_eq!(
            ctx.repos.subscriptions.delete(&subscription.id).await,
            Some(subscription.clone())
        );
        assert!(ctx.repos.subscriptions.find(&subscription.id).await.is_none());
        // Saving a deleted subscription fails
        assert!(ctx.repos.subscriptions.save(&subscription).await.is_err());
    }

    #[tokio::test]
    async fn finds_subscriptions_of_user() {
        let ctx = setup_context().await;
        let user = insert_user(&ctx).await;
        let other_user = insert_user(&ctx).await;
        let first = Subscription::new(user.id, "Netflix", 15.99);
        let second = Subscription::new(user.id, "Spotify", 9.99);
        let other = Subscription::new(other_user.id, "Gym", 30.0);
        insert(&ctx, &first).await;
        insert(&ctx, &second).await;
        insert(&ctx, &other).await;

        let ids = ctx
            .repos
            .subscriptions
            .find_by_user(&user.id)
            .await
            .into_iter()
            .map(|s| s.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(ctx.repos.subscriptions.find_by_user(&ID::new()).await.is_empty());
    }

    #[tokio::test]
    async fn finds_reminder_candidates_with_owner_email() {
        let ctx = setup_context().await;
        let user = insert_user(&ctx).await;
        let from = date(2024, 3, 1);
        let to = date(2024, 3, 8);

        let mut first_day = Subscription::new(user.id, "Netflix", 15.99);
        first_day.next_billing_date = Some(from);
        let mut last_day = Subscription::new(user.id, "HBO", 11.99);
        last_day.next_billing_date = Some(to);
        let mut too_early = Subscription::new(user.id, "Hulu", 8.99);
        too_early.next_billing_date = Some(date(2024, 2, 29));
        let mut too_late = Subscription::new(user.id, "Spotify", 9.99);
        too_late.next_billing_date = Some(date(2024, 3, 9));
        let mut disabled = Subscription::new(user.id, "Disney+", 7.99);
        disabled.next_billing_date = Some(date(2024, 3, 4));
        disabled.reminder_enabled = false;
        let mut inactive = Subscription::new(user.id, "Audible", 14.95);
        inactive.next_billing_date = Some(date(2024, 3, 4));
        inactive.is_active = false;
        let undated = Subscription::new(user.id, "iCloud", 0.99);

        for s in [
            &first_day, &last_day, &too_early, &too_late, &disabled, &inactive, &undated,
        ] {
            insert(&ctx, s).await;
        }

        // The store may be shared with other tests
        let mut candidates = ctx
            .repos
            .subscriptions
            .find_reminder_candidates(from, to)
            .await
            .expect("To find candidates")
            .into_iter()
            .filter(|c| c.subscription.user_id == user.id)
            .collect::<Vec<ReminderCandidate>>();
        candidates.sort_by_key(|c| c.subscription.next_billing_date);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].subscription, first_day);
        assert_eq!(candidates[1].subscription, last_day);
        for candidate in &candidates {
            assert_eq!(candidate.owner_email.as_deref(), Some(user.email.as_str()));
        }
    }

    #[tokio::test]
    async fn candidates_without_owner_have_no_email() {
        // Postgres enforces owners, so only the inmemory store can hold orphans
        let ctx = SubtrackContext::create_inmemory();
        let mut orphan = Subscription::new(ID::new(), "Gym", 30.0);
        orphan.next_billing_date = Some(date(2024, 3, 2));
        insert(&ctx, &orphan).await;

        let candidates = ctx
            .repos
            .subscriptions
            .find_reminder_candidates(date(2024, 3, 1), date(2024, 3, 8))
            .await
            .expect("To find candidates");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].owner_email, None);
    }

    #[tokio::test]
    async fn marks_reminders_as_sent() {
        let ctx = setup_context().await;
        let user = insert_user(&ctx).await;
        let subscription = Subscription::new(user.id, "Netflix", 15.99);
        insert(&ctx, &subscription).await;

        // Inside the hour that repeats when Oslo leaves summer time
        let sent_at = Utc.with_ymd_and_hms(2024, 10, 27, 1, 30, 0).unwrap();
        for sent_at in [sent_at - Duration::hours(1), sent_at] {
            assert!(ctx
                .repos
                .subscriptions
                .mark_reminder_sent(&subscription.id, sent_at)
                .await
                .is_ok());
            assert_eq!(
                ctx.repos
                    .subscriptions
                    .find(&subscription.id)
                    .await
                    .and_then(|s| s.last_reminder_sent_at),
                Some(sent_at)
            );
        }

        assert!(ctx
            .repos
            .subscriptions
            .mark_reminder_sent(&ID::new(), sent_at)
            .await
            .is_err());
    }
}
