use super::ISubscriptionRepo;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use subtrack_domain::{ReminderCandidate, Subscription, ID};
use tracing::error;

pub struct PostgresSubscriptionRepo {
    pool: PgPool,
}

impl PostgresSubscriptionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SUBSCRIPTION_COLUMNS: &str = r#"
    s.subscription_uid, s.user_uid, s.name, s.price::float8 AS price, s.currency,
    s.billing_cycle, s.category, s.next_billing_date, s.is_active, s.reminder_enabled,
    s.reminder_days_before, s.last_reminder_sent_at
"#;

#[derive(Debug, FromRow)]
struct SubscriptionRaw {
    subscription_uid: Uuid,
    user_uid: Uuid,
    name: String,
    price: f64,
    currency: String,
    billing_cycle: String,
    category: Option<String>,
    next_billing_date: Option<NaiveDate>,
    is_active: bool,
    reminder_enabled: bool,
    reminder_days_before: i32,
    last_reminder_sent_at: Option<DateTime<Utc>>,
}

impl From<SubscriptionRaw> for Subscription {
    fn from(raw: SubscriptionRaw) -> Self {
        Self {
            id: raw.subscription_uid.into(),
            user_id: raw.user_uid.into(),
            name: raw.name,
            price: raw.price,
            currency: raw.currency,
            billing_cycle: raw.billing_cycle,
            category: raw.category,
            next_billing_date: raw.next_billing_date,
            is_active: raw.is_active,
            reminder_enabled: raw.reminder_enabled,
            // Never negative because of the CHECK constraint
            reminder_days_before: u32::try_from(raw.reminder_days_before).unwrap_or_default(),
            last_reminder_sent_at: raw.last_reminder_sent_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ReminderCandidateRaw {
    #[sqlx(flatten)]
    subscription: SubscriptionRaw,
    owner_email: Option<String>,
}

#[async_trait::async_trait]
impl ISubscriptionRepo for PostgresSubscriptionRepo {
    async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions
            (subscription_uid, user_uid, name, price, currency, billing_cycle, category,
             next_billing_date, is_active, reminder_enabled, reminder_days_before, last_reminder_sent_at)
            VALUES($1, $2, $3, $4::numeric, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(subscription.id.inner_ref())
        .bind(subscription.user_id.inner_ref())
        .bind(&subscription.name)
        .bind(subscription.price)
        .bind(&subscription.currency)
        .bind(&subscription.billing_cycle)
        .bind(&subscription.category)
        .bind(subscription.next_billing_date)
        .bind(subscription.is_active)
        .bind(subscription.reminder_enabled)
        .bind(i32::try_from(subscription.reminder_days_before)?)
        .bind(subscription.last_reminder_sent_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, subscription: &Subscription) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE subscriptions
            SET user_uid = $2,
            name = $3,
            price = $4::numeric,
            currency = $5,
            billing_cycle = $6,
            category = $7,
            next_billing_date = $8,
            is_active = $9,
            reminder_enabled = $10,
            reminder_days_before = $11,
            last_reminder_sent_at = $12,
            updated = now()
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription.id.inner_ref())
        .bind(subscription.user_id.inner_ref())
        .bind(&subscription.name)
        .bind(subscription.price)
        .bind(&subscription.currency)
        .bind(&subscription.billing_cycle)
        .bind(&subscription.category)
        .bind(subscription.next_billing_date)
        .bind(subscription.is_active)
        .bind(subscription.reminder_enabled)
        .bind(i32::try_from(subscription.reminder_days_before)?)
        .bind(subscription.last_reminder_sent_at)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(anyhow::Error::msg(format!(
                "Subscription {} not found",
                subscription.id
            )));
        }
        Ok(())
    }

    async fn find(&self, subscription_id: &ID) -> Option<Subscription> {
        let query = format!(
            "SELECT {} FROM subscriptions AS s WHERE s.subscription_uid = $1",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, SubscriptionRaw>(&query)
            .bind(subscription_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                error!("Unable to find subscription {}: {:?}", subscription_id, e);
                None
            })
            .map(|raw| raw.into())
    }

    async fn find_by_user(&self, user_id: &ID) -> Vec<Subscription> {
        let query = format!(
            "SELECT {} FROM subscriptions AS s WHERE s.user_uid = $1 ORDER BY s.created",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, SubscriptionRaw>(&query)
            .bind(user_id.inner_ref())
            .fetch_all(&self.pool)
            .await
            .unwrap_or_else(|e| {
                error!("Unable to find subscriptions of user {}: {:?}", user_id, e);
                Vec::new()
            })
            .into_iter()
            .map(|raw| raw.into())
            .collect()
    }

    async fn delete(&self, subscription_id: &ID) -> Option<Subscription> {
        let query = format!(
            "DELETE FROM subscriptions AS s WHERE s.subscription_uid = $1 RETURNING {}",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, SubscriptionRaw>(&query)
            .bind(subscription_id.inner_ref())
            .fetch_optional(&self.pool)
            .await
            .unwrap_or_else(|e| {
                error!("Unable to delete subscription {}: {:?}", subscription_id, e);
                None
            })
            .map(|raw| raw.into())
    }

    async fn find_reminder_candidates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<ReminderCandidate>> {
        let query = format!(
            r#"
            SELECT {}, u.email AS owner_email FROM subscriptions AS s
            LEFT JOIN users AS u ON u.user_uid = s.user_uid
            WHERE s.is_active AND s.reminder_enabled
            AND s.next_billing_date IS NOT NULL
            AND s.next_billing_date BETWEEN $1 AND $2
            "#,
            SUBSCRIPTION_COLUMNS
        );
        let candidates = sqlx::query_as::<_, ReminderCandidateRaw>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|raw| ReminderCandidate {
                subscription: raw.subscription.into(),
                owner_email: raw.owner_email,
            })
            .collect();

        Ok(candidates)
    }

    async fn mark_reminder_sent(
        &self,
        subscription_id: &ID,
        sent_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE subscriptions
            SET last_reminder_sent_at = $2
            WHERE subscription_uid = $1
            "#,
        )
        .bind(subscription_id.inner_ref())
        .bind(sent_at)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(anyhow::Error::msg(format!(
                "Subscription {} not found",
                subscription_id
            )));
        }
        Ok(())
    }
}
