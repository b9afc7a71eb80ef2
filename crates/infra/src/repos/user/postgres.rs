use super::IUserRepo;
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use subtrack_domain::{User, ID};
use tracing::error;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    email: String,
    full_name: Option<String>,
    default_reminder_days_before: i32,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        Self {
            id: raw.user_uid.into(),
            email: raw.email,
            full_name: raw.full_name,
            // Never negative because of the CHECK constraint
            default_reminder_days_before: u32::try_from(raw.default_reminder_days_before)
                .unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users(user_uid, email, full_name, default_reminder_days_before)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(i32::try_from(user.default_reminder_days_before)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT user_uid, email, full_name, default_reminder_days_before FROM users
            WHERE user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to find user {}: {:?}", user_id, e);
            None
        })
        .map(|user| user.into())
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT user_uid, email, full_name, default_reminder_days_before FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to find user by email: {:?}", e);
            None
        })
        .map(|user| user.into())
    }

    async fn delete(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            DELETE FROM users AS u
            WHERE u.user_uid = $1
            RETURNING user_uid, email, full_name, default_reminder_days_before
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            error!("Unable to delete user {}: {:?}", user_id, e);
            None
        })
        .map(|user| user.into())
    }
}
