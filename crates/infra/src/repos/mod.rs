mod shared;
mod subscription;
mod user;

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use subscription::ISubscriptionRepo;
use subscription::{InMemorySubscriptionRepo, PostgresSubscriptionRepo};
use subtrack_domain::Tz;
use tracing::info;
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub subscriptions: Arc<dyn ISubscriptionRepo>,
    pub users: Arc<dyn IUserRepo>,
}

impl Repos {
    /// Connects to postgres and brings the schema up to date.
    ///
    /// Sessions run in `timezone`, so timestamps written without an offset by
    /// other clients are read as wall clock time in the reminder timezone.
    pub async fn create_postgres(
        connection_string: &str,
        timezone: Tz,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    sqlx::query("SELECT set_config('TimeZone', $1, false)")
                        .bind(timezone.name())
                        .execute(conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        info!("DB MIGRATIONS ...");
        sqlx::migrate!().run(&pool).await?;
        info!("DB MIGRATIONS ... [done]");

        Ok(Self {
            subscriptions: Arc::new(PostgresSubscriptionRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        let users = Arc::new(InMemoryUserRepo::new());
        Self {
            subscriptions: Arc::new(InMemorySubscriptionRepo::new(users.clone())),
            users,
        }
    }
}
