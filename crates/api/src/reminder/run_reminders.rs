use crate::{
    error::SubtrackError,
    shared::{
        auth::protect_internal_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use subtrack_api_structs::run_reminders::*;
use subtrack_domain::{
    evaluate_reminder, local_date, DispatchError, ReminderCandidate, ReminderDecision,
    ReminderOutcome, ReminderWindow, SkipReason, SweepStats,
};
use subtrack_infra::{OutgoingEmail, SubtrackContext};
use tracing::{debug, error, info, warn};

pub async fn run_reminders_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let usecase = RunRemindersUseCase::new(
        query_params
            .within_days
            .unwrap_or(ReminderWindow::DEFAULT_DAYS),
    );
    info!(
        "Starting reminder processing (within_days = {})",
        usecase.window.days()
    );

    execute(usecase, &ctx)
        .await
        .map(|stats| {
            info!("Reminder processing completed: {}", stats.summary());
            HttpResponse::Ok().json(APIResponse::new(stats))
        })
        .map_err(SubtrackError::from)
}

/// Sends every renewal reminder that is due right now.
///
/// Every candidate is handled on its own: a failure to send or to record a
/// reminder is counted and the sweep moves on. Only failing to load the
/// candidates fails the whole sweep. Holds no state between runs, so it can
/// be triggered from anywhere.
#[derive(Debug)]
pub struct RunRemindersUseCase {
    pub window: ReminderWindow,
}

impl RunRemindersUseCase {
    pub fn new(within_days: i64) -> Self {
        Self {
            window: ReminderWindow::new(within_days),
        }
    }
}

#[derive(Debug)]
pub enum UseCaseError {
    StoreUnavailable(String),
}

impl From<UseCaseError> for SubtrackError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StoreUnavailable(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunRemindersUseCase {
    type Response = SweepStats;

    type Error = UseCaseError;

    const NAME: &'static str = "RunReminders";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let today = local_date(&now, &ctx.config.reminders.timezone);

        let candidates = ctx
            .repos
            .subscriptions
            .find_reminder_candidates(today, self.window.last_date(today))
            .await
            .map_err(|e| UseCaseError::StoreUnavailable(e.to_string()))?;

        let mut stats = SweepStats::default();
        for candidate in &candidates {
            let outcome = process_candidate(candidate, today, now, ctx).await;
            stats.record(&outcome);
        }

        Ok(stats)
    }
}

async fn process_candidate(
    candidate: &ReminderCandidate,
    today: NaiveDate,
    now: DateTime<Utc>,
    ctx: &SubtrackContext,
) -> ReminderOutcome {
    let subscription = &candidate.subscription;

    let message = match evaluate_reminder(candidate, today, now) {
        ReminderDecision::Send(message) => message,
        ReminderDecision::Skip(reason) => {
            if reason == SkipReason::MissingEmail {
                warn!(
                    "Skipping reminder for subscription {}: owner {} has no email",
                    subscription.id, subscription.user_id
                );
            } else {
                debug!(
                    "Skipping reminder for subscription {}: {}",
                    subscription.id, reason
                );
            }
            return ReminderOutcome::Skipped(reason);
        }
    };

    let email = OutgoingEmail {
        to: message.to,
        subject: message.subject,
        body: message.body,
    };
    if let Err(e) = ctx.mailer.send(&email).await {
        error!(
            "Error sending reminder for subscription {} to {}: {}",
            subscription.id, email.to, e
        );
        return ReminderOutcome::Failed(DispatchError::SendFailed(e.to_string()));
    }

    if let Err(e) = ctx
        .repos
        .subscriptions
        .mark_reminder_sent(&subscription.id, ctx.sys.now())
        .await
    {
        error!(
            "Reminder for subscription {} was sent to {} but could not be recorded: {:?}",
            subscription.id, email.to, e
        );
        return ReminderOutcome::Failed(DispatchError::CommitFailed(e.to_string()));
    }

    info!(
        "Reminder sent for subscription '{}' (ID: {}) to {}",
        subscription.name, subscription.id, email.to
    );
    ReminderOutcome::Sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;
    use subtrack_domain::{Subscription, User, ID};
    use subtrack_infra::{ISubscriptionRepo, ISys, InMemoryMailer};

    struct StaticTimeSys(DateTime<Utc>);
    impl ISys for StaticTimeSys {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn now() -> DateTime<Utc> {
        // Fri Mar 01 2024 09:00:00 UTC
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        now().date_naive()
    }

    struct TestContext {
        ctx: SubtrackContext,
        mailer: Arc<InMemoryMailer>,
    }

    fn setup() -> TestContext {
        let mut ctx = SubtrackContext::create_inmemory();
        let mailer = Arc::new(InMemoryMailer::new());
        ctx.mailer = mailer.clone();
        ctx.sys = Arc::new(StaticTimeSys(now()));
        TestContext { ctx, mailer }
    }

    async fn insert_user(ctx: &SubtrackContext, email: &str) -> User {
        let user = User::new(email);
        ctx.repos.users.insert(&user).await.expect("To insert user");
        user
    }

    async fn insert_subscription(
        ctx: &SubtrackContext,
        user: &User,
        days_until: i64,
        days_before: u32,
    ) -> Subscription {
        let mut subscription = Subscription::new(user.id, "Netflix", 15.99);
        subscription.next_billing_date = Some(today() + Duration::days(days_until));
        subscription.reminder_days_before = days_before;
        ctx.repos
            .subscriptions
            .insert(&subscription)
            .await
            .expect("To insert subscription");
        subscription
    }

    async fn marker(ctx: &SubtrackContext, subscription: &Subscription) -> Option<DateTime<Utc>> {
        ctx.repos
            .subscriptions
            .find(&subscription.id)
            .await
            .and_then(|s| s.last_reminder_sent_at)
    }

    async fn run(ctx: &SubtrackContext, within_days: i64) -> SweepStats {
        execute(RunRemindersUseCase::new(within_days), ctx)
            .await
            .expect("Sweep to succeed")
    }

    #[actix_web::test]
    async fn sends_due_reminder_and_records_it() {
        let TestContext { ctx, mailer } = setup();
        let user = insert_user(&ctx, "jane@example.com").await;
        let subscription = insert_subscription(&ctx, &user, 3, 3).await;

        let stats = run(&ctx, 7).await;
        assert_eq!(
            stats,
            SweepStats {
                reminders_sent: 1,
                reminders_skipped: 0,
                errors: 0,
                total_processed: 1,
            }
        );
        assert_eq!(marker(&ctx, &subscription).await, Some(now()));

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "jane@example.com");
        assert_eq!(sent[0].subject, "Upcoming subscription renewal: Netflix");
    }

    #[actix_web::test]
    async fn skips_recently_reminded_subscription() {
        let TestContext { ctx, mailer } = setup();
        let user = insert_user(&ctx, "jane@example.com").await;
        let mut subscription = insert_subscription(&ctx, &user, 3, 3).await;
        let two_hours_ago = now() - Duration::hours(2);
        subscription.last_reminder_sent_at = Some(two_hours_ago);
        ctx.repos
            .subscriptions
            .save(&subscription)
            .await
            .expect("To save subscription");

        let stats = run(&ctx, 7).await;
        assert_eq!(
            stats,
            SweepStats {
                reminders_sent: 0,
                reminders_skipped: 1,
                errors: 0,
                total_processed: 1,
            }
        );
        assert_eq!(marker(&ctx, &subscription).await, Some(two_hours_ago));
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn isolates_failed_sends() {
        let TestContext { ctx, mailer } = setup();
        let failing_user = insert_user(&ctx, "broken@example.com").await;
        let user = insert_user(&ctx, "jane@example.com").await;
        let failing = insert_subscription(&ctx, &failing_user, 3, 3).await;
        let working = insert_subscription(&ctx, &user, 3, 3).await;
        mailer.fail_for("broken@example.com");

        let stats = run(&ctx, 7).await;
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.reminders_sent, 1);
        assert_eq!(stats.total_processed, 2);
        assert!(!stats.success());

        assert_eq!(marker(&ctx, &failing).await, None);
        assert_eq!(marker(&ctx, &working).await, Some(now()));
    }

    #[actix_web::test]
    async fn rerun_does_not_send_twice() {
        let TestContext { mut ctx, mailer } = setup();
        let user = insert_user(&ctx, "jane@example.com").await;
        insert_subscription(&ctx, &user, 3, 3).await;
        insert_subscription(&ctx, &user, 7, 7).await;
        insert_subscription(&ctx, &user, 5, 3).await;

        let first = run(&ctx, 7).await;
        assert_eq!(first.reminders_sent, 2);
        assert_eq!(first.reminders_skipped, 1);

        ctx.sys = Arc::new(StaticTimeSys(now() + Duration::minutes(30)));
        let second = run(&ctx, 7).await;
        assert_eq!(second.reminders_sent, 0);
        assert_eq!(second.reminders_skipped, 3);
        assert_eq!(second.errors, 0);

        assert_eq!(mailer.sent().len(), 2);
    }

    #[actix_web::test]
    async fn missing_owner_email_is_skipped_not_failed() {
        let TestContext { ctx, mailer } = setup();
        let orphan = User::new("ghost@example.com");
        insert_subscription(&ctx, &orphan, 3, 3).await;

        let stats = run(&ctx, 7).await;
        assert_eq!(stats.reminders_skipped, 1);
        assert_eq!(stats.errors, 0);
        assert!(mailer.sent().is_empty());
    }

    #[actix_web::test]
    async fn clamps_the_lookahead_window() {
        let TestContext { ctx, mailer } = setup();
        let user = insert_user(&ctx, "jane@example.com").await;
        insert_subscription(&ctx, &user, 1, 1).await;

        // 0 behaves like 1
        let stats = run(&ctx, 0).await;
        assert_eq!(stats.reminders_sent, 1);
        assert_eq!(stats.total_processed, 1);

        let TestContext { ctx, .. } = setup();
        let user = insert_user(&ctx, "jane@example.com").await;
        insert_subscription(&ctx, &user, 60, 60).await;
        insert_subscription(&ctx, &user, 61, 61).await;

        // 1000 behaves like 60
        let stats = run(&ctx, 1000).await;
        assert_eq!(stats.reminders_sent, 1);
        assert_eq!(stats.total_processed, 1);

        assert_eq!(mailer.sent().len(), 1);
    }

    #[actix_web::test]
    async fn decides_today_in_the_reminder_timezone() {
        let TestContext { mut ctx, mailer } = setup();
        // 23:30 in UTC is already the next day in Oslo
        ctx.sys = Arc::new(StaticTimeSys(
            Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap(),
        ));
        let user = insert_user(&ctx, "jane@example.com").await;
        let mut subscription = Subscription::new(user.id, "Netflix", 15.99);
        subscription.next_billing_date = NaiveDate::from_ymd_opt(2024, 3, 5);
        subscription.reminder_days_before = 3;
        ctx.repos
            .subscriptions
            .insert(&subscription)
            .await
            .expect("To insert subscription");

        let stats = run(&ctx, 7).await;
        assert_eq!(stats.reminders_skipped, 1);

        ctx.config.reminders.timezone = chrono_tz::Europe::Oslo;
        let stats = run(&ctx, 7).await;
        assert_eq!(stats.reminders_sent, 1);
        assert_eq!(mailer.sent().len(), 1);
    }

    /// Delegates to the inmemory repo but can be told to fail
    struct FlakySubscriptionRepo {
        inner: Arc<dyn ISubscriptionRepo>,
        fail_fetch: bool,
        fail_commit: bool,
    }

    #[async_trait::async_trait]
    impl ISubscriptionRepo for FlakySubscriptionRepo {
        async fn insert(&self, subscription: &Subscription) -> anyhow::Result<()> {
            self.inner.insert(subscription).await
        }

        async fn save(&self, subscription: &Subscription) -> anyhow::Result<()> {
            self.inner.save(subscription).await
        }

        async fn find(&self, subscription_id: &ID) -> Option<Subscription> {
            self.inner.find(subscription_id).await
        }

        async fn delete(&self, subscription_id: &ID) -> Option<Subscription> {
            self.inner.delete(subscription_id).await
        }

        async fn find_by_user(&self, user_id: &ID) -> Vec<Subscription> {
            self.inner.find_by_user(user_id).await
        }

        async fn find_reminder_candidates(
            &self,
            from: NaiveDate,
            to: NaiveDate,
        ) -> anyhow::Result<Vec<ReminderCandidate>> {
            if self.fail_fetch {
                return Err(anyhow::Error::msg("connection refused"));
            }
            self.inner.find_reminder_candidates(from, to).await
        }

        async fn mark_reminder_sent(
            &self,
            subscription_id: &ID,
            sent_at: DateTime<Utc>,
        ) -> anyhow::Result<()> {
            if self.fail_commit {
                return Err(anyhow::Error::msg("connection reset"));
            }
            self.inner.mark_reminder_sent(subscription_id, sent_at).await
        }
    }

    fn make_flaky(ctx: &mut SubtrackContext, fail_fetch: bool, fail_commit: bool) {
        ctx.repos.subscriptions = Arc::new(FlakySubscriptionRepo {
            inner: ctx.repos.subscriptions.clone(),
            fail_fetch,
            fail_commit,
        });
    }

    #[actix_web::test]
    async fn failed_commit_counts_as_error() {
        let TestContext { mut ctx, mailer } = setup();
        let user = insert_user(&ctx, "jane@example.com").await;
        let subscription = insert_subscription(&ctx, &user, 3, 3).await;
        make_flaky(&mut ctx, false, true);

        let stats = run(&ctx, 7).await;
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.reminders_sent, 0);
        assert_eq!(stats.total_processed, 1);
        // The email did go out, only recording it failed
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(marker(&ctx, &subscription).await, None);
    }

    #[actix_web::test]
    async fn unavailable_store_fails_the_sweep() {
        let TestContext { mut ctx, mailer } = setup();
        let user = insert_user(&ctx, "jane@example.com").await;
        insert_subscription(&ctx, &user, 3, 3).await;
        make_flaky(&mut ctx, true, false);

        let res = execute(RunRemindersUseCase::new(7), &ctx).await;
        assert!(matches!(res, Err(UseCaseError::StoreUnavailable(_))));
        assert!(mailer.sent().is_empty());
    }

    #[test]
    fn clamps_when_created() {
        assert_eq!(RunRemindersUseCase::new(0).window.days(), 1);
        assert_eq!(RunRemindersUseCase::new(1000).window.days(), 60);
        assert_eq!(RunRemindersUseCase::new(7).window.days(), 7);
    }
}
