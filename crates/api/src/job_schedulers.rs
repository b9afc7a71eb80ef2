use crate::{reminder::run_reminders::RunRemindersUseCase, shared::usecase::execute};
use actix_web::rt::time::sleep;
use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use std::time::Duration;
use subtrack_domain::{assume_timezone, local_date, Tz};
use subtrack_infra::SubtrackContext;
use tracing::{info, info_span};
use tracing_futures::Instrument;

/// First instant strictly after `instant` at which the wall clock in `tz` shows `run_at`
pub fn get_next_run(instant: DateTime<Utc>, tz: &Tz, run_at: NaiveTime) -> DateTime<Utc> {
    let today = local_date(&instant, tz);
    let next_run = assume_timezone(today.and_time(run_at), tz);
    if next_run > instant {
        return next_run;
    }
    let tomorrow = today + ChronoDuration::days(1);
    assume_timezone(tomorrow.and_time(run_at), tz)
}

/// Time left from `now` until `next_run`, without losing sub-millisecond precision
pub fn get_start_delay(now: DateTime<Utc>, next_run: DateTime<Utc>) -> Duration {
    (next_run - now).to_std().unwrap_or(Duration::ZERO)
}

/// Runs a reminder sweep once a day at the configured local time
pub fn start_send_reminders_job(ctx: SubtrackContext) {
    if !ctx.config.reminders.scheduler_enabled {
        info!("Reminder job scheduler is disabled");
        return;
    }

    let job = async move {
        let tz = ctx.config.reminders.timezone;
        let run_at = ctx.config.reminders.run_at;
        info!(
            "Reminder job scheduler started (daily at {} {})",
            run_at.format("%H:%M"),
            tz
        );

        let mut next_run = get_next_run(ctx.sys.now(), &tz, run_at);
        loop {
            let delay = get_start_delay(ctx.sys.now(), next_run);
            info!(
                "Next reminder run in {:.1} hours",
                delay.as_secs_f64() / 3600.0
            );
            sleep(delay).await;

            send_reminders(&ctx).await;
            // Based on the planned run, a timer firing slightly early must not
            // schedule a second run on the same day
            next_run = get_next_run(next_run, &tz, run_at);
        }
    };
    actix_web::rt::spawn(job.instrument(info_span!("send_reminders_job")));
}

async fn send_reminders(ctx: &SubtrackContext) {
    let usecase = RunRemindersUseCase {
        window: ctx.config.reminders.within,
    };
    // Failures are already logged by `execute`
    if let Ok(stats) = execute(usecase, ctx).await {
        info!("Reminder check completed: {}", stats.summary());
    }
}
