use crate::shared::usecase::{execute, UseCase};
use crate::{error::SubtrackError, shared::auth::protect_internal_route};
use actix_web::{web, HttpRequest, HttpResponse};
use subtrack_api_structs::get_upcoming_renewals::*;
use subtrack_domain::{local_date, ReminderWindow, Subscription, ID};
use subtrack_infra::SubtrackContext;

pub async fn get_upcoming_renewals_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let usecase = GetUpcomingRenewalsUseCase {
        user_id: path_params.user_id,
        window: ReminderWindow::new(
            query_params
                .within_days
                .unwrap_or(ReminderWindow::DEFAULT_DAYS),
        ),
    };

    execute(usecase, &ctx)
        .await
        .map(|subscriptions| HttpResponse::Ok().json(APIResponse::new(subscriptions)))
        .map_err(SubtrackError::from)
}

/// The `Subscription`s of a `User` that a sweep with the same window would
/// look at, soonest renewal first
#[derive(Debug)]
pub struct GetUpcomingRenewalsUseCase {
    pub user_id: ID,
    pub window: ReminderWindow,
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(ID),
}

impl From<UseCaseError> for SubtrackError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(id) => {
                Self::NotFound(format!("A user with id: {}, was not found.", id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUpcomingRenewalsUseCase {
    type Response = Vec<Subscription>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetUpcomingRenewals";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id));
        }

        let today = local_date(&ctx.sys.now(), &ctx.config.reminders.timezone);
        let last_date = self.window.last_date(today);

        let mut upcoming = ctx
            .repos
            .subscriptions
            .find_by_user(&self.user_id)
            .await
            .into_iter()
            .filter(|s| s.is_reminder_candidate(today, last_date))
            .collect::<Vec<_>>();
        upcoming.sort_by_key(|s| s.next_billing_date);

        Ok(upcoming)
    }
}
