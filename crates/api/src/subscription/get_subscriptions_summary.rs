use crate::shared::usecase::{execute, UseCase};
use crate::{error::SubtrackError, shared::auth::protect_internal_route};
use actix_web::{web, HttpRequest, HttpResponse};
use subtrack_api_structs::get_subscriptions_summary::*;
use subtrack_domain::{SubscriptionSummary, ID};
use subtrack_infra::SubtrackContext;

pub async fn get_subscriptions_summary_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let usecase = GetSubscriptionsSummaryUseCase {
        user_id: path_params.user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|summary| HttpResponse::Ok().json(APIResponse::new(summary)))
        .map_err(SubtrackError::from)
}

/// Spending overview over the active `Subscription`s of a `User`
#[derive(Debug)]
pub struct GetSubscriptionsSummaryUseCase {
    pub user_id: ID,
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
impl UseCase for GetSubscriptionsSummaryUseCase {
    type Response = SubscriptionSummary;
    type Error = UseCaseError;

    const NAME: &'static str = "GetSubscriptionsSummary";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id));
        }
        let subscriptions = ctx.repos.subscriptions.find_by_user(&self.user_id).await;
        Ok(SubscriptionSummary::new(&subscriptions))
    }
}
