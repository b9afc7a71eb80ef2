use super::find_user_subscription;
use crate::shared::usecase::{execute, UseCase};
use crate::{error::SubtrackError, shared::auth::protect_internal_route};
use actix_web::{web, HttpRequest, HttpResponse};
use subtrack_api_structs::delete_subscription::*;
use subtrack_domain::{Subscription, ID};
use subtrack_infra::SubtrackContext;

pub async fn delete_subscription_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let usecase = DeleteSubscriptionUseCase {
        user_id: path_params.user_id,
        subscription_id: path_params.subscription_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| HttpResponse::Ok().json(APIResponse::new(subscription)))
        .map_err(SubtrackError::from)
}

#[derive(Debug)]
pub struct DeleteSubscriptionUseCase {
    pub user_id: ID,
    pub subscription_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for SubtrackError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => Self::NotFound(format!(
                "The subscription with id: {}, was not found.",
                id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteSubscriptionUseCase {
    type Response = Subscription;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteSubscription";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        match find_user_subscription(&self.user_id, &self.subscription_id, ctx).await {
            Some(subscription) => ctx
                .repos
                .subscriptions
                .delete(&subscription.id)
                .await
                .ok_or(UseCaseError::NotFound(self.subscription_id)),
            None => Err(UseCaseError::NotFound(self.subscription_id)),
        }
    }
}
