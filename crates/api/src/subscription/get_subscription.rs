use super::find_user_subscription;
use crate::shared::usecase::{execute, UseCase};
use crate::{error::SubtrackError, shared::auth::protect_internal_route};
use actix_web::{web, HttpRequest, HttpResponse};
use subtrack_api_structs::get_subscription::*;
use subtrack_domain::{Subscription, ID};
use subtrack_infra::SubtrackContext;

pub async fn get_subscription_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let usecase = GetSubscriptionUseCase {
        user_id: path_params.user_id,
        subscription_id: path_params.subscription_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| HttpResponse::Ok().json(APIResponse::new(subscription)))
        .map_err(SubtrackError::from)
}

#[derive(Debug)]
pub struct GetSubscriptionUseCase {
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
impl UseCase for GetSubscriptionUseCase {
    type Response = Subscription;
    type Error = UseCaseError;

    const NAME: &'static str = "GetSubscription";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        find_user_subscription(&self.user_id, &self.subscription_id, ctx)
            .await
            .ok_or(UseCaseError::NotFound(self.subscription_id))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[actix_web::test]
    async fn hides_subscriptions_of_other_users() {
        let ctx = SubtrackContext::create_inmemory();
        let owner = ID::new();
        let subscription = Subscription::new(owner, "Netflix", 15.99);
        ctx.repos
            .subscriptions
            .insert(&subscription)
            .await
            .expect("To insert subscription");

        let found = execute(
            GetSubscriptionUseCase {
                user_id: owner,
                subscription_id: subscription.id,
            },
            &ctx,
        )
        .await
        .expect("To find subscription");
        assert_eq!(found, subscription);

        let res = execute(
            GetSubscriptionUseCase {
                user_id: ID::new(),
                subscription_id: subscription.id,
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::NotFound(_))));
    }
}
