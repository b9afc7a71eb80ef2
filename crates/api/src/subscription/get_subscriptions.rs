use crate::shared::usecase::{execute, UseCase};
use crate::{error::SubtrackError, shared::auth::protect_internal_route};
use actix_web::{web, HttpRequest, HttpResponse};
use subtrack_api_structs::get_subscriptions::*;
use subtrack_domain::{Subscription, ID};
use subtrack_infra::SubtrackContext;

pub async fn get_subscriptions_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let usecase = GetSubscriptionsUseCase {
        user_id: path_params.user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|subscriptions| HttpResponse::Ok().json(APIResponse::new(subscriptions)))
        .map_err(SubtrackError::from)
}

#[derive(Debug)]
pub struct GetSubscriptionsUseCase {
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
impl UseCase for GetSubscriptionsUseCase {
    type Response = Vec<Subscription>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetSubscriptions";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id));
        }
        Ok(ctx.repos.subscriptions.find_by_user(&self.user_id).await)
    }
}
