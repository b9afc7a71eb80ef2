use crate::shared::usecase::{execute, UseCase};
use crate::{error::SubtrackError, shared::auth::protect_internal_route};
use actix_web::{web, HttpRequest, HttpResponse};
use subtrack_api_structs::delete_user::*;
use subtrack_domain::{User, ID};
use subtrack_infra::SubtrackContext;
use tracing::error;

pub async fn delete_user_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let usecase = DeleteUserUseCase {
        user_id: path_params.user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(SubtrackError::from)
}

/// Deletes the `User` together with all of its `Subscription`s
#[derive(Debug)]
pub struct DeleteUserUseCase {
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
impl UseCase for DeleteUserUseCase {
    type Response = User;
    type Error = UseCaseError;

    const NAME: &'static str = "DeleteUser";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id));
        }

        for subscription in ctx.repos.subscriptions.find_by_user(&self.user_id).await {
            if ctx
                .repos
                .subscriptions
                .delete(&subscription.id)
                .await
                .is_none()
            {
                error!(
                    "Unable to delete subscription {} of user {}",
                    subscription.id, self.user_id
                );
            }
        }

        ctx.repos
            .users
            .delete(&self.user_id)
            .await
            .ok_or_else(|| UseCaseError::UserNotFound(self.user_id))
    }
}
