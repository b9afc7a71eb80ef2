use crate::shared::usecase::{execute, UseCase};
use crate::{error::SubtrackError, shared::auth::protect_internal_route};
use actix_web::{web, HttpRequest, HttpResponse};
use subtrack_api_structs::create_user::*;
use subtrack_domain::{User, DEFAULT_REMINDER_DAYS_BEFORE};
use subtrack_infra::SubtrackContext;

pub async fn create_user_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateUserUseCase {
        email: body.email,
        full_name: body.full_name,
        default_reminder_days_before: body
            .default_reminder_days_before
            .unwrap_or(DEFAULT_REMINDER_DAYS_BEFORE),
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(SubtrackError::from)
}

#[derive(Debug)]
pub struct CreateUserUseCase {
    pub email: String,
    pub full_name: Option<String>,
    pub default_reminder_days_before: u32,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidEmail(String),
    UserAlreadyExists(String),
    StorageError,
}

impl From<UseCaseError> for SubtrackError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidEmail(email) => {
                Self::BadClientData(format!("Invalid email address: {}", email))
            }
            UseCaseError::UserAlreadyExists(email) => Self::Conflict(format!(
                "A user with the email {} already exists. Emails need to be unique.",
                email
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(UseCaseError::InvalidEmail(self.email.clone()));
        }
        if ctx.repos.users.find_by_email(email).await.is_some() {
            return Err(UseCaseError::UserAlreadyExists(email.to_string()));
        }

        let mut user = User::new(email);
        user.full_name = self.full_name.clone();
        user.default_reminder_days_before = self.default_reminder_days_before;

        ctx.repos
            .users
            .insert(&user)
            .await
            .map(|_| user)
            .map_err(|_| UseCaseError::StorageError)
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn usecase(email: &str) -> CreateUserUseCase {
        CreateUserUseCase {
            email: email.into(),
            full_name: Some("Jane Doe".into()),
            default_reminder_days_before: 5,
        }
    }

    #[actix_web::test]
    async fn creates_user() {
        let ctx = SubtrackContext::create_inmemory();
        let user = execute(usecase(" jane@example.com "), &ctx)
            .await
            .expect("To create user");
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(user.default_reminder_days_before, 5);
        assert_eq!(ctx.repos.users.find(&user.id).await, Some(user));
    }

    #[actix_web::test]
    async fn rejects_taken_email() {
        let ctx = SubtrackContext::create_inmemory();
        assert!(execute(usecase("jane@example.com"), &ctx).await.is_ok());
        let res = execute(usecase("Jane@Example.com"), &ctx).await;
        assert!(matches!(res, Err(UseCaseError::UserAlreadyExists(_))));
    }

    #[actix_web::test]
    async fn rejects_invalid_email() {
        let ctx = SubtrackContext::create_inmemory();
        for email in ["", "jane", "@example.com", "jane@localhost", "ja ne@example.com"] {
            let res = execute(usecase(email), &ctx).await;
            assert!(
                matches!(res, Err(UseCaseError::InvalidEmail(_))),
                "email: {:?}",
                email
            );
        }
    }
}
