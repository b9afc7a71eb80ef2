use super::validate_subscription;
use crate::shared::usecase::{execute, UseCase};
use crate::{error::SubtrackError, shared::auth::protect_internal_route};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use subtrack_api_structs::create_subscription::*;
use subtrack_domain::{Subscription, ID};
use subtrack_infra::SubtrackContext;

pub async fn create_subscription_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateSubscriptionUseCase {
        user_id: path_params.user_id,
        name: body.name,
        price: body.price,
        currency: body.currency,
        billing_cycle: body.billing_cycle,
        category: body.category,
        next_billing_date: body.next_billing_date,
        is_active: body.is_active,
        reminder_enabled: body.reminder_enabled,
        reminder_days_before: body.reminder_days_before,
    };

    execute(usecase, &ctx)
        .await
        .map(|subscription| HttpResponse::Created().json(APIResponse::new(subscription)))
        .map_err(SubtrackError::from)
}

/// Fields left as `None` get the defaults of a new `Subscription`, except
/// `reminder_days_before` which falls back to the setting of the `User`.
#[derive(Debug, Default)]
pub struct CreateSubscriptionUseCase {
    pub user_id: ID,
    pub name: String,
    pub price: f64,
    pub currency: Option<String>,
    pub billing_cycle: Option<String>,
    pub category: Option<String>,
    pub next_billing_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub reminder_enabled: Option<bool>,
    pub reminder_days_before: Option<u32>,
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(ID),
    InvalidSubscription(String),
    StorageError,
}

impl From<UseCaseError> for SubtrackError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(id) => {
                Self::NotFound(format!("A user with id: {}, was not found.", id))
            }
            UseCaseError::InvalidSubscription(msg) => Self::BadClientData(msg),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateSubscriptionUseCase {
    type Response = Subscription;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateSubscription";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        let user = ctx
            .repos
            .users
            .find(&self.user_id)
            .await
            .ok_or(UseCaseError::UserNotFound(self.user_id))?;

        let mut subscription = Subscription::new(user.id, self.name.trim(), self.price);
        if let Some(currency) = self.currency.take() {
            subscription.currency = currency;
        }
        if let Some(billing_cycle) = self.billing_cycle.take() {
            subscription.billing_cycle = billing_cycle;
        }
        subscription.category = self.category.take();
        subscription.next_billing_date = self.next_billing_date;
        if let Some(is_active) = self.is_active {
            subscription.is_active = is_active;
        }
        if let Some(reminder_enabled) = self.reminder_enabled {
            subscription.reminder_enabled = reminder_enabled;
        }
        subscription.reminder_days_before = self
            .reminder_days_before
            .unwrap_or(user.default_reminder_days_before);

        validate_subscription(&subscription).map_err(UseCaseError::InvalidSubscription)?;

        ctx.repos
            .subscriptions
            .insert(&subscription)
            .await
            .map(|_| subscription)
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use subtrack_domain::User;

    async fn setup() -> (SubtrackContext, User) {
        let ctx = SubtrackContext::create_inmemory();
        let mut user = User::new("jane@example.com");
        user.default_reminder_days_before = 5;
        ctx.repos.users.insert(&user).await.expect("To insert user");
        (ctx, user)
    }

    #[actix_web::test]
    async fn uses_reminder_default_of_user() {
        let (ctx, user) = setup().await;
        let usecase = CreateSubscriptionUseCase {
            user_id: user.id,
            name: "Netflix".into(),
            price: 15.99,
            category: Some("Entertainment".into()),
            ..Default::default()
        };

        let subscription = execute(usecase, &ctx).await.expect("To create subscription");
        assert_eq!(subscription.reminder_days_before, 5);
        assert_eq!(subscription.category.as_deref(), Some("Entertainment"));
        assert_eq!(subscription.currency, "USD");
        assert_eq!(subscription.billing_cycle, "monthly");
        assert_eq!(
            ctx.repos.subscriptions.find(&subscription.id).await,
            Some(subscription)
        );
    }

    #[actix_web::test]
    async fn explicit_reminder_lead_time_wins() {
        let (ctx, user) = setup().await;
        let usecase = CreateSubscriptionUseCase {
            user_id: user.id,
            name: "Spotify".into(),
            price: 9.99,
            billing_cycle: Some("yearly".into()),
            reminder_days_before: Some(0),
            reminder_enabled: Some(false),
            ..Default::default()
        };

        let subscription = execute(usecase, &ctx).await.expect("To create subscription");
        assert_eq!(subscription.reminder_days_before, 0);
        assert_eq!(subscription.billing_cycle, "yearly");
        assert!(!subscription.reminder_enabled);
    }

    #[actix_web::test]
    async fn rejects_unknown_user_and_invalid_data() {
        let (ctx, user) = setup().await;

        let res = execute(
            CreateSubscriptionUseCase {
                user_id: ID::new(),
                name: "Netflix".into(),
                price: 15.99,
                ..Default::default()
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::UserNotFound(_))));

        let res = execute(
            CreateSubscriptionUseCase {
                user_id: user.id,
                name: "Netflix".into(),
                price: -1.0,
                ..Default::default()
            },
            &ctx,
        )
        .await;
        assert!(matches!(res, Err(UseCaseError::InvalidSubscription(_))));
        assert!(ctx.repos.subscriptions.find_by_user(&user.id).await.is_empty());
    }
}
