use super::{find_user_subscription, validate_subscription};
use crate::shared::usecase::{execute, UseCase};
use crate::{error::SubtrackError, shared::auth::protect_internal_route};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use subtrack_api_structs::update_subscription::*;
use subtrack_domain::{Subscription, ID};
use subtrack_infra::SubtrackContext;

pub async fn update_subscription_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<SubtrackContext>,
) -> Result<HttpResponse, SubtrackError> {
    protect_internal_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = UpdateSubscriptionUseCase {
        user_id: path_params.user_id,
        subscription_id: path_params.subscription_id,
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
        .map(|subscription| HttpResponse::Ok().json(APIResponse::new(subscription)))
        .map_err(SubtrackError::from)
}

/// Only the fields that are `Some` are changed
#[derive(Debug, Default)]
pub struct UpdateSubscriptionUseCase {
    pub user_id: ID,
    pub subscription_id: ID,
    pub name: Option<String>,
    pub price: Option<f64>,
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
    NotFound(ID),
    InvalidSubscription(String),
    StorageError,
}

impl From<UseCaseError> for SubtrackError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => Self::NotFound(format!(
                "The subscription with id: {}, was not found.",
                id
            )),
            UseCaseError::InvalidSubscription(msg) => Self::BadClientData(msg),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateSubscriptionUseCase {
    type Response = Subscription;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateSubscription";

    async fn execute(&mut self, ctx: &SubtrackContext) -> Result<Self::Response, Self::Error> {
        let mut subscription = find_user_subscription(&self.user_id, &self.subscription_id, ctx)
            .await
            .ok_or(UseCaseError::NotFound(self.subscription_id))?;

        if let Some(name) = self.name.take() {
            subscription.name = name.trim().to_string();
        }
        if let Some(price) = self.price {
            subscription.price = price;
        }
        if let Some(currency) = self.currency.take() {
            subscription.currency = currency;
        }
        if let Some(billing_cycle) = self.billing_cycle.take() {
            subscription.billing_cycle = billing_cycle;
        }
        if let Some(category) = self.category.take() {
            subscription.category = Some(category);
        }
        if let Some(next_billing_date) = self.next_billing_date {
            subscription.next_billing_date = Some(next_billing_date);
        }
        if let Some(is_active) = self.is_active {
            subscription.is_active = is_active;
        }
        if let Some(reminder_enabled) = self.reminder_enabled {
            subscription.reminder_enabled = reminder_enabled;
        }
        if let Some(reminder_days_before) = self.reminder_days_before {
            subscription.reminder_days_before = reminder_days_before;
        }

        validate_subscription(&subscription).map_err(UseCaseError::InvalidSubscription)?;

        ctx.repos
            .subscriptions
            .save(&subscription)
            .await
            .map(|_| subscription)
            .map_err(|_| UseCaseError::StorageError)
    }
}
