mod create_subscription;
mod delete_subscription;
mod get_subscription;
mod get_subscriptions;
mod get_subscriptions_summary;
mod get_upcoming_renewals;
mod update_subscription;

use actix_web::web;
use create_subscription::create_subscription_controller;
use delete_subscription::delete_subscription_controller;
use get_subscription::get_subscription_controller;
use get_subscriptions::get_subscriptions_controller;
use get_subscriptions_summary::get_subscriptions_summary_controller;
use get_upcoming_renewals::get_upcoming_renewals_controller;
use subtrack_domain::{Subscription, ID};
use subtrack_infra::SubtrackContext;
use update_subscription::update_subscription_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/user/{user_id}/subscriptions",
        web::get().to(get_subscriptions_controller),
    );
    cfg.route(
        "/user/{user_id}/subscriptions",
        web::post().to(create_subscription_controller),
    );
    // Before the `{subscription_id}` routes so they are not taken as ids
    cfg.route(
        "/user/{user_id}/subscriptions/summary",
        web::get().to(get_subscriptions_summary_controller),
    );
    cfg.route(
        "/user/{user_id}/subscriptions/upcoming",
        web::get().to(get_upcoming_renewals_controller),
    );
    cfg.route(
        "/user/{user_id}/subscriptions/{subscription_id}",
        web::get().to(get_subscription_controller),
    );
    cfg.route(
        "/user/{user_id}/subscriptions/{subscription_id}",
        web::put().to(update_subscription_controller),
    );
    cfg.route(
        "/user/{user_id}/subscriptions/{subscription_id}",
        web::delete().to(delete_subscription_controller),
    );
}

/// Finds the `Subscription` only if it belongs to the given `User`
async fn find_user_subscription(
    user_id: &ID,
    subscription_id: &ID,
    ctx: &SubtrackContext,
) -> Option<Subscription> {
    ctx.repos
        .subscriptions
        .find(subscription_id)
        .await
        .filter(|s| &s.user_id == user_id)
}

/// Returns a description of the first invalid field
fn validate_subscription(subscription: &Subscription) -> Result<(), String> {
    if subscription.name.trim().is_empty() {
        return Err("Subscription name can not be empty".into());
    }
    if !subscription.price.is_finite() || subscription.price < 0.0 {
        return Err(format!("Invalid price: {}", subscription.price));
    }
    if subscription.currency.trim().is_empty() {
        return Err("Currency can not be empty".into());
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validates_subscription() {
        let sub = Subscription::new(ID::new(), "Netflix", 15.99);
        assert!(validate_subscription(&sub).is_ok());

        let mut free = sub.clone();
        free.price = 0.0;
        assert!(validate_subscription(&free).is_ok());

        let mut invalid = sub.clone();
        invalid.name = "  ".into();
        assert!(validate_subscription(&invalid).is_err());

        for price in [-1.0, f64::NAN, f64::INFINITY] {
            let mut invalid = sub.clone();
            invalid.price = price;
            assert!(validate_subscription(&invalid).is_err(), "price: {}", price);
        }

        let mut invalid = sub;
        invalid.currency = "".into();
        assert!(validate_subscription(&invalid).is_err());
    }
}
