use std::sync::Arc;
use subtrack_api::Application;
use subtrack_infra::{InMemoryMailer, SubtrackContext};
use subtrack_sdk::SubtrackSDK;

pub const INTERNAL_API_KEY: &str = "test-internal-api-key";

pub struct TestApp {
    pub ctx: SubtrackContext,
    pub mailer: Arc<InMemoryMailer>,
    pub address: String,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, SubtrackSDK) {
    let mut ctx = SubtrackContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.internal_api_key = Some(INTERNAL_API_KEY.into());
    ctx.config.reminders.scheduler_enabled = false;
    let mailer = Arc::new(InMemoryMailer::new());
    ctx.mailer = mailer.clone();

    let application = Application::new(ctx.clone())
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let sdk = SubtrackSDK::new(address.clone(), INTERNAL_API_KEY);
    let app = TestApp {
        ctx,
        mailer,
        address,
    };
    (app, sdk)
}
