mod telemetry;

use subtrack_api::Application;
use subtrack_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env file is fine, the environment may be set by other means
    let _ = dotenvy::dotenv();
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("subtrack".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;

    let app = Application::new(context).await?;
    app.start().await
}
