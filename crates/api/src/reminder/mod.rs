pub mod run_reminders;

use actix_web::web;
use run_reminders::run_reminders_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/internal/run-reminders",
        web::post().to(run_reminders_controller),
    );
}
