use dotenvy::dotenv;
mod application;
mod domain;
mod infrastructure;
mod utils;
use crate::infrastructure::discord_bot::bot::AppContext;
use crate::infrastructure::discord_bot::session::run_supervised;
use crate::infrastructure::http::liveness;
use crate::infrastructure::settings::Settings;
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() {
    utils::setup_logging();
    dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            return;
        }
    };

    liveness::spawn(settings.port);

    let app = Arc::new(AppContext::build(&settings));
    run_supervised(&settings, app).await;
}
