mod bot;
mod commands;
mod config;
mod error;
mod handlers;
mod logging;
mod platform;
mod replies;

use std::path::Path;
use std::process::ExitCode;

use teloxide::Bot;
use tracing::{error, info};

use crate::bot::Supervisor;
use crate::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    // .env first, so RUST_LOG from it reaches the subscriber
    let env_file = config::load_env_file(Path::new(config::ENV_FILE));

    // Initialize logging
    if let Err(e) = logging::init(Path::new(logging::LOG_FILE)) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }
    if let Some(path) = env_file {
        info!("Loaded environment from {}", path.display());
    }

    // Load configuration; no network call happens without a token
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Configuration loaded: {:?}", config);

    let bot = Bot::new(config.token.expose());
    let supervisor = Supervisor::new(bot, config);

    match supervisor.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Critical error while running the bot: {}", e);
            ExitCode::FAILURE
        }
    }
}
