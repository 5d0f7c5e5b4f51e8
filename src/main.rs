use std::sync::Arc;

use clap::Parser;
use poem::Server;
use poem::listener::TcpListener;

use payment_reports::api::build_app;
use payment_reports::app_data::AppData;
use payment_reports::cli::{Cli, Commands, execute_command};
use payment_reports::config::{LoggingConfig, Settings, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let _log_guard = init_logging(&LoggingConfig::from_env())?;

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    let app_data = AppData::init(settings);
    app_data.migrate().await?;

    match cli.command {
        None | Some(Commands::Serve) => {}
        Some(command) => return execute_command(command, &app_data).await,
    }

    app_data.seed_admin().await?;

    let address = app_data.settings.server_address();
    let app = build_app(Arc::new(app_data));

    tracing::info!("Starting server on http://{}", address);

    Server::new(TcpListener::bind(address)).run(app).await?;

    Ok(())
}
