// CLI module for administrative operations run against the database file

pub mod create_user;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Provincial payment reports service
#[derive(Parser)]
#[command(name = "payment-reports")]
#[command(about = "Provincial payment reports web service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the web server (default)
    Serve,

    /// Create a user account
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        /// Name recorded as the submitter of this user's reports
        #[arg(long)]
        display_name: String,

        /// admin, editor or viewer
        #[arg(long, default_value = "viewer")]
        role: String,
    },
}

/// Execute a non-server CLI command
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(command: Commands, app_data: &AppData) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => Ok(()),
        Commands::CreateUser { username, password, display_name, role } => {
            create_user::create_user(app_data, &username, &password, &display_name, &role).await?;
            Ok(())
        }
    }
}
