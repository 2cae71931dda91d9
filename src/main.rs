use clap::Parser;
use tracing::{error, info};
use weather_report_service::commands::{Commands, handle_command};
use weather_report_service::{Config, Server};

#[derive(Parser, Debug)]
#[command(name = "weather-report-service")]
#[command(about = "Aggregates upstream weather observations into persisted reports")]
struct Cli {
    #[arg(short, long, help = "Path to configuration file")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from_file(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.level))
        .init();

    if let Some(command) = cli.command {
        if let Err(e) = handle_command(command, &config).await {
            error!("Command failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    info!("Starting Weather Report Service");

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to initialize server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_report_service::commands::migrate::MigrateAction;

    #[test]
    fn test_no_subcommand_serves() {
        let cli = Cli::try_parse_from(["weather-report-service"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_migrate_down_steps() {
        let cli = Cli::try_parse_from([
            "weather-report-service",
            "--config",
            "prod.yaml",
            "migrate",
            "down",
            "--steps",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("prod.yaml"));
        assert_eq!(
            cli.command,
            Some(Commands::Migrate {
                action: MigrateAction::Down { steps: 2 }
            })
        );
    }

    #[test]
    fn test_unknown_migrate_action_is_rejected() {
        assert!(Cli::try_parse_from(["weather-report-service", "migrate", "sideways"]).is_err());
    }
}
