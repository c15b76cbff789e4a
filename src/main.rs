use clap::Parser;
use integration_gateway::cli::commands::{Cli, Commands};
use integration_gateway::config::Config;
use integration_gateway::domain::values::statement_period::StatementPeriod;
use integration_gateway::http;
use integration_gateway::IntegrationGateway;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "integration_gateway=info,tower_http=debug";

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = Config::from_env();

    if let Err(e) = run_command(config, cli.command).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(mut config: Config, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr = config.server.bind_addr();
            let gateway = Arc::new(IntegrationGateway::new(&config)?);
            http::serve(gateway, &addr).await?;
        }
        Commands::Search { query, asset_type } => {
            let gateway = IntegrationGateway::new(&config)?;
            let items = gateway
                .instruments()
                .search(&query, asset_type.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Commands::Resolve { symbol } => {
            let gateway = IntegrationGateway::new(&config)?;
            let resolved = gateway.instruments().resolve(&symbol).await?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Commands::Revenue {
            symbol,
            period,
            limit,
        } => {
            let period: StatementPeriod = period.parse()?;
            let gateway = IntegrationGateway::new(&config)?;
            let series = gateway
                .market_data()
                .revenue_series(&symbol.to_uppercase(), period, limit)
                .await?;
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        Commands::Routes => {
            for (method, path) in http::ROUTE_TABLE {
                println!("{method:<6} {path}");
            }
        }
    }
    Ok(())
}
