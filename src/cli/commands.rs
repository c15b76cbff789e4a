use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "integration-gateway",
    about = "REST gateway over project-management, document, mail and market-data providers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Bind address (defaults to HOST)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (defaults to PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Rank instruments matching a query
    Search {
        query: String,
        /// STOCK, ETF, CRYPTO or ALL
        #[arg(long)]
        asset_type: Option<String>,
    },
    /// Resolve a symbol from its live quote
    Resolve { symbol: String },
    /// Normalised revenue history from income statements
    Revenue {
        symbol: String,
        /// annual or quarter
        #[arg(long, default_value = "annual")]
        period: String,
        /// Keep only the most recent N rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the REST route table
    Routes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Commands {
        let argv = std::iter::once("integration-gateway").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_parse_revenue_defaults() {
        match parse(&["revenue", "aapl"]) {
            Commands::Revenue {
                symbol,
                period,
                limit,
            } => {
                assert_eq!(symbol, "aapl");
                assert_eq!(period, "annual");
                assert_eq!(limit, None);
            }
            _ => panic!("expected revenue"),
        }
    }

    #[test]
    fn test_parse_revenue_zero_limit() {
        match parse(&["revenue", "aapl", "--limit", "0"]) {
            Commands::Revenue { limit, .. } => assert_eq!(limit, Some(0)),
            _ => panic!("expected revenue"),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        match parse(&["serve", "--port", "8080"]) {
            Commands::Serve { host, port } => {
                assert_eq!(host, None);
                assert_eq!(port, Some(8080));
            }
            _ => panic!("expected serve"),
        }
    }
}
