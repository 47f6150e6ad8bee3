//! `zyb`: command-line front end for the ZhiYouBao client.
//!
//! Credentials come from `--config <FILE>` (TOML) or, without one, from the
//! `ZYB_*` environment variables.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use zhiyoubao_sdk::config::load_config;
use zhiyoubao_sdk::observability::init_logging;
use zhiyoubao_sdk::{ApiResponse, Client, ClientConfig, QueryOrderStatusRequest};

#[derive(Parser)]
#[command(name = "zyb")]
#[command(about = "ZhiYouBao ticketing API client", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the status of an order
    QueryOrder {
        order_code: String,

        /// Print the parsed response tree as JSON
        #[arg(long)]
        raw: bool,
    },
    /// Print the signed envelope for an order query without sending it
    Envelope { order_code: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::from_env()?,
    };
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    init_logging(&config.observability);

    tracing::debug!(
        corp_code = %config.credentials.corp_code,
        max_retries = config.retry.max_retries,
        "Configuration loaded"
    );

    let client = Client::new(config)?;

    match cli.command {
        Commands::QueryOrder { order_code, raw } => {
            let request = QueryOrderStatusRequest::new(order_code);
            if raw {
                let tree = client.send(&request).await?;
                println!("{}", serde_json::to_string_pretty(&tree)?);
                return Ok(());
            }

            let response = client.call(&request).await?;
            if !response.is_success() {
                eprintln!(
                    "Error: service returned code {}: {}",
                    response.code(),
                    response.description()
                );
                std::process::exit(1);
            }

            println!("Order:       {}", response.order_code().unwrap_or_default());
            println!("Contact:     {}", response.link_name().unwrap_or_default());
            println!("Mobile:      {}", response.link_mobile().unwrap_or_default());
            println!("Pay status:  {}", response.pay_status().unwrap_or_default());
            for ticket in response.ticket_orders() {
                println!(
                    "  - {} x{} (checked {}, returned {})",
                    ticket.goods_name.as_deref().unwrap_or("?"),
                    ticket.quantity.as_deref().unwrap_or("0"),
                    ticket.already_check_num.as_deref().unwrap_or("0"),
                    ticket.return_num.as_deref().unwrap_or("0"),
                );
            }
        }
        Commands::Envelope { order_code } => {
            let prepared = client.prepare(&QueryOrderStatusRequest::new(order_code))?;
            println!("{} {}", prepared.method, prepared.url);
            println!("xmlMsg: {}", prepared.envelope.xml);
            println!("sign:   {}", prepared.envelope.signature);
        }
    }

    Ok(())
}
