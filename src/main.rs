use std::net::{IpAddr, SocketAddr};

use chrono::Local;
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use fincalc::core::{compute, product_keys};
use fincalc::logging::{LogFormat, init_logger};

#[derive(Debug, Parser)]
#[command(name = "fincalc", version, about = "Financial calculators over HTTP")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Enable debug logging for fincalc.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        #[arg(long, env = "FINCALC_HOST", default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, env = "FINCALC_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Run one calculator and print its JSON result.
    Calc {
        product: String,
        /// Parameters as `name=value` pairs.
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// List calculator keys.
    List,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_format, cli.verbose);

    match cli.command {
        Command::Serve { host, port } => {
            if let Err(e) = fincalc::api::run_http_server(SocketAddr::new(host, port)).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Calc { product, params } => {
            let params = params
                .into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect::<Map<_, _>>();
            let rendered = compute(&product, &params, Local::now().date_naive())
                .and_then(|result| Ok(serde_json::to_string_pretty(&result)?));
            match rendered {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Command::List => {
            for key in product_keys() {
                println!("{key}");
            }
        }
    }
}
