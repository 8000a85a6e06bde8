use clap::{Args, Parser, Subcommand};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

/// Operator cli for the orders service
#[derive(Parser, Debug)]
#[command(name = "orders-service")]
#[command(about = "client cli used by operators to inspect orders served by the server", version, long_about = None
)]
struct Cli {
    #[arg(long, global = true, default_value = DEFAULT_HOST, help = "Base url of the orders service")]
    host: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// order related ops
    #[command(arg_required_else_help = true)]
    Orders(OrdersArgs),
}

#[derive(Debug, Args)]
struct OrdersArgs {
    #[command(subcommand)]
    command: OrdersCmds,
}

#[derive(Debug, Subcommand)]
enum OrdersCmds {
    /// print every order as json
    List {
        #[arg(long, help = "Pretty print the json output.")]
        pretty: bool,
    },
}

const DEFAULT_HOST: &str = "http://localhost:3004";

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    let args = Cli::parse();
    let host = args.host.trim_end_matches('/');

    match args.command {
        Commands::Orders(orders) => match orders.command {
            OrdersCmds::List { pretty } => {
                let res = Client::new()
                    .get(format!("{}/{}", host, "orders"))
                    .send()
                    .await?;
                match res.status() {
                    StatusCode::OK => {
                        let orders = res.json::<Vec<Value>>().await?;
                        let out = if pretty {
                            serde_json::to_string_pretty(&orders)?
                        } else {
                            serde_json::to_string(&orders)?
                        };
                        println!("{}", out);
                        eprintln!("{} order(s)", orders.len());
                    }
                    unexpected => {
                        let reason = res
                            .json::<ErrorResponse>()
                            .await
                            .map(|body| body.error)
                            .unwrap_or_else(|_| "no error body".to_string());
                        anyhow::bail!("got unexpected status code {}, {}", unexpected, reason);
                    }
                }
            }
        },
    };
    Ok(())
}
