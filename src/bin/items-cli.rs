use clap::{Parser, Subcommand};
use serde_json::Value;

use item_service::Item;

#[derive(Parser)]
#[command(name = "items-cli")]
#[command(about = "Command-line client for the item service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an item (prints null when it does not exist)
    Get {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        /// Free-form query string, accepted by the server but unused
        #[arg(long)]
        q: Option<String>,
    },
    /// Create or replace an item
    Put {
        #[arg(allow_negative_numbers = true)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        offer: Option<bool>,
    },
    /// Check service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Get { id, q } => {
            let mut req = client.get(format!("{base}/items/{id}"));
            if let Some(q) = q {
                req = req.query(&[("q", q)]);
            }
            req.send().await?
        }
        Commands::Put { id, name, price, offer } => {
            let item = Item {
                name,
                price,
                is_offer: offer,
            };
            client
                .put(format!("{base}/items/{id}"))
                .json(&item)
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{base}/health")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: item service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
