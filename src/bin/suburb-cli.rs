use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "suburb-cli")]
#[command(about = "Query a running suburb-proxy from the terminal", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List properties for a suburb
    Properties {
        #[arg(long)]
        suburb: Option<String>,
        #[arg(long)]
        property_type: Option<String>,
    },
    /// Fetch a suburb-level dataset (e.g. market-insights)
    Suburb {
        endpoint: String,
        #[arg(long)]
        suburb: Option<String>,
    },
    /// Fetch a property-level dataset, passing KEY=VALUE query parameters
    Property {
        endpoint: String,
        #[arg(value_parser = parse_pair)]
        params: Vec<(String, String)>,
    },
    /// Automated valuation for an address
    Avm { address: String },
    /// Comparative market analysis for an address
    Cma { address: String },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let (path, query): (String, Vec<(String, String)>) = match cli.command {
        Commands::Properties {
            suburb,
            property_type,
        } => {
            let mut query = Vec::new();
            if let Some(s) = suburb {
                query.push(("suburb".to_string(), s));
            }
            if let Some(t) = property_type {
                query.push(("property_type".to_string(), t));
            }
            ("/api/properties".to_string(), query)
        }
        Commands::Suburb { endpoint, suburb } => (
            format!("/api/suburb/{}", endpoint),
            suburb.map(|s| ("suburb".to_string(), s)).into_iter().collect(),
        ),
        Commands::Property { endpoint, params } => (format!("/api/property/{}", endpoint), params),
        Commands::Avm { address } => ("/api/avm".to_string(), vec![("address".to_string(), address)]),
        Commands::Cma { address } => ("/api/cma".to_string(), vec![("address".to_string(), address)]),
    };

    let res = client
        .get(format!("{}{}", base, path))
        .query(&query)
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    // The proxy always answers 200; failures live in the body.
    if let Some(error) = json.get("error").and_then(Value::as_str) {
        eprintln!("Error: {}", error);
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
