use clap::{Parser, Subcommand};
use url::Url;

use worker_relay::codec::{decode, HeaderList};
use worker_relay::load_balancer::WorkerPool;
use worker_relay::relay::{CapturedRequest, RequestRewriter};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Offline tools for the worker relay wire format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the worker URL a request would be relayed as
    Encode {
        /// Original request URL
        #[arg(long)]
        url: String,

        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Header as `Name: value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request body
        #[arg(short, long)]
        data: Option<String>,

        /// Worker hostname
        #[arg(short, long, default_value = "worker.example")]
        worker: String,
    },
    /// Decode a payload (`/?dieuri=…` or a full worker URL) as JSON
    Decode {
        payload: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { url, method, headers, data, worker } => {
            let url = Url::parse(&url)?;
            let host = match (url.host_str(), url.port()) {
                (Some(host), Some(port)) => format!("{}:{}", host, port),
                (Some(host), None) => host.to_string(),
                (None, _) => return Err(format!("{} has no host", url).into()),
            };
            let path = match url.query() {
                Some(q) => format!("{}?{}", url.path(), q),
                None => url.path().to_string(),
            };

            let mut header_list = HeaderList::new();
            for raw in &headers {
                let (name, value) = raw
                    .split_once(':')
                    .ok_or_else(|| format!("header {:?} is not `Name: value`", raw))?;
                header_list.push(name.trim(), value.trim_start());
            }

            let captured = CapturedRequest::new(
                url.scheme(),
                host,
                path,
                method.to_ascii_uppercase(),
                header_list,
                data.unwrap_or_default(),
            );
            let rewriter = RequestRewriter::new(WorkerPool::new([worker])?.into());
            let relayed = rewriter.relay(&captured);
            if let Some(err) = &relayed.degraded {
                eprintln!("warning: {}", err);
            }
            println!("{}", relayed.request.url());
        }
        Commands::Decode { payload } => {
            // Full URLs are reduced to their path and query.
            let payload = match Url::parse(&payload) {
                Ok(url) => format!("/?{}", url.query().unwrap_or_default()),
                Err(_) => payload,
            };
            let decoded = decode(&payload)?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
    }

    Ok(())
}
