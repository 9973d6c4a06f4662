use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "Command-line client for the todo API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check liveness
    Health,
    /// Check storage readiness
    Ready,
    /// Create a todo
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Fetch a todo by id
    Get { id: i64 },
    /// Delete a todo by id
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{base}/healthz")).send().await?,
        Commands::Ready => client.get(format!("{base}/readyz")).send().await?,
        Commands::Create { title, description } => {
            let mut body = json!({ "title": title });
            if let Some(description) = description {
                body["description"] = Value::String(description);
            }
            client
                .post(format!("{base}/api/v1/todos"))
                .json(&body)
                .send()
                .await?
        }
        Commands::Get { id } => client.get(format!("{base}/api/v1/todos/{id}")).send().await?,
        Commands::Delete { id } => {
            client
                .delete(format!("{base}/api/v1/todos/{id}"))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if text.is_empty() => println!("{}", status),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
