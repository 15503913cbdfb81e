use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;
use url::Url;

use mtd_fraud_headers::config::load_config;
use mtd_fraud_headers::fraud::{HeaderBuilder, Platform, RequestContext, VendorInfo};

#[derive(Parser)]
#[command(name = "fraud-cli")]
#[command(about = "Build and inspect HMRC fraud prevention headers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build headers locally from a config file and a telemetry JSON file
    Build {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        telemetry: PathBuf,
        #[arg(short, long)]
        user: String,
        #[arg(long, default_value = "127.0.0.1")]
        client_ip: IpAddr,
        /// Reuse a device ID instead of generating one
        #[arg(long)]
        device_id: Option<String>,
    },
    /// Ask a running service to build headers
    Headers {
        #[arg(long, default_value = "http://localhost:8080")]
        url: Url,
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        telemetry: PathBuf,
        #[arg(long, default_value = "x-session-user")]
        user_header: String,
    },
    /// Show the request headers the service received
    Feedback {
        #[arg(long, default_value = "http://localhost:8080")]
        url: Url,
        #[arg(short, long)]
        user: String,
        #[arg(long, default_value = "x-session-user")]
        user_header: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Build {
            config,
            telemetry,
            user,
            client_ip,
            device_id,
        } => {
            let config = load_config(&config)?;
            let builder =
                HeaderBuilder::new(VendorInfo::new(&config.vendor, Platform::detect()));
            let ctx = RequestContext {
                remote_addr: Some(client_ip),
                session_user: user,
                telemetry: Some(std::fs::read_to_string(telemetry)?),
                device_id: device_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                ..Default::default()
            };
            let headers = builder.build_now(&ctx, &config.hmrc)?;
            println!("{}", serde_json::to_string_pretty(&headers)?);
        }
        Commands::Headers {
            url,
            user,
            telemetry,
            user_header,
        } => {
            let payload = std::fs::read_to_string(telemetry)?;
            let res = client
                .post(url.join("/api/fraud-prevention/headers")?)
                .header(user_header, user)
                .form(&[("fraud_prevention", payload)])
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Feedback {
            url,
            user,
            user_header,
        } => {
            let res = client
                .get(url.join("/api/fraud-prevention/feedback")?)
                .header(user_header, user)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if let Some(cookie) = res.headers().get(reqwest::header::SET_COOKIE) {
        eprintln!("Set-Cookie: {}", cookie.to_str().unwrap_or("<binary>"));
    }
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("service returned status {}: {}", status, text).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
