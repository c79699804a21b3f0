use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{Cli, Commands, NewsArgs};
use crate::client::{GatewayApi, HttpGateway};
use crate::config::Config;
use crate::gateway::run_gateway;

fn gateway_client(config: &Config, override_url: Option<&str>) -> HttpGateway {
    let url = override_url.unwrap_or(&config.client.gateway_url);
    HttpGateway::new(url)
}

async fn run_news(config: &Config, args: NewsArgs) -> Result<()> {
    let client = gateway_client(config, args.gateway.as_deref());
    let (kind, value) = match (&args.topic, &args.country) {
        (Some(topic), _) => ("topic", topic.as_str()),
        (_, Some(country)) => ("country", country.as_str()),
        // clap enforces one of the two.
        _ => anyhow::bail!("either --topic or --country is required"),
    };
    let response = client.news(kind, value).await?;
    println!("{response}");
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            info!(%host, port, "starting gateway");
            run_gateway(&host, port, &config).await
        }
        Commands::Chat { gateway } => {
            let url = gateway.as_deref().unwrap_or(&config.client.gateway_url);
            crate::client::repl::run(url).await
        }
        Commands::Ask { message, gateway } => {
            let client = gateway_client(&config, gateway.as_deref());
            let reply = client.ask(&message).await?;
            println!("{reply}");
            Ok(())
        }
        Commands::News(args) => run_news(&config, args).await,
        Commands::Search { query, gateway } => {
            let client = gateway_client(&config, gateway.as_deref());
            let results = client.search(&query).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
        Commands::Pdf { path, gateway } => {
            let client = gateway_client(&config, gateway.as_deref());
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {path}"))?;
            let filename = std::path::Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone());
            let text = client.extract_pdf(&filename, bytes).await?;
            println!("{text}");
            Ok(())
        }
    }
}
