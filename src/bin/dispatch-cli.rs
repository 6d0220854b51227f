use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use reqwest::Method;
use serde_json::{json, Value};

use content_dispatch::config::{load_config, resolve_config_path};
use content_dispatch::dispatch::{AppContext, METHOD_FIELD};
use content_dispatch::resources::register_content;
use content_dispatch::{Dispatcher, DispatcherConfig, HandlerRegistry, InboundRequest};

#[derive(Parser)]
#[command(name = "dispatch-cli")]
#[command(about = "Inspect routes and exercise a running content-dispatch server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a request would be rewritten and resolved, without running it
    Inspect {
        method: String,
        path: String,

        /// Config file or directory; defaults apply when none is found
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Send a request to a running server
    Request {
        method: String,
        path: String,

        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,

        /// Form parameter as key=value; repeatable
        #[arg(short, long = "data", value_parser = parse_pair)]
        data: Vec<(String, String)>,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { method, path, config } => inspect(&method, &path, config)?,
        Commands::Request { method, path, url, data } => request(&method, &path, &url, data).await?,
    }

    Ok(())
}

fn inspect(method: &str, path: &str, config: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let resolved = resolve_config_path(config.as_deref());
    let config = if config.is_none() && !resolved.exists() {
        DispatcherConfig::default()
    } else {
        load_config(&resolved)?
    };

    let registry = register_content(HandlerRegistry::builder(), &config.dispatch.controller_prefix).build()?;
    let dispatcher = Dispatcher::from_config(&config, registry, Arc::new(AppContext::in_memory()))?;

    let output = match dispatcher.plan(&InboundRequest::new(method, path)) {
        Ok(plan) => {
            let registered = dispatcher.resolver().registry().contains(&plan.handler_id);
            json!({ "plan": plan, "registered": registered })
        }
        Err(err) => json!({ "error": err.to_payload() }),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn request(
    method: &str,
    path: &str,
    url: &str,
    data: Vec<(String, String)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
    let target = format!("{}/{}", url.trim_end_matches('/'), path.trim_start_matches('/'));

    // Non-GET verbs travel as POST with an override so plain form clients work too.
    let client = reqwest::Client::new();
    let builder = if method == Method::GET || method == Method::HEAD {
        client.request(method, &target).query(&data)
    } else {
        let mut form = data;
        if method != Method::POST {
            form.push((METHOD_FIELD.to_string(), method.to_string()));
        }
        client.post(&target).form(&form)
    };

    let res = builder.send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    println!("HTTP {status}");

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if text.is_empty() => {}
        Err(_) => println!("{text}"),
    }
    Ok(())
}
