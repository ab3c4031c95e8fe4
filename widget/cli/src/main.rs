mod config;

use std::io::{BufRead, Write};
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use docwing_core::{MessageRole, WidgetConfig};
use docwing_environment::{EnvironmentClassifier, ManualNavigationHooks, StaticProbe};
use docwing_runtime::{HeadlessSurface, WidgetController};
use docwing_store::{MemoryTabStorage, StateStore};
use docwing_transport::HttpChatClient;

use config::HarnessConfig;

#[derive(Parser)]
#[command(name = "docwing")]
#[command(about = "Docwing — embeddable docs chat widget, headless harness")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the widget runtime interactively against a live chat backend
    Chat {
        /// Tenant id (falls back to DOCWING_TENANT_ID)
        #[arg(long)]
        tenant_id: Option<String>,

        /// Widget API key (falls back to DOCWING_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Chat API base URL (falls back to DOCWING_API_BASE_URL)
        #[arg(long)]
        api_base_url: Option<String>,

        /// Model override forwarded to the backend
        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        max_tokens: Option<u32>,

        #[arg(long)]
        temperature: Option<f32>,

        /// Greeting shown before the first question
        #[arg(long)]
        greeting: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = HarnessConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&env.log_level)),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Chat {
            tenant_id,
            api_key,
            api_base_url,
            model,
            max_tokens,
            temperature,
            greeting,
        } => {
            let config = WidgetConfig {
                tenant_id: tenant_id.or(env.tenant_id).unwrap_or_default(),
                api_key: api_key.or(env.api_key).unwrap_or_default(),
                api_base_url: api_base_url.or(env.api_base_url),
                model,
                max_tokens,
                temperature,
                initial_message: greeting,
                ..Default::default()
            };
            if config.validate().is_err() {
                bail!("tenant id and api key are required (flags or DOCWING_TENANT_ID / DOCWING_API_KEY)");
            }
            run_chat(config).await
        }
    }
}

async fn run_chat(config: WidgetConfig) -> Result<()> {
    let store = StateStore::new(Arc::new(MemoryTabStorage::new()));

    // a terminal has no client-side router; this resolves to mpa
    let classifier = EnvironmentClassifier::new(store.clone());
    let environment = classifier.detect(&StaticProbe::empty(), &ManualNavigationHooks::new());
    info!(environment = environment.as_str(), "host environment classified");

    let surface = Rc::new(HeadlessSurface::new());
    let backend = Rc::new(HttpChatClient::new());
    let mut controller =
        WidgetController::init(config, store, surface.clone(), backend, environment)
            .map_err(|err| anyhow::anyhow!("widget failed to initialize: {err}"))?;

    controller.toggle();
    if let Some((MessageRole::Bot, greeting)) = surface.last_message() {
        println!("bot> {greeting}");
    }
    println!("(type a question, or /quit to exit)");

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line == "/quit" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        controller.submit(line).await;
        if let Some((MessageRole::Bot, answer)) = surface.last_message() {
            println!("bot> {answer}");
        }
    }

    Ok(())
}
