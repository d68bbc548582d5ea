mod app;
mod app_state;
mod audit;
mod chat;
mod config;
mod router;
mod session_store;
mod tui;
mod ui;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tradeapt_models::{WalletAddress, WalletName};
use tradeapt_sdk::{BackendClient, ChainClient, SimulatedSigner, WatchOnlyWallet};

use crate::app::{App, Services};
use crate::app_state::AppController;
use crate::config::AppConfig;
use crate::session_store::SessionStore;
use crate::tui::{init, restore, EventHandler};

#[derive(Parser, Debug)]
#[command(name = "tradeapt")]
#[command(about = "Terminal dashboard for the Trade.apt trading assistant")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides TRADEAPT_API_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Wallet available on this machine (overrides TRADEAPT_WALLET)
    #[arg(long)]
    pub wallet: Option<String>,

    /// Account exposed by that wallet (overrides TRADEAPT_WALLET_ADDRESS)
    #[arg(long)]
    pub wallet_address: Option<WalletAddress>,

    /// Price stream retry delay in milliseconds (overrides TRADEAPT_RECONNECT_MS)
    #[arg(long)]
    pub reconnect_ms: Option<u64>,

    /// Log file; the terminal is busy drawing the dashboard
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Redraw interval in milliseconds
    #[arg(long, default_value_t = 250)]
    pub tick_rate: u64,
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tradeapt")
        .join("tradeapt.log")
}

fn init_logging(path: PathBuf) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn apply_overrides(mut config: AppConfig, cli: &Cli) -> anyhow::Result<AppConfig> {
    if let Some(url) = &cli.api_url {
        config.api_url = config::validate_url("--api-url", url.clone())?;
    }
    if let Some(name) = &cli.wallet {
        config.wallet_name = WalletName::new(name);
    }
    if let Some(address) = &cli.wallet_address {
        config.wallet_address = Some(address.clone());
    }
    if let Some(ms) = cli.reconnect_ms {
        config.reconnect_delay = Duration::from_millis(ms);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.clone().unwrap_or_else(default_log_file))?;

    let config = apply_overrides(AppConfig::from_env()?, &cli)?;
    info!(api = %config.api_url, network = %config.network, "starting dashboard");

    let services = Services {
        backend: BackendClient::new(&config.api_url)?,
        chain: ChainClient::new(config.network, config.aptos_api_key.clone())?,
        wallet: Box::new(WatchOnlyWallet::new(
            config.wallet_name.clone(),
            config.wallet_address.clone(),
            config.network,
        )),
        signer: Arc::new(SimulatedSigner::default()),
        store: SessionStore::default_location(),
    };

    let mut terminal = init()?;
    let mut events = EventHandler::new(cli.tick_rate);
    let mut app = App::new(&config, services, events.get_sender());
    app.start();

    let result = run(&mut terminal, &mut events, &mut app).await;
    app.shutdown();
    restore()?;
    info!("dashboard closed");
    result
}

async fn run(
    terminal: &mut tui::Tui,
    events: &mut EventHandler,
    app: &mut App,
) -> anyhow::Result<()> {
    while !app.should_quit() {
        terminal.draw(|f| app.render(f))?;
        match events.next_async().await {
            Some(action) => app.update(action),
            None => break,
        }
    }
    Ok(())
}
