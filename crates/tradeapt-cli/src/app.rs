use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use ratatui::Frame;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};
use tradeapt_models::{FaucetRequest, FaucetResponse, Network, PriceBook, WalletAddress};
use tradeapt_sdk::{
    AccountInfo, BackendClient, ChainClient, PriceFeedEvent, PriceStream, PriceStreamHandle,
    TradeSigner, WalletAdapter, FAUCET_FAILED,
};
use uuid::Uuid;

use crate::app_state::{AppController, InputMode};
use crate::audit::{AuditKind, AuditLog};
use crate::chat::ChatLog;
use crate::config::AppConfig;
use crate::router::{Route, Router, View};
use crate::session_store::{SessionStore, StoredSession};
use crate::tui::Action;
use crate::ui;

pub const FAUCET_SUCCESS: &str = "Successfully received 1 APT from faucet";
pub const FAUCET_NETWORK_ERROR: &str = "Network error - try again later";
pub const FAUCET_AMOUNT_APT: f64 = 1.0;
pub const BALANCE_UNAVAILABLE: &str = "Could not load balance";
const BALANCE_REFRESH_DELAY: Duration = Duration::from_secs(2);
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// External collaborators the dashboard talks to.
pub struct Services {
    pub backend: BackendClient,
    pub chain: ChainClient,
    pub wallet: Box<dyn WalletAdapter>,
    pub signer: Arc<dyn TradeSigner>,
    pub store: SessionStore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaucetMessage {
    pub success: bool,
    pub text: String,
}

/// State of the wallet page.
#[derive(Debug, Clone, Default)]
pub struct WalletPanel {
    pub balance: f64,
    pub balance_loading: bool,
    /// Last balance lookup failure; cleared by the next success.
    pub balance_error: Option<String>,
    pub faucet_loading: bool,
    pub faucet_message: Option<FaucetMessage>,
}

pub struct App {
    tx: UnboundedSender<Action>,
    services: Services,
    network: Network,
    reconnect_delay: Duration,
    should_quit: bool,

    pub(crate) module_address: Option<WalletAddress>,
    pub(crate) router: Router,
    pub(crate) session: Option<AccountInfo>,

    pub(crate) prices: PriceBook,
    pub(crate) live: bool,
    stream: Option<PriceStreamHandle>,

    pub(crate) chat: ChatLog,
    pub(crate) audit: AuditLog,
    pub(crate) wallet_panel: WalletPanel,

    pub(crate) input_mode: InputMode,
    pub(crate) input: String,
    pub(crate) nav_state: ListState,
    pub(crate) login_state: ListState,
    pub(crate) connect_error: Option<String>,
    pub(crate) notification: Option<(String, Instant)>,
}

impl App {
    pub fn new(config: &AppConfig, services: Services, tx: UnboundedSender<Action>) -> Self {
        let mut nav_state = ListState::default();
        nav_state.select(Some(0));
        let mut login_state = ListState::default();
        login_state.select(Some(0));

        Self {
            tx,
            services,
            network: config.network,
            reconnect_delay: config.reconnect_delay,
            should_quit: false,
            module_address: config.module_address.clone(),
            router: Router::default(),
            session: None,
            prices: PriceBook::default(),
            live: false,
            stream: None,
            chat: ChatLog::default(),
            audit: AuditLog::default(),
            wallet_panel: WalletPanel::default(),
            input_mode: InputMode::Normal,
            input: String::new(),
            nav_state,
            login_state,
            connect_error: None,
            notification: None,
        }
    }

    /// Open the price stream and restore the previous wallet session.
    pub fn start(&mut self) {
        let tx = self.tx.clone();
        self.stream = Some(PriceStream::spawn(
            self.services.backend.price_stream_url(),
            self.reconnect_delay,
            move |event| tx.send(Action::Price(event)).is_ok(),
        ));
        self.auto_connect();
    }

    /// Stop the price stream.
    pub fn shutdown(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub(crate) fn wallets(&self) -> Vec<tradeapt_models::WalletInfo> {
        self.services.wallet.wallets()
    }

    fn auto_connect(&mut self) {
        let Some(stored) = self.services.store.load() else {
            return;
        };
        if stored.network != self.network {
            debug!(network = %stored.network, "stored session is for another network");
            return;
        }
        let installed = self
            .services
            .wallet
            .wallets()
            .iter()
            .any(|w| w.name == stored.wallet_name && w.is_installed());
        if installed {
            info!(wallet = %stored.wallet_name, "auto-connecting stored wallet");
            self.connect_wallet(&stored.wallet_name);
        }
    }

    fn notify(&mut self, text: impl Into<String>) {
        self.notification = Some((text.into(), Instant::now()));
    }

    // -----------------------------------------------------------------------
    // Wallet
    // -----------------------------------------------------------------------

    fn connect_wallet(&mut self, name: &tradeapt_models::WalletName) {
        match self.services.wallet.connect(name) {
            Ok(account) => {
                info!(wallet = %account.wallet, address = %account.address, "wallet connected");
                self.services.store.save(&StoredSession {
                    wallet_address: account.address.clone(),
                    network: account.network,
                    wallet_name: account.wallet.clone(),
                });
                self.audit.record(
                    AuditKind::Wallet,
                    format!("Connected {} ({})", account.wallet, account.address),
                );
                self.notify(format!("Connected {}", account.address.short(6)));
                self.connect_error = None;
                self.session = Some(account);
                self.router.on_connected();
            }
            Err(e) => {
                warn!(wallet = %name, error = %e, "wallet connect failed");
                let hint = e.install_hint();
                self.connect_error = Some(hint.clone());
                self.chat.post_bot(hint);
            }
        }
    }

    fn connect_selected(&mut self) {
        let choices = ui::login::LoginChoices::from_wallets(self.wallets());
        let selected = self.login_state.selected().unwrap_or(0);
        let name = choices.all().nth(selected).map(|w| w.name.clone());
        if let Some(name) = name {
            self.connect_wallet(&name);
        }
    }

    fn disconnect_wallet(&mut self) {
        let Some(account) = self.session.clone() else {
            return;
        };
        if let Err(e) = self.services.wallet.disconnect() {
            warn!(error = %e, "wallet disconnect failed");
            return;
        }
        info!(address = %account.address, "wallet disconnected");
        self.services.store.clear();
        self.session = None;
        self.wallet_panel = WalletPanel::default();
        self.audit
            .record(AuditKind::Wallet, format!("Disconnected {}", account.address));
        self.notify("Wallet disconnected");
        self.router.on_disconnected();
    }

    fn open_wallet(&mut self) {
        if self.router.open_wallet(self.session.is_some()) == Route::Wallet {
            self.load_balance();
        }
    }

    fn load_balance(&mut self) {
        let Some(account) = &self.session else {
            return;
        };
        let address = account.address.clone();
        self.wallet_panel.balance_loading = true;

        let chain = self.services.chain.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = chain
                .account_balance(&address)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(Action::Balance { address, result });
        });
    }

    fn request_faucet(&mut self) {
        if self.wallet_panel.faucet_loading {
            return;
        }
        let Some(account) = &self.session else {
            return;
        };
        let request = FaucetRequest {
            address: account.address.clone(),
            amount_apt: FAUCET_AMOUNT_APT,
            network: self.network,
        };
        self.wallet_panel.faucet_loading = true;
        self.wallet_panel.faucet_message = None;

        let backend = self.services.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend
                .request_faucet(&request)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(Action::Faucet {
                address: request.address,
                result,
            });
        });
    }

    fn is_current(&self, address: &WalletAddress) -> bool {
        self.session
            .as_ref()
            .is_some_and(|account| account.address == *address)
    }

    fn on_balance(&mut self, address: &WalletAddress, result: Result<f64, String>) {
        if !self.is_current(address) {
            return;
        }
        self.wallet_panel.balance_loading = false;
        match result {
            Ok(balance) => {
                self.wallet_panel.balance = balance;
                self.wallet_panel.balance_error = None;
            }
            Err(e) => {
                warn!(address = %address, error = %e, "failed to load balance");
                self.wallet_panel.balance_error = Some(format!("{BALANCE_UNAVAILABLE}: {e}"));
            }
        }
    }

    fn on_faucet(&mut self, address: &WalletAddress, result: Result<FaucetResponse, String>) {
        if !self.is_current(address) {
            return;
        }
        self.wallet_panel.faucet_loading = false;
        let message = match result {
            Ok(reply) if reply.success => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(BALANCE_REFRESH_DELAY).await;
                    let _ = tx.send(Action::RefreshBalance);
                });
                FaucetMessage {
                    success: true,
                    text: FAUCET_SUCCESS.to_string(),
                }
            }
            Ok(reply) => FaucetMessage {
                success: false,
                text: reply.error.unwrap_or_else(|| FAUCET_FAILED.to_string()),
            },
            Err(e) => {
                warn!(error = %e, "faucet request failed");
                FaucetMessage {
                    success: false,
                    text: FAUCET_NETWORK_ERROR.to_string(),
                }
            }
        };
        self.audit.record(AuditKind::Faucet, message.text.clone());
        self.wallet_panel.faucet_message = Some(message);
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    fn send_chat(&mut self) {
        let Some(text) = self.chat.submit(&self.input) else {
            return;
        };
        self.input.clear();

        let backend = self.services.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.parse_intent(&text).await.map_err(|e| {
                warn!(error = %e, "parse request failed");
                e.to_string()
            });
            let _ = tx.send(Action::ParseResult(result));
        });
    }

    fn approve_latest(&mut self) {
        let Some(id) = self.chat.latest_pending() else {
            return;
        };
        let Some(intent) = self.chat.approve(id) else {
            return;
        };
        self.audit
            .record(AuditKind::Trade, format!("Approved {}", intent.headline()));

        let pending = self.services.signer.sign(&intent);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = pending.await.map_err(|e| e.to_string());
            let _ = tx.send(Action::Signed { id, result });
        });
    }

    fn reject_latest(&mut self) {
        let Some(id) = self.chat.latest_pending() else {
            return;
        };
        let headline = self
            .chat
            .messages()
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.intent.as_ref())
            .map(tradeapt_models::TradeIntent::headline);
        if self.chat.reject(id) {
            self.audit.record(
                AuditKind::Trade,
                format!("Rejected {}", headline.unwrap_or_default()),
            );
        }
    }

    fn on_signed(&mut self, id: Uuid, result: Result<tradeapt_sdk::SignOutcome, String>) {
        let entry = match &result {
            Ok(outcome) => format!("Signed {}", outcome.summary),
            Err(e) => format!("Signing failed: {e}"),
        };
        self.audit.record(AuditKind::Trade, entry);
        self.chat.finish_approval(id, result);
    }

    fn on_price(&mut self, event: PriceFeedEvent) {
        match event {
            PriceFeedEvent::Connected => self.live = true,
            PriceFeedEvent::Event(event) => {
                if !self.prices.apply(event, Utc::now()) {
                    debug!("ignored incomplete price event");
                }
            }
            PriceFeedEvent::Disconnected(reason) => {
                debug!(reason = %reason, "price feed down");
                self.live = false;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.router.route() {
            Route::Login => self.on_login_key(key),
            Route::Wallet => self.on_wallet_key(key),
            Route::Dashboard => match self.input_mode {
                InputMode::Normal => self.on_nav_key(key),
                InputMode::Editing => self.on_chat_key(key),
            },
        }
    }

    fn on_login_key(&mut self, key: KeyEvent) {
        let count = ui::login::LoginChoices::from_wallets(self.wallets()).len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down => step(&mut self.login_state, count, true),
            KeyCode::Up => step(&mut self.login_state, count, false),
            KeyCode::Enter => self.connect_selected(),
            KeyCode::Esc | KeyCode::Char('b') => self.router.back_to_dashboard(),
            _ => {}
        }
    }

    fn on_wallet_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('f') => self.request_faucet(),
            KeyCode::Char('r') => self.load_balance(),
            KeyCode::Char('d') => self.disconnect_wallet(),
            KeyCode::Esc | KeyCode::Char('b') => self.router.back_to_dashboard(),
            _ => {}
        }
    }

    fn on_nav_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.input_mode = InputMode::Editing,
            KeyCode::Down => step(&mut self.nav_state, View::ALL.len(), true),
            KeyCode::Up => step(&mut self.nav_state, View::ALL.len(), false),
            KeyCode::Enter => {
                if let Some(view) = self.nav_state.selected().and_then(View::from_index) {
                    self.router.navigate(view);
                }
            }
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(view) = View::from_index(usize::from(c as u8 - b'1')) {
                    self.nav_state.select(Some(view.index()));
                    self.router.navigate(view);
                }
            }
            KeyCode::Char('a') => self.approve_latest(),
            KeyCode::Char('r') => self.reject_latest(),
            KeyCode::Char('w') => self.open_wallet(),
            KeyCode::Char('c') if self.session.is_none() => self.router.open_login(),
            _ => {}
        }
    }

    fn on_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.send_chat(),
            KeyCode::Esc | KeyCode::Tab => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }
}

/// Move a list selection with wrap-around.
fn step(state: &mut ListState, len: usize, down: bool) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = match state.selected() {
        Some(i) if down => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    state.select(Some(i));
}

impl AppController for App {
    fn update(&mut self, action: Action) {
        match action {
            Action::Key(key) => self.on_key(key),
            Action::Price(event) => self.on_price(event),
            Action::ParseResult(result) => self.chat.apply_parse_result(result),
            Action::Signed { id, result } => self.on_signed(id, result),
            Action::Balance { address, result } => self.on_balance(&address, result),
            Action::Faucet { address, result } => self.on_faucet(&address, result),
            Action::RefreshBalance => self.load_balance(),
            Action::Tick | Action::Resize(..) => {}
        }

        if let Some((_, shown)) = &self.notification {
            if shown.elapsed() > NOTIFICATION_TTL {
                self.notification = None;
            }
        }
    }

    fn render(&mut self, f: &mut Frame) {
        ui::render(self, f);
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }
}
