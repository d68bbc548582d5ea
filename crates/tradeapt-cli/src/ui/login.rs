use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tradeapt_models::{Network, WalletInfo};

use super::widgets::{badge, centered_rect};
use crate::app::App;

pub const TAGLINE: &str = "Connect your Aptos wallet to start trading with AI assistance";
pub const DEVNET_NOTICE: &str =
    "This is a development environment using test tokens. No real funds are required.";
pub const TERMS: &str = "By connecting, you agree to our terms of service";

/// Wallets offered on the login page, in selection order.
///
/// Installed wallets come first. Without any installed wallet, the first
/// three others are suggested for install; otherwise two.
#[derive(Debug, Clone, Default)]
pub struct LoginChoices {
    pub installed: Vec<WalletInfo>,
    pub suggested: Vec<WalletInfo>,
}

impl LoginChoices {
    pub fn from_wallets(wallets: Vec<WalletInfo>) -> Self {
        let (installed, others): (Vec<_>, Vec<_>) =
            wallets.into_iter().partition(WalletInfo::is_installed);
        let limit = if installed.is_empty() { 3 } else { 2 };
        Self {
            installed,
            suggested: others.into_iter().take(limit).collect(),
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &WalletInfo> {
        self.installed.iter().chain(&self.suggested)
    }

    pub fn len(&self) -> usize {
        self.installed.len() + self.suggested.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn resource_links(network: Network) -> [(&'static str, &'static str); 3] {
    [
        ("Get Petra Wallet (Recommended)", "https://petra.app"),
        ("Devnet Faucet - Get Free Test APT", network.faucet_page_url()),
        ("Aptos Explorer (Devnet)", network.explorer_url()),
    ]
}

pub fn render(app: &mut App, f: &mut Frame) {
    let area = centered_rect(70, 90, f.area());
    let choices = LoginChoices::from_wallets(app.wallets());
    let selected = app.login_state.selected().unwrap_or(0);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Trade.apt", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            badge(app.network().label(), Color::Yellow),
        ]),
        Line::from(TAGLINE),
        Line::from(""),
    ];

    let mut index = 0;
    let mut entry = |lines: &mut Vec<Line<'static>>, wallet: &WalletInfo| {
        let marker = if index == selected { ">> " } else { "   " };
        let style = if index == selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut spans = vec![Span::styled(format!("{marker}{}", wallet.name), style)];
        if !wallet.is_installed() && !wallet.url.is_empty() {
            spans.push(Span::styled(
                format!("  (install: {})", wallet.url),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(spans));
        index += 1;
    };

    if choices.installed.is_empty() {
        lines.push(Line::styled("No wallets installed", Style::default().fg(Color::Red)));
        lines.push(Line::from("Install one of these wallets:"));
    } else {
        lines.push(Line::styled(
            "Installed Wallets",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for wallet in &choices.installed {
            entry(&mut lines, wallet);
        }
        lines.push(Line::from(""));
        lines.push(Line::styled(
            "More Wallets",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    for wallet in &choices.suggested {
        entry(&mut lines, wallet);
    }

    if let Some(error) = &app.connect_error {
        lines.push(Line::from(""));
        lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
    }

    lines.push(Line::from(""));
    lines.push(Line::styled(
        DEVNET_NOTICE,
        Style::default().fg(Color::Yellow),
    ));
    lines.push(Line::from(""));
    for (label, url) in resource_links(app.network()) {
        lines.push(Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(url, Style::default().fg(Color::Cyan)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(TERMS, Style::default().fg(Color::DarkGray)));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Connect Wallet"));
    f.render_widget(body, chunks[0]);
    f.render_widget(
        Paragraph::new("↑/↓ select  Enter connect  Esc back  q quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradeapt_models::{WalletName, WalletReadyState};

    fn wallet(name: &str, ready_state: WalletReadyState) -> WalletInfo {
        WalletInfo {
            name: WalletName::new(name),
            url: format!("https://{}.example", name.to_lowercase()),
            ready_state,
        }
    }

    fn catalogue(installed: &[&str]) -> Vec<WalletInfo> {
        ["Petra", "Pontem", "Martian", "Rise"]
            .iter()
            .map(|name| {
                let state = if installed.contains(name) {
                    WalletReadyState::Installed
                } else {
                    WalletReadyState::NotDetected
                };
                wallet(name, state)
            })
            .collect()
    }

    fn names<'a>(wallets: impl Iterator<Item = &'a WalletInfo>) -> Vec<&'a str> {
        wallets.map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn suggests_three_without_installed_wallets() {
        let choices = LoginChoices::from_wallets(catalogue(&[]));
        assert!(choices.installed.is_empty());
        assert_eq!(names(choices.suggested.iter()), ["Petra", "Pontem", "Martian"]);
    }

    #[test]
    fn suggests_two_next_to_installed() {
        let choices = LoginChoices::from_wallets(catalogue(&["Pontem"]));
        assert_eq!(names(choices.installed.iter()), ["Pontem"]);
        assert_eq!(names(choices.suggested.iter()), ["Petra", "Martian"]);
        assert_eq!(names(choices.all()), ["Pontem", "Petra", "Martian"]);
        assert_eq!(choices.len(), 3);
    }

    #[test]
    fn links_point_at_devnet() {
        let links = resource_links(Network::Devnet);
        assert_eq!(links[0].1, "https://petra.app");
        assert_eq!(links[1].1, "https://aptoslabs.com/testnet-faucet");
        assert_eq!(links[2].1, "https://explorer.aptoslabs.com/?network=devnet");
    }
}
