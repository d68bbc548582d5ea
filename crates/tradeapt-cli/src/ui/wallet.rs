use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::widgets::badge;
use crate::app::App;

pub const DEVNET_FACTS: [&str; 4] = [
    "All tokens are free test tokens with no real value",
    "Use the faucet to get free APT for testing trades",
    "The network may reset periodically, clearing all data",
    "Perfect for learning and testing the AI trading assistant",
];
pub const GETTING_STARTED: &str = "Getting Started: Request free APT from the faucet above, then go back to the trading dashboard to test AI-powered trading commands like \"buy 0.1 APT\" or \"what's the price of bitcoin?\"";
const DEVELOPER_DOCS: &str = "https://aptoslabs.com/developers";

pub fn render(app: &mut App, f: &mut Frame) {
    let Some(account) = app.session.clone() else {
        return;
    };
    let network = app.network();
    let panel = &app.wallet_panel;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled("Wallet", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        badge(network.label(), Color::Yellow),
        Span::raw("   [b] Back to Trading"),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Trade.apt"));
    f.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(4),
            Constraint::Min(6),
        ])
        .split(columns[0]);

    // Account
    let mut account_lines = vec![
        Line::from(format!("Address: {}", account.address)),
        Line::from(format!("Wallet:  {}", account.wallet)),
        Line::from(format!("Network: {}", network.label())),
        Line::from(vec![
            Span::raw("Explorer: "),
            Span::styled(
                network.explorer_account_url(&account.address),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];
    if let Some(module) = &app.module_address {
        account_lines.push(Line::from(format!("Trading module: {module}")));
    }
    account_lines.push(Line::styled(
        "[d] Disconnect Wallet",
        Style::default().fg(Color::Red),
    ));
    f.render_widget(
        Paragraph::new(account_lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Account")),
        left[0],
    );

    // Balance
    let balance = if panel.balance_loading {
        Line::styled("Loading...", Style::default().fg(Color::Yellow))
    } else if let Some(error) = &panel.balance_error {
        Line::styled(error.clone(), Style::default().fg(Color::Red))
    } else {
        Line::styled(
            format!("{:.4} APT", panel.balance),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };
    let balance_lines = vec![
        balance,
        Line::styled("[r] Refresh", Style::default().fg(Color::DarkGray)),
    ];
    f.render_widget(
        Paragraph::new(balance_lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Balance")),
        left[1],
    );

    // Faucet
    let button = if panel.faucet_loading {
        Line::styled("Requesting...", Style::default().fg(Color::Yellow))
    } else {
        Line::styled("[f] Request 1 APT", Style::default().fg(Color::Green))
    };
    let mut faucet_lines = vec![
        Line::from(format!("Official Aptos {} Faucet", network.label())),
        button,
    ];
    if let Some(message) = &panel.faucet_message {
        let color = if message.success { Color::Green } else { Color::Red };
        faucet_lines.push(Line::styled(message.text.clone(), Style::default().fg(color)));
    }
    faucet_lines.push(Line::from(vec![
        Span::raw("Web faucet: "),
        Span::styled(network.faucet_page_url(), Style::default().fg(Color::Cyan)),
    ]));
    f.render_widget(
        Paragraph::new(faucet_lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Faucet")),
        left[2],
    );

    // About devnet
    let mut info_lines: Vec<Line> = DEVNET_FACTS
        .iter()
        .map(|fact| Line::from(format!("• {fact}")))
        .collect();
    info_lines.push(Line::from(""));
    info_lines.push(Line::styled(GETTING_STARTED, Style::default().fg(Color::Yellow)));
    info_lines.push(Line::from(""));
    info_lines.push(Line::from(vec![
        Span::raw("Explorer: "),
        Span::styled(network.explorer_url(), Style::default().fg(Color::Cyan)),
    ]));
    info_lines.push(Line::from(vec![
        Span::raw("Developer docs: "),
        Span::styled(DEVELOPER_DOCS, Style::default().fg(Color::Cyan)),
    ]));
    f.render_widget(
        Paragraph::new(info_lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("About {}", network.label())),
            ),
        columns[1],
    );

    f.render_widget(
        Paragraph::new("f faucet  r refresh  d disconnect  Esc/b back  q quit")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}
