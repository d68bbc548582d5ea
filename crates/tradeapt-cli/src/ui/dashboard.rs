use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame,
};
use tradeapt_models::{format_address, format_change, format_price, PriceTrend};

use super::widgets::{badge, trend_color, wrap_text};
use crate::app::App;
use crate::app_state::InputMode;
use crate::chat::{ApprovalStatus, ChatMessage, ChatRole};
use crate::router::View;

pub const INPUT_PLACEHOLDER: &str = "Ask the AI agent...";
const APPROVAL_KEYS: &str = "[a] Approve & sign  [r] Reject";

pub fn render(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(app, f, chunks[0]);
    render_ticker(app, f, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22),
            Constraint::Min(0),
            Constraint::Percentage(40),
        ])
        .split(chunks[2]);

    render_sidebar(app, f, body[0]);
    match app.router.view() {
        View::Home => render_home(app, f, body[1]),
        View::AuditLogs => render_audit(app, f, body[1]),
        view => render_placeholder(view, f, body[1]),
    }
    render_chat(app, f, body[2]);

    let help = match app.input_mode {
        InputMode::Editing => "Enter send  Esc/Tab stop typing",
        InputMode::Normal => {
            "Tab chat  ↑/↓/Enter or 1-5 views  a approve  r reject  w wallet  c connect  q quit"
        }
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[3],
    );
}

fn render_header(app: &App, f: &mut Frame, area: Rect) {
    let network = app.network();
    let mut spans = vec![
        Span::styled(
            app.router.view().title(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        badge(network.label(), Color::Yellow),
        Span::raw("   "),
    ];
    match &app.session {
        Some(account) => {
            spans.push(Span::styled(
                format!("● {}", format_address(account.address.as_str(), 6)),
                Style::default().fg(Color::Green),
            ));
            spans.push(Span::styled(
                format!("  Network: {}  [w] Wallet", network.label()),
                Style::default().fg(Color::DarkGray),
            ));
        }
        None => spans.push(Span::styled(
            "[c] Connect Wallet",
            Style::default().fg(Color::Cyan),
        )),
    }
    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Trade.apt"));
    f.render_widget(header, area);
}

fn render_ticker(app: &App, f: &mut Frame, area: Rect) {
    let mut spans = vec![if app.live {
        Span::styled("● LIVE", Style::default().fg(Color::Green))
    } else {
        Span::styled("● RECONNECTING", Style::default().fg(Color::Yellow))
    }];
    for (symbol, data) in app.prices.iter() {
        let color = trend_color(PriceTrend::from_change(data.change_24h));
        spans.push(Span::raw(format!("   {symbol} ")));
        spans.push(Span::styled(
            format!("{} {}", format_price(Some(data.price)), format_change(data.change_24h)),
            Style::default().fg(color),
        ));
    }
    if let Some(at) = app.prices.last_update() {
        spans.push(Span::styled(
            format!("   Updated {}", at.with_timezone(&Local).format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let ticker = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Markets"));
    f.render_widget(ticker, area);
}

fn render_sidebar(app: &mut App, f: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| ListItem::new(format!("{} {}", i + 1, view.label())))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Menu"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow))
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, &mut app.nav_state);
}

fn render_home(app: &App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title("Prices");
    if app.prices.is_empty() {
        f.render_widget(
            Paragraph::new("Waiting for prices...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            chunks[0],
        );
    } else {
        let rows = app.prices.iter().map(|(symbol, data)| {
            let color = trend_color(PriceTrend::from_change(data.change_24h));
            let mut name = symbol.clone();
            if data.is_stale {
                name.push_str(" (stale)");
            }
            Row::new(vec![
                Cell::from(name),
                Cell::from(format_price(Some(data.price))),
                Cell::from(format_change(data.change_24h)).style(Style::default().fg(color)),
                Cell::from(format_price(Some(data.high_24h))),
                Cell::from(format_price(Some(data.low_24h))),
                Cell::from(format_price(Some(data.volume_24h))),
                Cell::from(data.source.clone()),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(16),
                Constraint::Min(6),
            ],
        )
        .header(
            Row::new(vec!["Symbol", "Price", "24h", "High", "Low", "Volume", "Source"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(block);
        f.render_widget(table, chunks[0]);
    }

    let summary = match &app.session {
        Some(account) => vec![
            Line::from(format!("Connected: {}", account.address)),
            Line::styled(
                "Press w to open the wallet page and request test APT.",
                Style::default().fg(Color::DarkGray),
            ),
        ],
        None => vec![
            Line::from("No wallet connected."),
            Line::styled(
                "Press c to connect a wallet.",
                Style::default().fg(Color::DarkGray),
            ),
        ],
    };
    f.render_widget(
        Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title("Wallet")),
        chunks[1],
    );
}

fn render_audit(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Activity");
    if app.audit.is_empty() {
        f.render_widget(
            Paragraph::new("No activity recorded yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }
    let items: Vec<ListItem> = app
        .audit
        .entries()
        .iter()
        .rev()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.at.with_timezone(&Local).format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("[{}] ", entry.kind.label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(entry.message.clone()),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn render_placeholder(view: View, f: &mut Frame, area: Rect) {
    let title = view.placeholder_title().unwrap_or(view.label());
    let lines = vec![
        Line::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::styled("Coming soon.", Style::default().fg(Color::DarkGray)),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn message_lines(message: &ChatMessage, width: usize) -> Vec<Line<'static>> {
    let (label, color) = match message.role {
        ChatRole::User => ("You", Color::Green),
        ChatRole::Bot => ("Assistant", Color::Cyan),
        ChatRole::Approval => ("Approval", Color::Yellow),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(
            message.timestamp.with_timezone(&Local).format("  %H:%M").to_string(),
            Style::default().fg(Color::DarkGray),
        ),
    ])];
    lines.extend(
        wrap_text(&message.content, width.saturating_sub(2))
            .into_iter()
            .map(|text| Line::from(format!("  {text}"))),
    );
    if let Some(status) = message.approval {
        let (text, style) = match status {
            ApprovalStatus::Pending => (
                APPROVAL_KEYS,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            ApprovalStatus::Signing => ("Signing...", Style::default().fg(Color::Yellow)),
            ApprovalStatus::Approved => ("✔ Approved", Style::default().fg(Color::Green)),
            ApprovalStatus::Rejected => ("✘ Rejected", Style::default().fg(Color::Red)),
            ApprovalStatus::Failed => ("✘ Signing failed", Style::default().fg(Color::Red)),
        };
        lines.push(Line::styled(format!("  {text}"), style));
    }
    lines
}

fn render_chat(app: &App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let width = usize::from(chunks[0].width.saturating_sub(2));
    let height = usize::from(chunks[0].height.saturating_sub(2));
    let mut lines: Vec<Line> = app
        .chat
        .messages()
        .iter()
        .flat_map(|m| message_lines(m, width))
        .collect();
    if app.chat.is_waiting() {
        lines.push(Line::styled(
            "Thinking...",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ));
    }
    // newest lines stay visible
    let skip = lines.len().saturating_sub(height);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    f.render_widget(
        Paragraph::new(visible).block(Block::default().borders(Borders::ALL).title("AI Assistant")),
        chunks[0],
    );

    let (text, style, title) = match app.input_mode {
        InputMode::Editing => (
            format!("{}_", app.input),
            Style::default().fg(Color::Yellow),
            "Message [Enter to send]",
        ),
        InputMode::Normal if app.input.is_empty() => (
            INPUT_PLACEHOLDER.to_string(),
            Style::default().fg(Color::DarkGray),
            "Message [Tab to type]",
        ),
        InputMode::Normal => (
            app.input.clone(),
            Style::default(),
            "Message [Tab to type]",
        ),
    };
    f.render_widget(
        Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL).title(title)),
        chunks[1],
    );
}
