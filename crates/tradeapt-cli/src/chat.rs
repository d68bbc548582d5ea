//! Chat log and the approve / reject flow.
//!
//! User text goes to the parsing backend verbatim. A reply with an intent
//! adds a bot summary and exactly one approval prompt. Approving hands the
//! intent to the signer; only a `Pending` prompt can be approved or
//! rejected, so each prompt is acted on at most once.

use chrono::{DateTime, Utc};
use tradeapt_models::{ParseResponse, TradeIntent};
use tradeapt_sdk::SignOutcome;
use uuid::Uuid;

pub const GREETING: &str =
    "Ask me to analyze your portfolio, find a stock, or summarize today's audit logs.";
pub const PARSE_FALLBACK: &str =
    "I couldn't understand that request. Try something like \"buy $20 APT if price drops to $7\".";
pub const BACKEND_UNREACHABLE: &str =
    "Sorry, I'm having trouble connecting to the backend. Make sure the server is running.";
pub const TRADE_REJECTED: &str = "Trade rejected. Nothing was signed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    Bot,
    User,
    Approval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStatus {
    Pending,
    Signing,
    Approved,
    Rejected,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub intent: Option<TradeIntent>,
    pub approval: Option<ApprovalStatus>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            intent: None,
            approval: None,
            timestamp: Utc::now(),
        }
    }

    fn approval(intent: TradeIntent) -> Self {
        let mut message = Self::new(ChatRole::Approval, format!("Execute {}?", intent.headline()));
        message.intent = Some(intent);
        message.approval = Some(ApprovalStatus::Pending);
        message
    }
}

#[derive(Debug, Clone)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
    waiting: bool,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::new(ChatRole::Bot, GREETING.to_string())],
            waiting: false,
        }
    }
}

impl ChatLog {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// `true` while a parse request is in flight.
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Record user input. Returns the text to send, or `None` for blank input.
    pub fn submit(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.messages
            .push(ChatMessage::new(ChatRole::User, text.to_string()));
        self.waiting = true;
        Some(text.to_string())
    }

    /// Fold the backend reply (or a transport error) into the log.
    pub fn apply_parse_result(&mut self, result: Result<ParseResponse, String>) {
        self.waiting = false;
        let response = match result {
            Ok(response) => response,
            Err(_) => {
                self.post_bot(BACKEND_UNREACHABLE);
                return;
            }
        };
        match response.intent().cloned() {
            Some(intent) => {
                let reply = response.message.unwrap_or_else(|| intent.summary());
                self.post_bot(reply);
                self.messages.push(ChatMessage::approval(intent));
            }
            None => {
                let reply = response.error.unwrap_or_else(|| PARSE_FALLBACK.to_string());
                self.post_bot(reply);
            }
        }
    }

    pub fn post_bot(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(ChatRole::Bot, text.into()));
    }

    /// Most recent prompt still waiting for a decision.
    pub fn latest_pending(&self) -> Option<Uuid> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.approval == Some(ApprovalStatus::Pending))
            .map(|m| m.id)
    }

    pub fn pending_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.approval == Some(ApprovalStatus::Pending))
            .count()
    }

    /// Start signing prompt `id`. Returns its intent, or `None` if the
    /// prompt is not pending.
    pub fn approve(&mut self, id: Uuid) -> Option<TradeIntent> {
        let message = self.pending_mut(id)?;
        message.approval = Some(ApprovalStatus::Signing);
        message.intent.clone()
    }

    /// Reject prompt `id`. Returns `false` if it was not pending.
    pub fn reject(&mut self, id: Uuid) -> bool {
        let Some(message) = self.pending_mut(id) else {
            return false;
        };
        message.approval = Some(ApprovalStatus::Rejected);
        self.post_bot(TRADE_REJECTED);
        true
    }

    /// Record the signer's answer for prompt `id`.
    pub fn finish_approval(&mut self, id: Uuid, result: Result<SignOutcome, String>) {
        let Some(message) = self
            .messages
            .iter_mut()
            .find(|m| m.id == id && m.approval == Some(ApprovalStatus::Signing))
        else {
            return;
        };
        match result {
            Ok(outcome) => {
                message.approval = Some(ApprovalStatus::Approved);
                let note = if outcome.simulated {
                    " (simulated, no transaction was submitted)"
                } else {
                    ""
                };
                self.post_bot(format!("Trade approved: {}{note}", outcome.summary));
            }
            Err(error) => {
                message.approval = Some(ApprovalStatus::Failed);
                self.post_bot(format!("Signing failed: {error}"));
            }
        }
    }

    fn pending_mut(&mut self, id: Uuid) -> Option<&mut ChatMessage> {
        self.messages
            .iter_mut()
            .find(|m| m.id == id && m.approval == Some(ApprovalStatus::Pending))
    }
}
