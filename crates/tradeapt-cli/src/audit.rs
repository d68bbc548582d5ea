//! In-memory activity log behind the "Audit & Compliance Logs" view.
//!
//! Append-only for the lifetime of the process; nothing is written to disk.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditKind {
    Wallet,
    Faucet,
    Trade,
}

impl AuditKind {
    pub fn label(self) -> &'static str {
        match self {
            AuditKind::Wallet => "WALLET",
            AuditKind::Faucet => "FAUCET",
            AuditKind::Trade => "TRADE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub at: DateTime<Utc>,
    pub kind: AuditKind,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn record(&mut self, kind: AuditKind, message: impl Into<String>) {
        self.entries.push(AuditEntry {
            at: Utc::now(),
            kind,
            message: message.into(),
        });
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_appended_in_order() {
        let mut log = AuditLog::default();
        assert!(log.is_empty());

        log.record(AuditKind::Wallet, "connected");
        log.record(AuditKind::Trade, "rejected");

        let kinds: Vec<AuditKind> = log.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [AuditKind::Wallet, AuditKind::Trade]);
        assert!(log.entries()[0].at <= log.entries()[1].at);
        assert_eq!(AuditKind::Faucet.label(), "FAUCET");
    }
}
