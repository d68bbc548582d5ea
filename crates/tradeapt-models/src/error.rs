//! Error types for the `tradeapt-models` crate.
//!
//! All fallible constructors and `FromStr` implementations in this crate
//! return variants of [`ModelError`].

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A wallet address was not `0x` followed by 1 to 64 hex digits.
    #[error("invalid wallet address \"{value}\": {reason}")]
    InvalidAddress {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// The requested network is not the supported test network.
    #[error("unsupported network \"{value}\": only devnet is available")]
    UnsupportedNetwork {
        /// The value that failed validation.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_address() {
        let err = ModelError::InvalidAddress {
            value: "0xZZ".into(),
            reason: "must contain only hex digits after 0x".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid wallet address \"0xZZ\": must contain only hex digits after 0x"
        );
    }

    #[test]
    fn error_display_network() {
        let err = ModelError::UnsupportedNetwork {
            value: "mainnet".into(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported network \"mainnet\": only devnet is available"
        );
    }
}
