//! Recipient address derivation.
//!
//! Display names map to mailbox addresses by a fixed rule: lower-case the
//! whitespace-separated tokens, join them with a separator and append the
//! configured domain. Nothing is looked up; the same name always yields the
//! same address.

/// Derives mailbox addresses from human-readable recipient names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPolicy {
    domain: String,
    separator: String,
}

impl AddressPolicy {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            separator: ".".to_string(),
        }
    }

    /// Overrides the token separator (defaults to `.`).
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the address for `name`, or `None` when the name has no tokens.
    pub fn address_for(&self, name: &str) -> Option<String> {
        let tokens: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return None;
        }
        Some(format!("{}@{}", tokens.join(&self.separator), self.domain))
    }
}
