use std::fmt;

use wot_core::Identifier;
use wot_query::Paths;

/// A (certificate, user-id) pair together with the evidence found for it.
#[derive(Debug, Clone)]
pub struct Binding {
    pub fingerprint: Identifier,
    pub user_id: String,
    pub paths: Paths,
}

impl Binding {
    pub fn new(fingerprint: Identifier, user_id: impl Into<String>, paths: Paths) -> Self {
        Self {
            fingerprint,
            user_id: user_id.into(),
            paths,
        }
    }

    /// Combined trust amount of all paths.
    pub fn amount(&self) -> u32 {
        self.paths.amount()
    }

    /// Authentication level relative to `required_amount`; 100 means the
    /// binding is exactly fully authenticated.
    pub fn percentage(&self, required_amount: u32) -> u32 {
        if required_amount == 0 {
            return 100;
        }
        self.amount() * 100 / required_amount
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}: amount {}", self.fingerprint, self.user_id, self.amount())
    }
}

/// Outcome of authenticating a single binding.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    pub binding: Binding,
    pub required_amount: u32,
}

impl AuthenticationResult {
    pub fn is_acceptable(&self) -> bool {
        self.binding.amount() >= self.required_amount
    }

    pub fn percentage(&self) -> u32 {
        self.binding.percentage(self.required_amount)
    }
}
