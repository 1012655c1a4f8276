use std::env;

pub const DEFAULT_CURRENCY: &str = "PKR";

/// Environment variable overriding the currency label shown with amounts.
pub const CURRENCY_ENV: &str = "LEDGER_CURRENCY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub currency: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup; blank values fall back
    /// to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(currency) = lookup(CURRENCY_ENV) {
            let currency = currency.trim();
            if !currency.is_empty() {
                config.currency = currency.to_uppercase();
            }
        }
        config
    }
}
