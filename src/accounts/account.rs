use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::ValidationError;

pub type AccountNumber = u32;

pub const PIN_LENGTH: usize = 4;

#[derive(Debug, Clone)]
pub struct Account {
    pub number: AccountNumber,
    pub name: String,
    pin: String,
    pub balance: Decimal,
}

/// Read-only copy of an account's public fields, taken under its lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView {
    pub number: AccountNumber,
    pub name: String,
    pub balance: Decimal,
}

impl Account {
    pub(crate) fn new(number: AccountNumber, name: String, pin: String, balance: Decimal) -> Self {
        Self {
            number,
            name,
            pin,
            balance,
        }
    }

    /// Exact string comparison against the stored PIN.
    pub fn pin_matches(&self, candidate: &str) -> bool {
        self.pin == candidate
    }

    pub fn view(&self) -> AccountView {
        AccountView {
            number: self.number,
            name: self.name.clone(),
            balance: self.balance,
        }
    }
}

/// Trim the display name and reject it when nothing is left.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// A PIN is exactly four ASCII digits. Surrounding whitespace is ignored.
pub fn validate_pin(pin: &str) -> Result<String, ValidationError> {
    let trimmed = pin.trim();
    if trimmed.len() != PIN_LENGTH || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::MalformedPin);
    }
    Ok(trimmed.to_string())
}
