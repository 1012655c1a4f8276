use rust_decimal::Decimal;
use thiserror::Error;

use crate::accounts::AccountNumber;

/// Rejections raised while opening an account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("PIN must be exactly 4 digits")]
    MalformedPin,

    #[error("initial deposit cannot be negative: {0}")]
    NegativeDeposit(Decimal),

    #[error("invalid initial deposit: {0}")]
    InvalidDeposit(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error("incorrect PIN")]
    PinMismatch,
}

/// Every failure a ledger operation can report to its caller.
///
/// No operation mutates any balance before returning one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error("cannot transfer to the same account")]
    SelfTransfer,

    #[error("no account numbers left to assign")]
    NumbersExhausted,

    #[error("account lock poisoned")]
    LockPoisoned,
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::AccountNotFound(_) | LedgerError::Auth(AuthError::AccountNotFound(_))
        )
    }

    /// Both flavours of a bad transacted amount: unparsable or not above zero.
    pub fn is_amount_error(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAmount(_) | LedgerError::NonPositiveAmount(_)
        )
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, LedgerError::InsufficientFunds { .. })
    }
}
