pub mod accounts;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod money;
pub mod orchestrator;
pub mod transactions;

pub use accounts::{AccountNumber, AccountStore, AccountView};
pub use auth::AuthGuard;
pub use config::LedgerConfig;
pub use engine::{BankEngine, LedgerOperations};
pub use error::{AuthError, LedgerError, LedgerResult, ValidationError};
pub use orchestrator::run;
pub use transactions::CommandRecord;
