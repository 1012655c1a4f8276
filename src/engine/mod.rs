pub mod engine;
pub mod operations;

pub use engine::BankEngine;
pub use operations::LedgerOperations;
