pub mod account;
pub mod store;

pub use account::{Account, AccountNumber, AccountView};
pub use store::AccountStore;
