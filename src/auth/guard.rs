use log::{info, warn};

use crate::accounts::store::lock_account;
use crate::accounts::{AccountNumber, AccountStore, AccountView};
use crate::error::{AuthError, LedgerResult};

/// Checks an account number + PIN pair. Holds no state of its own; keeping
/// the caller logged in between requests is the caller's business.
pub struct AuthGuard<'a> {
    store: &'a AccountStore,
}

impl<'a> AuthGuard<'a> {
    pub fn new(store: &'a AccountStore) -> Self {
        Self { store }
    }

    /// On success returns the authenticated account, whose `number` the
    /// caller keeps as its session identity.
    pub fn verify(&self, number: AccountNumber, pin: &str) -> LedgerResult<AccountView> {
        let Some(handle) = self.store.handle(number)? else {
            warn!("login rejected: account {} not found", number);
            return Err(AuthError::AccountNotFound(number).into());
        };

        let account = lock_account(&handle)?;
        if !account.pin_matches(pin) {
            warn!("login rejected: wrong PIN for account {}", number);
            return Err(AuthError::PinMismatch.into());
        }

        info!("account {} authenticated", number);
        Ok(account.view())
    }
}
