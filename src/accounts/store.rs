use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::accounts::account::{Account, AccountNumber, AccountView, validate_name, validate_pin};
use crate::error::{LedgerError, LedgerResult, ValidationError};
use crate::money::parse_amount;

pub(crate) type AccountHandle = Arc<Mutex<Account>>;

/// Owns every account for the lifetime of the process.
///
/// The list itself sits behind a store-wide `RwLock`; each account has its
/// own `Mutex` so balance updates on different accounts do not contend.
/// Accounts are only ever appended, so account `n` always lives at index
/// `n - 1` and a handle stays valid once handed out.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: RwLock<Vec<AccountHandle>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and open a new account, assigning the next sequential number.
    ///
    /// Name, PIN and initial deposit are all checked before the store is
    /// touched; the first failing check is returned.
    pub fn create_account(
        &self,
        name: &str,
        pin: &str,
        initial_deposit: &str,
    ) -> LedgerResult<AccountView> {
        let name = validate_name(name)?;
        let pin = validate_pin(pin)?;
        let balance = parse_amount(initial_deposit).map_err(ValidationError::InvalidDeposit)?;
        if balance.is_sign_negative() && !balance.is_zero() {
            return Err(ValidationError::NegativeDeposit(balance).into());
        }

        // Holding the write lock makes reading the count and appending one step.
        let mut accounts = self.accounts.write().map_err(|_| LedgerError::LockPoisoned)?;
        let number = next_number(accounts.len())?;
        let account = Account::new(number, name, pin, balance.abs());
        let view = account.view();
        accounts.push(Arc::new(Mutex::new(account)));

        info!("opened account {} for {} with balance {}", number, view.name, view.balance);
        Ok(view)
    }

    /// Consistent snapshot of one account, or `None` if the number is unknown.
    pub fn find_account(&self, number: AccountNumber) -> LedgerResult<Option<AccountView>> {
        let view = match self.handle(number)? {
            Some(handle) => {
                let account = lock_account(&handle)?;
                Some(account.view())
            }
            None => None,
        };
        debug!("lookup account {}: found={}", number, view.is_some());
        Ok(view)
    }

    /// Snapshots of all accounts, in account-number order.
    ///
    /// Every account lock is held at once, taken in ascending number like a
    /// transfer takes its pair, so no transfer is seen half applied.
    pub fn snapshot_all(&self) -> LedgerResult<Vec<AccountView>> {
        let accounts = self.accounts.read().map_err(|_| LedgerError::LockPoisoned)?;
        let guards = accounts
            .iter()
            .map(lock_account)
            .collect::<LedgerResult<Vec<_>>>()?;
        Ok(guards.iter().map(|acc| acc.view()).collect())
    }

    pub fn len(&self) -> LedgerResult<usize> {
        Ok(self.accounts.read().map_err(|_| LedgerError::LockPoisoned)?.len())
    }

    pub fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Sum of every balance in the store, from one consistent snapshot.
    pub fn total_balance(&self) -> LedgerResult<Decimal> {
        Ok(self.snapshot_all()?.iter().map(|view| view.balance).sum())
    }

    pub(crate) fn handle(&self, number: AccountNumber) -> LedgerResult<Option<AccountHandle>> {
        let accounts = self.accounts.read().map_err(|_| LedgerError::LockPoisoned)?;
        let handle = number
            .checked_sub(1)
            .and_then(|idx| accounts.get(idx as usize))
            .cloned();
        Ok(handle)
    }

    /// Like `handle`, but an unknown number is an error.
    pub(crate) fn require(&self, number: AccountNumber) -> LedgerResult<AccountHandle> {
        self.handle(number)?.ok_or_else(|| {
            warn!("account {} not found", number);
            LedgerError::AccountNotFound(number)
        })
    }
}

/// Number for the account created after `count` existing ones.
fn next_number(count: usize) -> LedgerResult<AccountNumber> {
    AccountNumber::try_from(count)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or(LedgerError::NumbersExhausted)
}

pub(crate) fn lock_account(handle: &AccountHandle) -> LedgerResult<MutexGuard<'_, Account>> {
    handle.lock().map_err(|_| LedgerError::LockPoisoned)
}
