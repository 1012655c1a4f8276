use log::{info, warn};
use rust_decimal::Decimal;

use crate::accounts::AccountNumber;
use crate::accounts::AccountStore;
use crate::accounts::store::lock_account;
use crate::error::{LedgerError, LedgerResult};

/// Balance-mutating operations over an `AccountStore`.
///
/// Every check runs before the first write, and each read-modify-write
/// happens while the affected account locks are held.
pub struct LedgerOperations<'a> {
    store: &'a AccountStore,
}

impl<'a> LedgerOperations<'a> {
    pub fn new(store: &'a AccountStore) -> Self {
        Self { store }
    }

    /// Add `amount` to the account and return the new balance.
    pub fn deposit(&self, number: AccountNumber, amount: Decimal) -> LedgerResult<Decimal> {
        let handle = self.store.require(number)?;
        ensure_positive(amount)?;

        let mut account = lock_account(&handle)?;
        let balance = checked_credit(account.balance, amount)?;
        account.balance = balance;

        info!("deposit {} into account {}, balance {}", amount, number, balance);
        Ok(balance)
    }

    /// Take `amount` out of the account and return the new balance.
    pub fn withdraw(&self, number: AccountNumber, amount: Decimal) -> LedgerResult<Decimal> {
        let handle = self.store.require(number)?;
        ensure_positive(amount)?;

        let mut account = lock_account(&handle)?;
        ensure_covered(amount, account.balance)?;
        account.balance -= amount;

        info!("withdraw {} from account {}, balance {}", amount, number, account.balance);
        Ok(account.balance)
    }

    /// Move `amount` from `sender` to `receiver`, returning both new balances
    /// as `(sender, receiver)`.
    ///
    /// Checks run in a fixed order: self transfer, amount, receiver exists,
    /// funds. Both account locks are taken in ascending account number so two
    /// opposite transfers cannot deadlock.
    pub fn transfer(
        &self,
        sender: AccountNumber,
        receiver: AccountNumber,
        amount: Decimal,
    ) -> LedgerResult<(Decimal, Decimal)> {
        let sender_handle = self.store.require(sender)?;

        if receiver == sender {
            warn!("account {} attempted a transfer to itself", sender);
            return Err(LedgerError::SelfTransfer);
        }
        ensure_positive(amount)?;
        let receiver_handle = self.store.require(receiver)?;

        let (mut from, mut to) = if sender < receiver {
            let from = lock_account(&sender_handle)?;
            let to = lock_account(&receiver_handle)?;
            (from, to)
        } else {
            let to = lock_account(&receiver_handle)?;
            let from = lock_account(&sender_handle)?;
            (from, to)
        };

        ensure_covered(amount, from.balance)?;
        let credited = checked_credit(to.balance, amount)?;
        from.balance -= amount;
        to.balance = credited;

        info!(
            "transfer {} from account {} to account {}, balances {} / {}",
            amount, sender, receiver, from.balance, to.balance
        );
        Ok((from.balance, to.balance))
    }
}

fn ensure_positive(amount: Decimal) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        warn!("rejected non-positive amount {}", amount);
        return Err(LedgerError::NonPositiveAmount(amount));
    }
    Ok(())
}

fn ensure_covered(requested: Decimal, available: Decimal) -> LedgerResult<()> {
    if requested > available {
        warn!("rejected {} against balance {}", requested, available);
        return Err(LedgerError::InsufficientFunds {
            requested,
            available,
        });
    }
    Ok(())
}

fn checked_credit(balance: Decimal, amount: Decimal) -> LedgerResult<Decimal> {
    balance
        .checked_add(amount)
        .ok_or_else(|| LedgerError::InvalidAmount(format!("{amount} overflows balance {balance}")))
}
