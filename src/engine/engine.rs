use log::debug;
use rust_decimal::Decimal;

use crate::accounts::{AccountNumber, AccountStore, AccountView};
use crate::auth::AuthGuard;
use crate::engine::operations::LedgerOperations;
use crate::error::{LedgerError, LedgerResult};
use crate::money::parse_amount;

/// The ledger as seen from outside: string inputs in, balances or errors out.
///
/// Owns the only `AccountStore`; callers never get a mutable reference to
/// any account. Safe to share between threads.
#[derive(Debug, Default)]
pub struct BankEngine {
    store: AccountStore,
}

impl BankEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_account(
        &self,
        name: &str,
        pin: &str,
        initial_deposit: &str,
    ) -> LedgerResult<AccountNumber> {
        let account = self.store.create_account(name, pin, initial_deposit)?;
        Ok(account.number)
    }

    pub fn authenticate(&self, number: AccountNumber, pin: &str) -> LedgerResult<AccountNumber> {
        let account = AuthGuard::new(&self.store).verify(number, pin)?;
        Ok(account.number)
    }

    pub fn get_account_view(&self, number: AccountNumber) -> LedgerResult<AccountView> {
        self.store
            .find_account(number)?
            .ok_or(LedgerError::AccountNotFound(number))
    }

    pub fn deposit(&self, number: AccountNumber, amount: &str) -> LedgerResult<Decimal> {
        let amount = transacted_amount(amount)?;
        self.operations().deposit(number, amount)
    }

    pub fn withdraw(&self, number: AccountNumber, amount: &str) -> LedgerResult<Decimal> {
        let amount = transacted_amount(amount)?;
        self.operations().withdraw(number, amount)
    }

    pub fn transfer(
        &self,
        number: AccountNumber,
        receiver: AccountNumber,
        amount: &str,
    ) -> LedgerResult<(Decimal, Decimal)> {
        let amount = transacted_amount(amount)?;
        self.operations().transfer(number, receiver, amount)
    }

    /// All accounts in number order.
    pub fn accounts(&self) -> LedgerResult<Vec<AccountView>> {
        self.store.snapshot_all()
    }

    pub fn total_balance(&self) -> LedgerResult<Decimal> {
        self.store.total_balance()
    }

    fn operations(&self) -> LedgerOperations<'_> {
        LedgerOperations::new(&self.store)
    }
}

fn transacted_amount(input: &str) -> LedgerResult<Decimal> {
    parse_amount(input).map_err(|raw| {
        debug!("unparsable amount {:?}", raw);
        LedgerError::InvalidAmount(raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, ValidationError};
    use rust_decimal_macros::dec;

    fn balances(engine: &BankEngine) -> Vec<Decimal> {
        engine.accounts().unwrap().iter().map(|v| v.balance).collect()
    }

    /// Alice (#1, 100) and Bob (#2, 0).
    fn engine() -> BankEngine {
        let engine = BankEngine::new();
        assert_eq!(engine.create_account("Alice", "1234", "100"), Ok(1));
        assert_eq!(engine.create_account("Bob", "5678", "0"), Ok(2));
        engine
    }

    #[test]
    fn test_walkthrough() {
        let engine = engine();
        assert_eq!(engine.get_account_view(1).unwrap().balance, dec!(100.00));
        assert_eq!(engine.get_account_view(2).unwrap().balance, dec!(0.00));

        assert_eq!(engine.deposit(1, "50"), Ok(dec!(150.00)));

        assert!(engine.withdraw(1, "200").unwrap_err().is_insufficient_funds());
        assert_eq!(engine.get_account_view(1).unwrap().balance, dec!(150.00));

        assert_eq!(engine.transfer(1, 2, "50"), Ok((dec!(100.00), dec!(50.00))));

        assert_eq!(engine.transfer(1, 1, "10"), Err(LedgerError::SelfTransfer));
        assert_eq!(balances(&engine), vec![dec!(100), dec!(50)]);
    }

    #[test]
    fn test_authenticate() {
        let engine = engine();
        assert_eq!(engine.authenticate(2, "5678"), Ok(2));
        assert_eq!(
            engine.authenticate(2, "1234"),
            Err(AuthError::PinMismatch.into())
        );
        assert_eq!(
            engine.authenticate(3, "1234"),
            Err(AuthError::AccountNotFound(3).into())
        );
    }

    #[test]
    fn test_get_account_view_unknown() {
        let engine = engine();
        assert_eq!(engine.get_account_view(3), Err(LedgerError::AccountNotFound(3)));
    }

    #[test]
    fn test_create_account_validation() {
        let engine = engine();
        assert_eq!(
            engine.create_account("Carol", "12345", "10"),
            Err(ValidationError::MalformedPin.into())
        );
        assert_eq!(engine.create_account("Carol", "4321", "10.25"), Ok(3));
    }

    #[test]
    fn test_rejected_operations_leave_balances_untouched() {
        let engine = engine();
        let before = balances(&engine);

        let rejected = [
            engine.deposit(1, "0"),
            engine.deposit(1, "-3"),
            engine.deposit(1, "abc"),
            engine.deposit(1, "0.001"),
            engine.deposit(1, "1.00000000000000000000000000001"),
            engine.deposit(7, "5"),
            engine.withdraw(2, "0.01"),
            engine.withdraw(1, ""),
        ];
        assert!(rejected.iter().all(|r| r.is_err()));

        assert!(engine.transfer(1, 1, "10").is_err());
        assert!(engine.transfer(1, 2, "-10").is_err());
        assert!(engine.transfer(1, 3, "10").unwrap_err().is_not_found());
        assert!(engine.transfer(2, 1, "10").unwrap_err().is_insufficient_funds());

        assert_eq!(balances(&engine), before);
    }

    #[test]
    fn test_transfers_conserve_total() {
        let engine = engine();
        engine.create_account("Carol", "0000", "25.50").unwrap();
        let total = engine.total_balance().unwrap();

        for (from, to, amount) in [(1, 2, "10"), (2, 3, "5.25"), (3, 1, "30"), (1, 3, "0.75"), (2, 1, "99")] {
            let _ = engine.transfer(from, to, amount);
            assert_eq!(engine.total_balance().unwrap(), total);
        }
        assert!(balances(&engine).iter().all(|b| *b >= Decimal::ZERO));
    }

    #[test]
    fn test_deposit_and_withdraw_move_total_by_amount() {
        let engine = engine();
        let total = engine.total_balance().unwrap();

        engine.deposit(2, "12.34").unwrap();
        assert_eq!(engine.total_balance().unwrap(), total + dec!(12.34));

        engine.withdraw(1, "2.34").unwrap();
        assert_eq!(engine.total_balance().unwrap(), total + dec!(10));
    }

    #[test]
    fn test_concurrent_deposits() {
        let engine = engine();
        std::thread::scope(|s| {
            for _ in 0..100 {
                let engine = &engine;
                s.spawn(move || {
                    engine.deposit(1, "1").unwrap();
                });
            }
        });
        assert_eq!(engine.get_account_view(1).unwrap().balance, dec!(200.00));
    }

    #[test]
    fn test_total_is_stable_while_transfers_run() {
        let engine = engine();
        engine.create_account("Carol", "0000", "60").unwrap();
        let total = engine.total_balance().unwrap();

        std::thread::scope(|s| {
            for i in 0..90u32 {
                let engine = &engine;
                s.spawn(move || {
                    let from = i % 3 + 1;
                    let to = (i + 1) % 3 + 1;
                    let _ = engine.transfer(from, to, "2.50");
                });
            }
            for _ in 0..4 {
                let engine = &engine;
                s.spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(engine.total_balance().unwrap(), total);
                    }
                });
            }
        });

        assert_eq!(engine.total_balance().unwrap(), total);
    }

    #[test]
    fn test_concurrent_mixed_traffic_never_goes_negative() {
        let engine = engine();
        std::thread::scope(|s| {
            for i in 0..60 {
                let engine = &engine;
                s.spawn(move || match i % 3 {
                    0 => {
                        let _ = engine.withdraw(1, "7");
                    }
                    1 => {
                        let _ = engine.transfer(1, 2, "5");
                    }
                    _ => {
                        let _ = engine.transfer(2, 1, "3");
                    }
                });
            }
        });

        let views = engine.accounts().unwrap();
        assert!(views.iter().all(|v| v.balance >= Decimal::ZERO));
        // Only withdrawals leave the store; each one takes exactly 7.
        let withdrawn = dec!(100) - engine.total_balance().unwrap();
        assert_eq!(withdrawn % dec!(7), Decimal::ZERO);
    }
}
