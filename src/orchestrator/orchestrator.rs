use std::error::Error;
use std::fs::File;
use std::io::{self, Read, Write};

use csv::{ReaderBuilder, Writer};
use log::{info, warn};
use rust_decimal::Decimal;

use crate::accounts::AccountNumber;
use crate::config::LedgerConfig;
use crate::engine::BankEngine;
use crate::error::{AuthError, LedgerError, ValidationError};
use crate::money::{MINOR_UNITS, format_money, parse_amount};
use crate::transactions::{CommandRecord, CommandType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackLevel {
    Success,
    Error,
}

/// User-facing outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub level: FeedbackLevel,
    pub message: String,
}

impl Feedback {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Error,
            message: message.into(),
        }
    }
}

/// Drives a `BankEngine` the way an interactive front end would: it keeps
/// the logged-in account between commands, refuses account commands while
/// nobody is logged in, and turns ledger errors into messages.
pub struct Session<'a> {
    engine: &'a BankEngine,
    config: &'a LedgerConfig,
    current: Option<AccountNumber>,
}

impl<'a> Session<'a> {
    pub fn new(engine: &'a BankEngine, config: &'a LedgerConfig) -> Self {
        Self {
            engine,
            config,
            current: None,
        }
    }

    pub fn current_account(&self) -> Option<AccountNumber> {
        self.current
    }

    pub fn handle(&mut self, record: CommandRecord) -> Feedback {
        let feedback = match record.cmd_type {
            CommandType::Create => self.create(&record),
            CommandType::Login => self.login(&record),
            CommandType::Logout => {
                self.current = None;
                Feedback::success("Logged out successfully!")
            }
            CommandType::View | CommandType::Deposit | CommandType::Withdraw | CommandType::Transfer => {
                match self.current {
                    Some(number) => self.account_command(number, &record),
                    None => Feedback::error("Please login first!"),
                }
            }
        };

        match feedback.level {
            FeedbackLevel::Success => info!("{:?}: {}", record.cmd_type, feedback.message),
            FeedbackLevel::Error => warn!("{:?}: {}", record.cmd_type, feedback.message),
        }
        feedback
    }

    fn create(&self, record: &CommandRecord) -> Feedback {
        let result = self.engine.create_account(
            cell(&record.name),
            cell(&record.pin),
            cell(&record.amount),
        );
        match result {
            Ok(number) => Feedback::success(format!(
                "Account created successfully! Your account number is: {}",
                number
            )),
            Err(err) => self.describe(&err, None),
        }
    }

    fn login(&mut self, record: &CommandRecord) -> Feedback {
        let Some(number) = parse_number(&record.account) else {
            return Feedback::error("Invalid account number!");
        };

        let result = self
            .engine
            .authenticate(number, cell(&record.pin).trim())
            .and_then(|number| self.engine.get_account_view(number));
        match result {
            Ok(account) => {
                self.current = Some(account.number);
                Feedback::success(format!("Welcome back, {}!", account.name))
            }
            Err(err) => self.describe(&err, None),
        }
    }

    fn account_command(&self, number: AccountNumber, record: &CommandRecord) -> Feedback {
        let amount = cell(&record.amount);
        let currency = &self.config.currency;

        match record.cmd_type {
            CommandType::Deposit => match self.engine.deposit(number, amount) {
                Ok(_) => Feedback::success(format!(
                    "Successfully deposited {}",
                    format_money(echoed(amount), currency)
                )),
                Err(err) => self.describe(&err, None),
            },
            CommandType::Withdraw => match self.engine.withdraw(number, amount) {
                Ok(_) => Feedback::success(format!(
                    "Successfully withdrawn {}",
                    format_money(echoed(amount), currency)
                )),
                Err(err) => self.describe(&err, None),
            },
            CommandType::Transfer => {
                let Some(receiver) = parse_number(&record.receiver) else {
                    return Feedback::error("Invalid input!");
                };
                let result = self
                    .engine
                    .transfer(number, receiver, amount)
                    .and_then(|_| self.engine.get_account_view(receiver));
                match result {
                    Ok(receiver) => Feedback::success(format!(
                        "Successfully transferred {} to {}",
                        format_money(echoed(amount), currency),
                        receiver.name
                    )),
                    // Unparsable input in a transfer is reported as a whole
                    Err(LedgerError::InvalidAmount(_)) => Feedback::error("Invalid input!"),
                    Err(err) => self.describe(&err, Some(receiver)),
                }
            }
            _ => match self.engine.get_account_view(number) {
                Ok(account) => Feedback::success(format!(
                    "{} (#{}): {}",
                    account.name,
                    account.number,
                    format_money(account.balance, currency)
                )),
                Err(err) => self.describe(&err, None),
            },
        }
    }

    fn describe(&self, err: &LedgerError, receiver: Option<AccountNumber>) -> Feedback {
        let message = match err {
            LedgerError::Validation(ValidationError::EmptyName) => "Name cannot be empty!".to_string(),
            LedgerError::Validation(ValidationError::MalformedPin) => {
                "PIN must be exactly 4 digits!".to_string()
            }
            LedgerError::Validation(ValidationError::NegativeDeposit(_)) => {
                "Initial deposit cannot be negative!".to_string()
            }
            LedgerError::Validation(ValidationError::InvalidDeposit(_))
            | LedgerError::InvalidAmount(_) => "Invalid amount!".to_string(),
            LedgerError::Auth(AuthError::AccountNotFound(_)) => "Account not found!".to_string(),
            LedgerError::Auth(AuthError::PinMismatch) => "Incorrect PIN!".to_string(),
            LedgerError::NonPositiveAmount(_) => "Amount must be positive!".to_string(),
            LedgerError::InsufficientFunds { available, .. } => format!(
                "Not enough balance! Current balance: {}",
                format_money(*available, &self.config.currency)
            ),
            LedgerError::AccountNotFound(number) if Some(*number) == receiver => {
                "Receiver account not found!".to_string()
            }
            LedgerError::AccountNotFound(_) => "Account not found!".to_string(),
            LedgerError::SelfTransfer => "Cannot transfer to your own account!".to_string(),
            LedgerError::NumbersExhausted => "Cannot open any more accounts!".to_string(),
            LedgerError::LockPoisoned => "Ledger unavailable, please try again later!".to_string(),
        };
        Feedback::error(message)
    }
}

/// Re-parse an amount the ledger already accepted, for display.
fn echoed(amount: &str) -> Decimal {
    parse_amount(amount).unwrap_or_default()
}

/// An empty cell is an empty form field, not a default value.
fn cell(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn parse_number(value: &Option<String>) -> Option<AccountNumber> {
    cell(value).trim().parse().ok()
}

/// Apply every command row from `reader` in order, returning the feedback
/// for each one.
pub fn replay<R: Read>(
    engine: &BankEngine,
    config: &LedgerConfig,
    reader: R,
) -> Result<Vec<Feedback>, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut session = Session::new(engine, config);
    let mut feedback = Vec::new();

    for result in rdr.deserialize() {
        let record: CommandRecord = result?;
        feedback.push(session.handle(record));
    }

    Ok(feedback)
}

/// Write every account as `number,name,balance` CSV.
pub fn write_accounts<W: Write>(engine: &BankEngine, writer: W) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["number", "name", "balance"])?;

    for account in engine.accounts()? {
        wtr.serialize((
            account.number,
            account.name,
            format!("{:.2}", account.balance.round_dp(MINOR_UNITS)),
        ))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn run(filename: &str, config: &LedgerConfig) -> Result<(), Box<dyn Error>> {
    let file = File::open(filename)?;
    let engine = BankEngine::new();

    let feedback = replay(&engine, config, file)?;
    let failed = feedback
        .iter()
        .filter(|f| f.level == FeedbackLevel::Error)
        .count();
    info!("replayed {} commands, {} rejected", feedback.len(), failed);

    write_accounts(&engine, io::stdout())
}
