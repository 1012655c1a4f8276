pub mod amount;

pub use amount::{MINOR_UNITS, format_money, parse_amount};
