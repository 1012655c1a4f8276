use rust_decimal::Decimal;

/// Fractional digits every amount and balance is kept to.
pub const MINOR_UNITS: u32 = 2;

/// Parse a user supplied amount into a fixed-point decimal.
///
/// Accepts an optional sign and a plain decimal literal with at most
/// `MINOR_UNITS` significant fractional digits. The sign is not checked
/// here; callers decide whether zero or negative values are acceptable.
/// On failure the error carries the offending input.
pub fn parse_amount(input: &str) -> Result<Decimal, String> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);

    if digits.is_empty()
        || !digits.chars().any(|c| c.is_ascii_digit())
        || !digits.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return Err(trimmed.to_string());
    }

    // Count on the raw text: "1.50" is fine, "1.505" is not representable
    // in minor units, however many digits follow.
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let fraction = fraction.trim_end_matches('0');
    if fraction.len() > MINOR_UNITS as usize {
        return Err(trimmed.to_string());
    }

    let sign = if trimmed.starts_with('-') { "-" } else { "" };
    let canonical = if fraction.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{fraction}")
    };

    // Exact parsing refuses anything that would need rounding
    Decimal::from_str_exact(&canonical).map_err(|_| trimmed.to_string())
}

/// Render an amount the way balances are shown to users, e.g. `PKR 150.00`.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    format!("{} {:.2}", currency, amount.round_dp(MINOR_UNITS))
}
