use std::fmt;

/// Amounts are whole currency units (no minor units, no currency code).
/// The direction of a movement is carried by the transaction type, so stored
/// amounts are never negative. Derived values such as a balance can be.
pub type Amount = i64;

/// Largest amount a single transaction may carry. Sums over any realistic
/// number of records stay far from `i64::MAX`.
pub const MAX_AMOUNT: Amount = 1_000_000_000_000;

/// Parse user input into an amount.
/// Accepts plain digits with optional `,` thousands grouping.
/// Example: "1000" -> 1000, "1,000" -> 1000, " 25 " -> 25
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Empty);
    }
    if input.starts_with('-') {
        return Err(ParseAmountError::Negative);
    }

    let digits: String = input.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseAmountError::InvalidFormat);
    }

    let amount: Amount = digits.parse().map_err(|_| ParseAmountError::TooLarge)?;
    if amount > MAX_AMOUNT {
        return Err(ParseAmountError::TooLarge);
    }
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Empty,
    Negative,
    InvalidFormat,
    TooLarge,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Empty => write!(f, "amount is empty"),
            ParseAmountError::Negative => write!(f, "amount must not be negative"),
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
            ParseAmountError::TooLarge => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
