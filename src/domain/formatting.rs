use chrono::NaiveDate;

use super::Amount;

/// Format an amount with `,` thousands grouping and no decimals.
/// Example: 1000 -> "1,000", -1234567 -> "-1,234,567"
pub fn format_currency(amount: Amount) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let digits = amount.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}", sign, grouped)
}

/// Like [`format_currency`] but positive values carry an explicit `+`.
pub fn format_signed_currency(amount: Amount) -> String {
    if amount > 0 {
        format!("+{}", format_currency(amount))
    } else {
        format_currency(amount)
    }
}

/// `YYYY-MM` key used for display and month matching.
pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
