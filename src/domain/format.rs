//! Formatting helpers for the presentation layer.

use chrono::NaiveDate;

/// Today's date in the user's local calendar.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Format an amount for display: thousands separators, at most two decimal
/// places, none when the amount is whole.
pub fn format_money(amount: f64) -> String {
    let total_cents = (amount * 100.0).round() as i64;
    let negative = total_cents < 0;
    let cents = (total_cents.abs() % 100) as u8;
    let whole = total_cents.abs() / 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    match cents {
        0 => format!("{}{}", sign, grouped),
        c if c % 10 == 0 => format!("{}{}.{}", sign, grouped, c / 10),
        c => format!("{}{}.{:02}", sign, grouped, c),
    }
}
