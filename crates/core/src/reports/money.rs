use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::MONEY_SCALE;

/// Brazilian currency notation: `R$ 1.234,56`.
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    format!("R$ {sign}{},{fraction}", group_thousands(integer))
}

/// Interest rate as stored, with a percent sign: `0.5%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", rate.normalize())
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}
