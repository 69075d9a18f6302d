//! Alert formatting
//!
//! Renders opportunities as Telegram-Markdown text. Amounts use a period as
//! decimal separator and commas between thousands (`$1,234,567.89`); the gain
//! is a percentage with two decimals, in bold.

use rust_decimal::{Decimal, RoundingStrategy};

use super::matcher::Opportunity;

/// Decimal places for amounts and percentages
const DISPLAY_DECIMALS: u32 = 2;

/// Text sent when a tick finds nothing (notify-when-empty mode)
pub const NO_OPPORTUNITIES_MESSAGE: &str = "No arbitrage opportunities found.";

/// One alert line for an opportunity
pub fn format_opportunity(opportunity: &Opportunity) -> String {
    format!(
        "Arbitrage opportunity: BUY {} on {} for ${} and SELL on {} for ${}. Estimated gain: *{}*",
        escape_markdown(&opportunity.asset),
        escape_markdown(&opportunity.buy_exchange.to_uppercase()),
        format_amount(opportunity.buy_cost),
        escape_markdown(&opportunity.sell_exchange.to_uppercase()),
        format_amount(opportunity.sell_proceeds),
        format_percent(opportunity.gain_ratio),
    )
}

/// Sentinel text for a tick without opportunities
pub fn format_none() -> String {
    NO_OPPORTUNITIES_MESSAGE.to_string()
}

/// `1234.5` -> `1,234.50`
pub fn format_amount(value: f64) -> String {
    match to_display_decimal(value) {
        Some(rounded) => group_thousands(&rounded.to_string()),
        None => format!("{:.2}", value),
    }
}

/// `0.1` -> `10.00%`
pub fn format_percent(ratio: f64) -> String {
    match to_display_decimal(ratio * 100.0) {
        Some(rounded) => format!("{}%", rounded),
        None => format!("{:.2}%", ratio * 100.0),
    }
}

/// Round half away from zero to two places, `None` for NaN/inf/out of range
fn to_display_decimal(value: f64) -> Option<Decimal> {
    let mut rounded = Decimal::from_f64_retain(value)?
        .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DISPLAY_DECIMALS);
    Some(rounded)
}

/// Insert commas into the integer part of a plain decimal string
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Escape characters that legacy Telegram Markdown treats as markup
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
