//! Display formatting for mover fields
//!
//! All functions are total: non-finite input yields a neutral placeholder
//! instead of an error.

use crate::constants::{BILLION, MILLION, THOUSAND, TRILLION};

/// Suffix table, largest unit first
const UNITS: [(f64, &str); 4] = [
    (TRILLION, "T"),
    (BILLION, "B"),
    (MILLION, "M"),
    (THOUSAND, "K"),
];

/// Round half away from zero to `decimals` places
///
/// `format!("{:.1}")` rounds exact ties to even (3.25 → "3.2"); display
/// strings must round ties away from zero (3.25 → "3.3").
fn round_half_away(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Format a percent change: "+5.2%", "-3.3%", "0.0%" for zero or non-finite
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0.0%".to_string();
    }

    let rounded = round_half_away(value, 1);
    if value > 0.0 {
        format!("+{:.1}%", rounded)
    } else {
        format!("{:.1}%", rounded)
    }
}

/// Split a value into (scaled, suffix) using the largest unit where scaled >= 1
///
/// The scaled value comes back rounded to `decimals`. When rounding reaches
/// 1000 the next unit up is used instead (999.95K -> 1.0M).
fn scale(value: f64, decimals: i32) -> (f64, &'static str) {
    let magnitude = value.abs();
    let index = UNITS.iter().position(|(unit, _)| magnitude / unit >= 1.0);

    let (scaled, suffix) = match index {
        Some(i) => (round_half_away(value / UNITS[i].0, decimals), UNITS[i].1),
        None => (round_half_away(value, decimals), ""),
    };

    let next = match index {
        Some(0) => None,
        Some(i) => Some(UNITS[i - 1]),
        None => UNITS.last().copied(),
    };

    match next {
        Some((unit, next_suffix)) if scaled.abs() >= 1000.0 => {
            (round_half_away(value / unit, decimals), next_suffix)
        }
        _ => (scaled, suffix),
    }
}

/// Format a market cap: "$2.50T", "$812.00M", "N/A" when missing
pub fn format_market_cap(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let (scaled, suffix) = scale(v, 2);
            format!("${:.2}{}", scaled, suffix)
        }
        _ => "N/A".to_string(),
    }
}

/// Format a share volume: "1.2M", "850", "3.4B"
pub fn format_volume(volume: u64) -> String {
    let (scaled, suffix) = scale(volume as f64, 1);
    if suffix.is_empty() {
        volume.to_string()
    } else {
        format!("{:.1}{}", scaled, suffix)
    }
}

/// Format a price with two decimals: "$189.84"
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "N/A".to_string();
    }
    format!("${:.2}", round_half_away(price, 2))
}
