/// Numeric parsing and dynamic-precision helpers
///
/// Exchange rates and converted costs get a display precision derived
/// from their own magnitude: very small values keep more fraction
/// digits, capped at 10.

use crate::types::Cell;

/// Maximum decimal places ever used for display/rounding
const MAX_PRECISION: usize = 10;

/// Count the consecutive zero fraction digits before the first nonzero
/// digit. Returns 0 for zero and for any value with |x| >= 1.
///
/// 0.0034 -> 2, 0.00042 -> 3, 1.5 -> 0
pub fn leading_fraction_zero_count(x: f64) -> usize {
    if x == 0.0 {
        return 0;
    }
    let mut v = x.abs();
    let mut zeros = 0;
    while v < 1.0 {
        v *= 10.0;
        if v.trunc() == 0.0 {
            zeros += 1;
        } else {
            break;
        }
    }
    zeros
}

/// Decimal places to use when rounding and formatting `x`
pub fn display_precision(x: f64) -> usize {
    (leading_fraction_zero_count(x) + 2).min(MAX_PRECISION)
}

/// Round to a fixed number of decimal places
pub fn round_to(x: f64, places: usize) -> f64 {
    let factor = 10f64.powi(places as i32);
    (x * factor).round() / factor
}

/// Parse a percentage string like "80%" into a fraction (0.8).
/// Empty or unparsable input yields 0.0.
pub fn parse_split_rate(value: &str) -> f64 {
    let cleaned = value.replace('%', "");
    match cleaned.trim().parse::<f64>() {
        Ok(n) => n / 100.0,
        Err(_) => 0.0,
    }
}

/// Read a numeric amount out of a cell, stripping thousands separators
/// from text cells. Null, missing, or unparsable cells yield None.
pub fn parse_amount(cell: Option<&Cell>) -> Option<f64> {
    match cell? {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => {
            let cleaned = s.replace(',', "");
            cleaned.trim().parse::<f64>().ok()
        }
        Cell::Null => None,
    }
}
