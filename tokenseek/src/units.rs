//! Exact decimal rendering of raw token amounts.
//!
//! Token contracts report amounts as unscaled `uint256` integers together with
//! a `decimals` exponent. Rendering goes through the decimal digit string so
//! that supplies far beyond `f64` or 96-bit decimal range keep every digit.

use alloy_primitives::U256;

/// Scales `value` by `10^-decimals` and renders it as a decimal string.
///
/// The fractional part keeps at least one digit and drops trailing zeros;
/// with `decimals == 0` the integer is rendered without a decimal point.
///
/// ```
/// use alloy_primitives::U256;
/// use tokenseek::units::format_units;
///
/// let one_ether = U256::from(1_000_000_000_000_000_000_u64);
/// assert_eq!(format_units(one_ether, 18), "1.0");
/// assert_eq!(format_units(U256::from(1_500_000_u64), 6), "1.5");
/// assert_eq!(format_units(U256::from(42_u64), 0), "42");
/// ```
#[must_use]
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    if decimals == 0 {
        return digits;
    }

    let scale = usize::from(decimals);
    let padded = if digits.len() <= scale {
        format!("{}{digits}", "0".repeat(scale + 1 - digits.len()))
    } else {
        digits
    };

    let (whole, fraction) = padded.split_at(padded.len() - scale);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}
