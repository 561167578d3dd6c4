//! Fixed-width scientific notation for trajectory files.
//!
//! Consumers of the trajectory format parse fixed-width fields, so every
//! value is written as `±D.DDDDDDDDDDDDDDDDDDe±EE`: one leading digit,
//! eighteen fractional digits, a lowercase `e`, an explicit exponent sign
//! and at least two exponent digits.

use log::warn;

/// Number of digits after the decimal point
pub const FRACTION_DIGITS: usize = 18;

/// Literal written for both `0.0` and `-0.0`
pub const ZERO_LITERAL: &str = "0.000000000000000000e+00";

/// Format one value for a trajectory line.
///
/// Values whose scientific form has no parsable exponent (NaN and the
/// infinities) are written in the default library form and reported
/// with a warning, since the downstream parser will not accept them.
pub fn format_traj_number(value: f64) -> String {
    if value == 0.0 {
        return ZERO_LITERAL.to_string();
    }

    let raw = format!("{:.*e}", FRACTION_DIGITS, value);
    match split_exponent(&raw) {
        Some((mantissa, exponent)) => {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
        }
        None => {
            warn!(
                "Trajectory value {:?} has no scientific exponent, writing {:?} unchanged",
                value, raw
            );
            raw
        }
    }
}

/// Split `d.ddde<exp>` into mantissa text and exponent value
fn split_exponent(raw: &str) -> Option<(&str, i32)> {
    let (mantissa, exponent) = raw.split_once('e')?;
    let digits = mantissa.strip_prefix('-').unwrap_or(mantissa);
    let (lead, fraction) = digits.split_once('.')?;
    if lead.is_empty()
        || fraction.is_empty()
        || !lead.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let exponent = exponent.parse::<i32>().ok()?;
    Some((mantissa, exponent))
}
