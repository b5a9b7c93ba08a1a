//! Decimal amount parsing and base-unit scaling for ERC-20 amounts.
//!
//! Amounts are entered as plain decimal strings (`"12"`, `"0.5"`, `".25"`).
//! `parse_units` scales them by `10^decimals`; fraction digits beyond the
//! token's precision are rounded half-up on the first dropped digit.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("not a decimal amount: {0:?}")]
    Malformed(String),
    #[error("amount overflows 128-bit base units: {0}")]
    Overflow(String),
}

struct Decimal<'a> {
    whole: &'a str,
    fraction: &'a str,
}

fn split_decimal(value: &str) -> Option<Decimal<'_>> {
    let trimmed = value.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return None;
    }
    Some(Decimal { whole, fraction })
}

/// `true` when `value` is a well-formed decimal strictly greater than zero.
#[must_use]
pub fn is_positive_amount(value: &str) -> bool {
    split_decimal(value).is_some_and(|d| d.whole.bytes().chain(d.fraction.bytes()).any(|b| b != b'0'))
}

/// Scale a decimal string to integer base units.
///
/// # Errors
///
/// Returns [`UnitsError::Malformed`] for anything but digits with at most one
/// `.`, and [`UnitsError::Overflow`] when the result does not fit in `u128`.
pub fn parse_units(value: &str, decimals: u8) -> Result<u128, UnitsError> {
    let decimal = split_decimal(value).ok_or_else(|| UnitsError::Malformed(value.to_owned()))?;
    let precision = usize::from(decimals);
    let overflow = || UnitsError::Overflow(value.to_owned());

    let (kept, dropped) = if decimal.fraction.len() > precision {
        decimal.fraction.split_at(precision)
    } else {
        (decimal.fraction, "")
    };

    let mut digits = String::with_capacity(decimal.whole.len() + precision);
    digits.push_str(decimal.whole);
    digits.push_str(kept);
    for _ in kept.len()..precision {
        digits.push('0');
    }

    let mut scaled: u128 = 0;
    for b in digits.bytes() {
        scaled = scaled
            .checked_mul(10)
            .and_then(|v| v.checked_add(u128::from(b - b'0')))
            .ok_or_else(overflow)?;
    }

    if dropped.bytes().next().is_some_and(|b| b >= b'5') {
        scaled = scaled.checked_add(1).ok_or_else(overflow)?;
    }
    Ok(scaled)
}

/// Render base units as a decimal string with trailing zeros trimmed.
#[must_use]
pub fn format_units(value: u128, decimals: u8) -> String {
    let precision = usize::from(decimals);
    let digits = format!("{value:0>width$}", width = precision + 1);
    let (whole, fraction) = digits.split_at(digits.len() - precision);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() { whole.to_owned() } else { format!("{whole}.{fraction}") }
}

#[cfg(test)]
#[path = "units_test.rs"]
mod tests;
