// ============================================================================
// Rounding Engine
// Decimal-place and significant-figure rounding with canonical formatting
// ============================================================================

use super::errors::{NumericError, NumericResult};

/// Largest decimal-place count the checked API accepts.
///
/// Beyond this an f64 no longer carries meaningful digits after scaling.
pub const MAX_DECIMAL_PLACES: u32 = 15;

/// Largest significant-figure count the checked API accepts.
pub const MAX_SIGNIFICANT_FIGURES: u32 = 17;

/// Magnitudes at or above this are shown in scientific notation by
/// [`format_original`].
const SCIENTIFIC_UPPER: f64 = 1e6;

/// Non-zero magnitudes below this are shown in scientific notation by
/// [`format_original`].
const SCIENTIFIC_LOWER: f64 = 1e-6;

/// Fractional digits used for scientific notation in [`format_original`].
const SCIENTIFIC_DIGITS: usize = 4;

#[inline]
fn pow10(n: i32) -> f64 {
    10f64.powi(n)
}

#[inline]
fn check_finite(value: f64) -> NumericResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(NumericError::NonFinite)
    }
}

/// Round `value` so that `power` digits remain after the decimal point.
///
/// Negative powers round to tens, hundreds, ... Multiplying by the inverse
/// power instead of dividing by `10^power` keeps `123.4 -> 120` exact.
#[inline]
pub(crate) fn scale_round(value: f64, power: i32) -> f64 {
    if power >= 0 {
        let magnitude = pow10(power);
        (value * magnitude).round() / magnitude
    } else {
        let magnitude = pow10(-power);
        (value / magnitude).round() * magnitude
    }
}

/// Decimal exponent used for significant-figure rounding.
///
/// `ceil(log10(|value|))`: the integer digit count for values >= 1 and the
/// (non-positive) leading-digit position for values < 1. Exact powers of ten
/// report one less than their digit count.
#[inline]
pub(crate) fn decimal_exponent(value: f64) -> i32 {
    value.abs().log10().ceil() as i32
}

// ============================================================================
// Decimal places
// ============================================================================

#[inline]
pub(crate) fn round_dp(value: f64, places: u32) -> f64 {
    scale_round(value, places as i32)
}

#[inline]
pub(crate) fn format_dp(value: f64, places: u32) -> String {
    format!("{:.*}", places as usize, round_dp(value, places))
}

/// Round to `places` digits after the decimal point.
///
/// Ties round half away from zero (`2.5 -> 3`, `-2.5 -> -3`), applied to
/// the f64 product `value * 10^places`. Binary representation decides the
/// tie: `1.005 * 100` is `100.49999999999999`, so `1.005` rounds to `1.00`.
///
/// # Errors
/// - `NonFinite` for NaN or infinite input
/// - `InvalidPrecision` when `places` exceeds [`MAX_DECIMAL_PLACES`]
pub fn round_to_decimal_places(value: f64, places: u32) -> NumericResult<f64> {
    check_finite(value)?;
    if places > MAX_DECIMAL_PLACES {
        return Err(NumericError::InvalidPrecision);
    }
    Ok(round_dp(value, places))
}

/// Canonical fixed-point string with exactly `places` fractional digits.
///
/// # Example
/// ```
/// use decimal_dash::numeric::format_decimal_places;
///
/// assert_eq!(format_decimal_places(12.34, 3).unwrap(), "12.340");
/// assert_eq!(format_decimal_places(-0.456, 1).unwrap(), "-0.5");
/// ```
pub fn format_decimal_places(value: f64, places: u32) -> NumericResult<String> {
    check_finite(value)?;
    if places > MAX_DECIMAL_PLACES {
        return Err(NumericError::InvalidPrecision);
    }
    Ok(format_dp(value, places))
}

// ============================================================================
// Significant figures
// ============================================================================

#[inline]
pub(crate) fn round_sf(value: f64, sig: u32) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    let power = sig as i32 - decimal_exponent(value);
    scale_round(value, power)
}

/// Fractional digits printed for a value at `sig` significant figures.
///
/// Computed from the value *before* rounding. When rounding carries the
/// mantissa over a power of ten (`9.996 -> 10.0` at 3 s.f.) the stale
/// exponent prints one digit more than requested (`"10.00"`).
#[inline]
pub(crate) fn sf_decimals(value: f64, sig: u32) -> u32 {
    if value == 0.0 {
        return sig.saturating_sub(1);
    }
    (sig as i32 - decimal_exponent(value)).max(0) as u32
}

#[inline]
pub(crate) fn format_sf(value: f64, sig: u32) -> String {
    format!("{:.*}", sf_decimals(value, sig) as usize, round_sf(value, sig))
}

/// Round to `sig` significant figures.
///
/// Zero is returned unchanged. Otherwise the value is scaled by
/// `10^(sig - ceil(log10|value|))`, rounded half away from zero and scaled
/// back. The exponent is not recomputed after rounding.
///
/// # Errors
/// - `NonFinite` for NaN or infinite input
/// - `InvalidPrecision` when `sig` is zero or exceeds [`MAX_SIGNIFICANT_FIGURES`]
pub fn round_to_significant_figures(value: f64, sig: u32) -> NumericResult<f64> {
    check_finite(value)?;
    if sig == 0 || sig > MAX_SIGNIFICANT_FIGURES {
        return Err(NumericError::InvalidPrecision);
    }
    Ok(round_sf(value, sig))
}

/// Canonical fixed-point string for `value` at `sig` significant figures.
///
/// Never uses scientific notation. When the requested figures end left of
/// the decimal point the fallback precision is zero fractional digits, so
/// `123.456` at 2 s.f. renders `"120"`. Zero renders with `sig - 1`
/// fractional digits.
///
/// # Example
/// ```
/// use decimal_dash::numeric::format_significant_figures;
///
/// assert_eq!(format_significant_figures(0.012345, 3).unwrap(), "0.0123");
/// assert_eq!(format_significant_figures(123.456, 2).unwrap(), "120");
/// ```
pub fn format_significant_figures(value: f64, sig: u32) -> NumericResult<String> {
    check_finite(value)?;
    if sig == 0 || sig > MAX_SIGNIFICANT_FIGURES {
        return Err(NumericError::InvalidPrecision);
    }
    Ok(format_sf(value, sig))
}

// ============================================================================
// Presentation of the unrounded value
// ============================================================================

/// The number as shown before rounding.
///
/// Scientific notation with four fractional digits and an explicit exponent
/// sign (`"1.2346e+6"`) outside `[1e-6, 1e6)`, zero excluded. Shortest
/// round-trip decimal otherwise.
pub fn format_original(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= SCIENTIFIC_UPPER || (magnitude < SCIENTIFIC_LOWER && value != 0.0) {
        let formatted = format!("{:.*e}", SCIENTIFIC_DIGITS, value);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            },
            _ => formatted,
        }
    } else {
        format!("{}", value)
    }
}
