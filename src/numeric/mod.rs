// ============================================================================
// Numeric Module
// Rounding and canonical formatting for practice tasks
// ============================================================================
//
// This module provides:
// - Decimal-place rounding and fixed-point formatting
// - Significant-figure rounding and fixed-point formatting
// - Presentation of the unrounded value
// - NumericError: Error types for the checked entry points
//
// Design principles:
// - Plain f64 magnitudes, ties rounded half away from zero
// - Canonical strings never use scientific notation
// - Checked entry points return Result (no panics)

mod errors;
mod rounding;

pub use errors::{NumericError, NumericResult};
pub use rounding::{
    format_decimal_places, format_original, format_significant_figures,
    round_to_decimal_places, round_to_significant_figures, MAX_DECIMAL_PLACES,
    MAX_SIGNIFICANT_FIGURES,
};

pub(crate) use rounding::{format_dp, format_sf, round_dp, round_sf, scale_round, sf_decimals};
