// ============================================================================
// Task Domain Model
// ============================================================================

use crate::numeric::{
    format_dp, format_original, format_sf, round_dp, round_sf, sf_decimals, NumericError,
    NumericResult,
};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which rounding rule a task asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TaskKind {
    /// Round to N digits after the decimal point
    DecimalPlaces,
    /// Round to N significant figures
    SignificantFigures,
}

impl TaskKind {
    /// Word used for a single position of the answer in hints
    pub fn unit_noun(&self) -> &'static str {
        match self {
            TaskKind::DecimalPlaces => "digit",
            TaskKind::SignificantFigures => "figure",
        }
    }

    fn precision_label(&self) -> &'static str {
        match self {
            TaskKind::DecimalPlaces => "decimal place",
            TaskKind::SignificantFigures => "significant figure",
        }
    }
}

/// Number of decimal places or significant figures a task asks for.
///
/// Bounded to `1..=6` so answer strings stay short and the single-character
/// hint remains meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Precision(u8);

impl Precision {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 6;

    /// # Errors
    /// Returns `InvalidPrecision` outside `MIN..=MAX`.
    pub fn new(n: u32) -> NumericResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n as u8))
        } else {
            Err(NumericError::InvalidPrecision)
        }
    }

    /// Clamp any count into `MIN..=MAX`.
    pub fn saturating(n: u32) -> Self {
        Self(n.clamp(Self::MIN, Self::MAX) as u8)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Task Entity
// ============================================================================

/// One rounding exercise. Immutable once created for a round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    pub id: TaskId,
    pub value: f64,
    pub kind: TaskKind,
    pub precision: Precision,
}

impl Task {
    /// # Errors
    /// Returns `NonFinite` if `value` is NaN or infinite.
    pub fn new(value: f64, kind: TaskKind, precision: Precision) -> NumericResult<Self> {
        if !value.is_finite() {
            return Err(NumericError::NonFinite);
        }
        Ok(Self {
            id: TaskId::new(),
            value,
            kind,
            precision,
        })
    }

    pub fn decimal_places(value: f64, places: u32) -> NumericResult<Self> {
        Self::new(value, TaskKind::DecimalPlaces, Precision::new(places)?)
    }

    pub fn significant_figures(value: f64, sig: u32) -> NumericResult<Self> {
        Self::new(value, TaskKind::SignificantFigures, Precision::new(sig)?)
    }

    /// Rounded value and its canonical string, recomputed from the task.
    pub fn canonical_answer(&self) -> RoundedAnswer {
        let precision = self.precision.get();
        match self.kind {
            TaskKind::DecimalPlaces => RoundedAnswer {
                value: round_dp(self.value, precision),
                text: format_dp(self.value, precision),
                decimals: precision,
            },
            TaskKind::SignificantFigures => RoundedAnswer {
                value: round_sf(self.value, precision),
                text: format_sf(self.value, precision),
                decimals: sf_decimals(self.value, precision),
            },
        }
    }

    /// The canonical string answers must match character for character.
    pub fn expected(&self) -> String {
        self.canonical_answer().text
    }

    /// The unrounded value as presented to the player.
    pub fn display_value(&self) -> String {
        format_original(self.value)
    }

    /// Instruction text, e.g. `"Express to 2 decimal places."`
    pub fn prompt(&self) -> String {
        let n = self.precision.get();
        format!(
            "Express to {} {}{}.",
            n,
            self.kind.precision_label(),
            if n > 1 { "s" } else { "" }
        )
    }
}

// ============================================================================
// Rounded Answer
// ============================================================================

/// Canonical result of applying a task's rounding rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoundedAnswer {
    /// Rounded numeric value
    pub value: f64,
    /// Canonical fixed-point string
    pub text: String,
    /// Fractional digits in `text`
    pub decimals: u32,
}

impl RoundedAnswer {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Format another value with the same number of fractional digits.
    pub fn format_like(&self, value: f64) -> String {
        format!("{:.*}", self.decimals as usize, value)
    }

    /// Exact decimal reading of the canonical string, trailing zeros kept
    /// in the scale.
    pub fn to_decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.text).ok()
    }
}

impl fmt::Display for RoundedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Canonical rounded answer for `task`
pub fn canonical_answer(task: &Task) -> RoundedAnswer {
    task.canonical_answer()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_bounds() {
        assert!(Precision::new(0).is_err());
        assert_eq!(Precision::new(6).unwrap().get(), 6);
        assert_eq!(Precision::new(7), Err(NumericError::InvalidPrecision));
        assert_eq!(Precision::saturating(9).get(), 6);
        assert_eq!(Precision::saturating(0).get(), 1);
    }

    #[test]
    fn test_task_rejects_non_finite() {
        assert_eq!(
            Task::decimal_places(f64::NAN, 2).unwrap_err(),
            NumericError::NonFinite
        );
    }

    #[test]
    fn test_canonical_decimal_places() {
        let task = Task::decimal_places(3.4, 2).unwrap();
        let answer = task.canonical_answer();
        assert_eq!(answer.text, "3.40");
        assert_eq!(answer.decimals, 2);
        assert_eq!(answer.to_decimal().unwrap().scale(), 2);
    }

    #[test]
    fn test_canonical_significant_figures() {
        let task = Task::significant_figures(0.0045678, 3).unwrap();
        let answer = task.canonical_answer();
        assert_eq!(answer.text, "0.00457");
        assert_eq!(answer.decimals, 5);
        assert_eq!(answer.format_like(0.00458), "0.00458");
    }

    #[test]
    fn test_canonical_recomputable() {
        let task = Task::significant_figures(9.996, 3).unwrap();
        assert_eq!(task.canonical_answer(), task.canonical_answer());
        assert_eq!(task.expected(), "10.00");
    }

    #[test]
    fn test_prompt_pluralisation() {
        let one = Task::decimal_places(1.23, 1).unwrap();
        assert_eq!(one.prompt(), "Express to 1 decimal place.");

        let three = Task::significant_figures(1.23, 3).unwrap();
        assert_eq!(three.prompt(), "Express to 3 significant figures.");
    }

    #[test]
    fn test_display_value() {
        let task = Task::decimal_places(42.125, 2).unwrap();
        assert_eq!(task.display_value(), "42.125");
    }
}
