// ============================================================================
// Answer Checker
// Exact-string grading and single-character hints
// ============================================================================

use crate::domain::Task;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Score cost of a hint
pub const HINT_COST: u32 = 5;

/// Grading outcome. Everything but `Correct` counts as a wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    /// A number, but not the canonical string (`"3.4"` for `"3.40"`)
    Incorrect,
    /// Not readable as a decimal number at all
    NotANumber,
}

impl Verdict {
    #[inline]
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// One revealed character of the canonical answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    /// 0-based position of the first wrong or missing character
    pub index: usize,
    /// Character at `index`, `None` when the input is already longer
    pub character: Option<char>,
    /// Score change, always a penalty
    pub score_delta: i64,
}

/// Stateless grader comparing trimmed input with the canonical string
/// character for character.
pub struct AnswerChecker;

impl AnswerChecker {
    pub fn evaluate(expected: &str, raw: &str) -> Verdict {
        let input = raw.trim();
        if input == expected {
            Verdict::Correct
        } else if Decimal::from_str(input).is_ok() {
            Verdict::Incorrect
        } else {
            Verdict::NotANumber
        }
    }

    pub fn check(task: &Task, raw: &str) -> bool {
        Self::evaluate(&task.expected(), raw).is_correct()
    }

    /// Index of the first character where `input` departs from `expected`,
    /// or the input length when it is a correct prefix so far.
    pub fn hint_index(expected: &str, input: &str) -> usize {
        let mut expected_chars = expected.chars();
        let mut index = 0;
        for typed in input.trim().chars() {
            if expected_chars.next() != Some(typed) {
                return index;
            }
            index += 1;
        }
        index
    }

    pub fn hint_with_cost(expected: &str, input: &str, cost: u32) -> Hint {
        let index = Self::hint_index(expected, input);
        Hint {
            index,
            character: expected.chars().nth(index),
            score_delta: -i64::from(cost),
        }
    }

    pub fn hint(task: &Task, input: &str) -> Hint {
        Self::hint_with_cost(&task.expected(), input, HINT_COST)
    }
}

/// `true` only for an exact match of the canonical string
pub fn check_answer(task: &Task, raw: &str) -> bool {
    AnswerChecker::check(task, raw)
}

pub fn hint(task: &Task, input: &str) -> Hint {
    AnswerChecker::hint(task, input)
}
