// ============================================================================
// Feedback Messages
// User-facing text produced by session transitions
// ============================================================================

use super::task::TaskKind;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FeedbackMessage {
    /// A new round is waiting for input
    Prompt,
    /// Submit was pressed with nothing typed
    EmptyAnswer,
    Correct {
        points: u32,
    },
    Wrong {
        expected: String,
    },
    TimeUp {
        expected: String,
    },
    Skipped {
        expected: String,
    },
    /// One character of the answer, `position` is 1-based
    Hint {
        kind: TaskKind,
        position: usize,
        character: char,
    },
    /// The typed input already matches and is longer than the answer
    HintTooLong {
        answer_len: usize,
    },
    LevelUp {
        level: u32,
        score: u32,
    },
    GameOver {
        score: u32,
    },
}

impl FeedbackMessage {
    /// Whether the presentation layer should style this as a setback
    pub fn is_error(&self) -> bool {
        !matches!(
            self,
            FeedbackMessage::Prompt | FeedbackMessage::Correct { .. } | FeedbackMessage::LevelUp { .. }
        )
    }

    /// The canonical answer, when this message reveals it
    pub fn revealed_answer(&self) -> Option<&str> {
        match self {
            FeedbackMessage::Wrong { expected }
            | FeedbackMessage::TimeUp { expected }
            | FeedbackMessage::Skipped { expected } => Some(expected),
            _ => None,
        }
    }
}

impl fmt::Display for FeedbackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackMessage::Prompt => write!(f, "Type your answer and press Enter or Submit!"),
            FeedbackMessage::EmptyAnswer => write!(f, "Please type an answer."),
            FeedbackMessage::Correct { points } => {
                write!(f, "Correct! Points earned: {}", points)
            },
            FeedbackMessage::Wrong { expected } => {
                write!(f, "Wrong. Correct answer was: {}", expected)
            },
            FeedbackMessage::TimeUp { expected } => {
                write!(f, "Time's up! Correct answer was: {}", expected)
            },
            FeedbackMessage::Skipped { expected } => {
                write!(f, "Skipped. The correct answer was: {}", expected)
            },
            FeedbackMessage::Hint {
                kind,
                position,
                character,
            } => write!(
                f,
                "Hint: The correct {} at position {} is '{}'.",
                kind.unit_noun(),
                position,
                character
            ),
            FeedbackMessage::HintTooLong { answer_len } => write!(
                f,
                "Hint: Your answer is too long! The answer is only {} characters.",
                answer_len
            ),
            FeedbackMessage::LevelUp { level, score } => {
                write!(f, "Level {} reached! Score so far: {}", level, score)
            },
            FeedbackMessage::GameOver { score } => write!(
                f,
                "Game Over! Final score: {}. Restart to try again.",
                score
            ),
        }
    }
}
