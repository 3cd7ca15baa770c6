// ============================================================================
// Session Domain Model
// ============================================================================

use super::task::{Task, TaskKind};
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Remaining seconds at or below which the clock is shown as urgent
pub const LOW_TIME_SECS: u32 = 10;

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Session Phase State Machine
// ============================================================================

pub mod phase {
    use super::SessionError;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum Phase {
        Idle,
        AwaitingAnswer,
        Feedback,
        LevelTransition,
        GameOver,
    }

    impl Phase {
        /// Only this phase accepts submit, hint and skip
        pub fn accepts_input(&self) -> bool {
            matches!(self, Phase::AwaitingAnswer)
        }

        pub fn is_playing(&self) -> bool {
            !matches!(self, Phase::Idle | Phase::GameOver)
        }

        pub fn is_terminal(&self) -> bool {
            matches!(self, Phase::GameOver)
        }
    }

    /// Valid edges of the session state machine
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum PhaseTransition {
        Start,
        Resolve,
        LevelUp,
        NextRound,
        EndGame,
        Reset,
    }

    impl Phase {
        pub fn transition(&self, transition: PhaseTransition) -> Result<Phase, SessionError> {
            match (self, transition) {
                (Phase::Idle, PhaseTransition::Start) => Ok(Phase::AwaitingAnswer),

                (Phase::AwaitingAnswer, PhaseTransition::Resolve) => Ok(Phase::Feedback),

                (Phase::Feedback, PhaseTransition::LevelUp) => Ok(Phase::LevelTransition),
                (Phase::Feedback, PhaseTransition::NextRound) => Ok(Phase::AwaitingAnswer),
                (Phase::Feedback, PhaseTransition::EndGame) => Ok(Phase::GameOver),

                (Phase::LevelTransition, PhaseTransition::NextRound) => {
                    Ok(Phase::AwaitingAnswer)
                },

                (_, PhaseTransition::Reset) => Ok(Phase::Idle),

                _ => Err(SessionError::InvalidTransition {
                    from: *self,
                    via: transition,
                }),
            }
        }
    }
}

pub use phase::{Phase, PhaseTransition};

// ============================================================================
// Errors
// ============================================================================

/// Operations the presentation layer can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SessionAction {
    Start,
    Submit,
    Hint,
    Skip,
    AcknowledgeLevel,
}

/// Reasons a session operation was rejected. The session is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The action is not allowed in the current phase
    IllegalAction { phase: Phase, action: SessionAction },
    /// The phase table has no such edge
    InvalidTransition { from: Phase, via: PhaseTransition },
    /// A hint was already taken this round
    HintAlreadyUsed,
    /// No task is current even though a round is open
    NoCurrentTask,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::IllegalAction { phase, action } => {
                write!(f, "{:?} is not allowed while {:?}", action, phase)
            },
            SessionError::InvalidTransition { from, via } => {
                write!(f, "Invalid transition from {:?} via {:?}", from, via)
            },
            SessionError::HintAlreadyUsed => write!(f, "hint already used this round"),
            SessionError::NoCurrentTask => write!(f, "no current task"),
        }
    }
}

impl std::error::Error for SessionError {}

// ============================================================================
// Session Aggregate
// ============================================================================

/// Mutable game state. Only the session machine writes to it.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) score: u32,
    pub(crate) lives: u32,
    pub(crate) level: u32,
    pub(crate) round: u32,
    pub(crate) time_left: u32,
    pub(crate) phase: Phase,
    pub(crate) mode: TaskKind,
    pub(crate) current: Option<Task>,
    pub(crate) hint_used: bool,
}

impl Session {
    pub(crate) fn new(mode: TaskKind, starting_lives: u32) -> Self {
        Self {
            id: SessionId::new(),
            score: 0,
            lives: starting_lives,
            level: 1,
            round: 0,
            time_left: 0,
            phase: Phase::Idle,
            mode,
            current: None,
            hint_used: false,
        }
    }

    pub(crate) fn apply(&mut self, transition: PhaseTransition) -> Result<Phase, SessionError> {
        let next = self.phase.transition(transition)?;
        tracing::debug!(from = ?self.phase, to = ?next, via = ?transition, "session phase change");
        self.phase = next;
        Ok(next)
    }

    /// Subtract a penalty, clamping at zero
    pub(crate) fn charge(&mut self, cost: u32) {
        self.score = self.score.saturating_sub(cost);
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> TaskKind {
        self.mode
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current.as_ref()
    }

    pub fn hint_used(&self) -> bool {
        self.hint_used
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            score: self.score,
            lives: self.lives,
            level: self.level,
            round: self.round,
            time_left: self.time_left,
            phase: self.phase,
            mode: self.mode,
        }
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only copy of the session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    pub round: u32,
    pub time_left: u32,
    pub phase: Phase,
    pub mode: TaskKind,
}

impl SessionSnapshot {
    /// Remaining time as `mm:ss`
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.time_left / 60, self.time_left % 60)
    }

    pub fn is_low_time(&self) -> bool {
        self.time_left <= LOW_TIME_SECS
    }

    /// Last life, shown with a stronger warning
    pub fn is_last_life(&self) -> bool {
        self.lives == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let phase = Phase::Idle;
        let phase = phase.transition(PhaseTransition::Start).unwrap();
        assert_eq!(phase, Phase::AwaitingAnswer);

        let phase = phase.transition(PhaseTransition::Resolve).unwrap();
        assert_eq!(phase, Phase::Feedback);

        let phase = phase.transition(PhaseTransition::LevelUp).unwrap();
        assert_eq!(phase, Phase::LevelTransition);

        let phase = phase.transition(PhaseTransition::NextRound).unwrap();
        assert_eq!(phase, Phase::AwaitingAnswer);
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(Phase::Idle.transition(PhaseTransition::Resolve).is_err());
        assert!(Phase::GameOver.transition(PhaseTransition::Start).is_err());
        assert!(Phase::AwaitingAnswer
            .transition(PhaseTransition::NextRound)
            .is_err());
        assert_eq!(
            Phase::LevelTransition.transition(PhaseTransition::EndGame),
            Err(SessionError::InvalidTransition {
                from: Phase::LevelTransition,
                via: PhaseTransition::EndGame,
            })
        );
    }

    #[test]
    fn test_reset_from_any_phase() {
        for phase in [
            Phase::Idle,
            Phase::AwaitingAnswer,
            Phase::Feedback,
            Phase::LevelTransition,
            Phase::GameOver,
        ] {
            assert_eq!(phase.transition(PhaseTransition::Reset), Ok(Phase::Idle));
        }
    }

    #[test]
    fn test_score_penalty_clamps() {
        let mut session = Session::new(TaskKind::DecimalPlaces, 3);
        session.score = 7;
        session.charge(10);
        assert_eq!(session.score, 0);
        session.charge(5);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_snapshot_clock() {
        let mut session = Session::new(TaskKind::DecimalPlaces, 3);
        session.time_left = 75;
        let snapshot = session.snapshot();
        assert_eq!(snapshot.clock(), "01:15");
        assert!(!snapshot.is_low_time());

        session.time_left = 9;
        assert_eq!(session.snapshot().clock(), "00:09");
        assert!(session.snapshot().is_low_time());
    }
}
