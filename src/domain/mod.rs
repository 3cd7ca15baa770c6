// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod feedback;
pub mod session;
pub mod task;

pub use config::{AnswerFormat, DistractorPolicy, GameConfig, MAX_DISTRACTORS};
pub use feedback::FeedbackMessage;
pub use session::{Session, SessionAction, SessionError, SessionId, SessionSnapshot};
pub use task::{canonical_answer, Precision, RoundedAnswer, Task, TaskId, TaskKind};

// Re-export state machine
pub use session::phase::{Phase, PhaseTransition};
