// ============================================================================
// Decimal Dash Library
// Timed rounding drills: task generation, grading, hints and session flow
// ============================================================================

//! # Decimal Dash
//!
//! An engine for timed practice of rounding to decimal places and
//! significant figures.
//!
//! ## Features
//!
//! - **Exact canonical answers** with trailing zeros kept (`3.4` to 2 d.p. is `3.40`)
//! - **Level-scaled tasks**: higher levels ask for more precision and give less time
//! - **Hints and skips** with score penalties that never go below zero
//! - **Multiple choice** with near-miss distractors one unit away
//! - **Virtual clock**: the session only moves when time is handed to it,
//!   so tests and replays are deterministic
//!
//! ## Example
//!
//! ```rust
//! use decimal_dash::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let source = ScriptedTaskSource::repeating(3.4, Precision::new(2).unwrap()).unwrap();
//! let mut machine = SessionMachineBuilder::new()
//!     .with_task_source(Box::new(source))
//!     .with_event_handler(Arc::new(NoOpEventHandler))
//!     .build()
//!     .unwrap();
//!
//! machine.start().unwrap();
//! let task = machine.current_task().unwrap();
//! println!("{} -> {}", task.display_value(), task.prompt());
//!
//! let outcome = machine.submit("3.40").unwrap();
//! assert_eq!(outcome.snapshot.score, 10);
//!
//! // Feedback pause, then the next round opens
//! machine.advance(Duration::from_millis(1500));
//! assert_eq!(machine.snapshot().round, 2);
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;

#[cfg(feature = "async")]
pub mod driver;

pub use domain::canonical_answer;
pub use engine::{check_answer, distractors, hint, new_task};

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::session::phase::{Phase, PhaseTransition};
    pub use crate::domain::{
        canonical_answer, AnswerFormat, DistractorPolicy, FeedbackMessage, GameConfig, Precision,
        RoundedAnswer, SessionAction, SessionError, SessionId, SessionSnapshot, Task, TaskId,
        TaskKind,
    };
    pub use crate::engine::{
        check_answer, create_from_config, create_with_source, distractors, hint, new_task,
        AnswerChecker, DistractorGenerator, Hint, Outcome, SessionMachine, SessionMachineBuilder,
        TaskGenerator, Verdict,
    };
    pub use crate::interfaces::{
        ChannelEventHandler, EventHandler, LoggingEventHandler, NoOpEventHandler, ScriptedTaskSource,
        SessionEvent, TaskSource,
    };
    pub use crate::numeric::{
        format_decimal_places, format_original, format_significant_figures, NumericError,
    };
}
