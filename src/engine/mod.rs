// ============================================================================
// Engine Module
// Contains the core practice-session business logic
// ============================================================================

mod answer_checker;
mod distractors;
mod scheduler;
mod session_machine;
mod task_generator;

pub mod factory;

pub use answer_checker::{check_answer, hint, AnswerChecker, Hint, Verdict, HINT_COST};
pub use distractors::{distractors, DistractorGenerator, DistractorSet};
pub use factory::{create_from_config, create_with_source, SessionMachineBuilder};
pub use scheduler::{DeferredAction, Fired, Scheduler, TimerToken, TICK_PERIOD};
pub use session_machine::{EventBatch, Outcome, SessionMachine};
pub use task_generator::{new_task, TaskGenerator};
