// ============================================================================
// Session Factory
// Creates session machines with proper configuration
// ============================================================================

use crate::domain::{AnswerFormat, DistractorPolicy, GameConfig, TaskKind};
use crate::engine::{SessionMachine, TaskGenerator};
use crate::interfaces::{EventHandler, NoOpEventHandler, TaskSource};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a session machine with a random task generator
///
/// # Arguments
/// * `config` - Game configuration
/// * `event_handler` - Event handler for session events
///
/// # Returns
/// * `Result<SessionMachine, String>` - Idle session machine or error
///
/// # Example
/// ```
/// use decimal_dash::prelude::*;
/// use std::sync::Arc;
///
/// let config = GameConfig::classic().with_seed(1);
/// let mut machine = create_from_config(config, Arc::new(NoOpEventHandler)).unwrap();
/// assert!(machine.start().is_ok());
/// ```
pub fn create_from_config(
    config: GameConfig,
    event_handler: Arc<dyn EventHandler>,
) -> Result<SessionMachine, String> {
    let tasks = Box::new(TaskGenerator::from_config(&config));
    create_with_source(config, tasks, event_handler)
}

/// Creates a session machine drawing tasks from `tasks`
pub fn create_with_source(
    config: GameConfig,
    tasks: Box<dyn TaskSource>,
    event_handler: Arc<dyn EventHandler>,
) -> Result<SessionMachine, String> {
    config.validate()?;
    tracing::debug!(
        mode = ?config.mode,
        format = ?config.answer_format,
        source = tasks.name(),
        "creating session machine"
    );
    Ok(SessionMachine::new(config, tasks, event_handler))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating session machines with fluent API
///
/// # Example
/// ```
/// use decimal_dash::prelude::*;
/// use std::time::Duration;
///
/// let machine = SessionMachineBuilder::new()
///     .significant_figures()
///     .multiple_choice()
///     .with_delays(Duration::from_millis(500), Duration::from_secs(1))
///     .with_seed(9)
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.config().mode, TaskKind::SignificantFigures);
/// ```
pub struct SessionMachineBuilder {
    config: GameConfig,
    tasks: Option<Box<dyn TaskSource>>,
    event_handler: Arc<dyn EventHandler>,
}

impl SessionMachineBuilder {
    pub fn new() -> Self {
        Self::from_config(GameConfig::classic())
    }

    pub fn from_config(config: GameConfig) -> Self {
        Self {
            config,
            tasks: None,
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    // ========================================================================
    // Mode and Format
    // ========================================================================

    pub fn decimal_places(mut self) -> Self {
        self.config.mode = TaskKind::DecimalPlaces;
        self
    }

    pub fn significant_figures(mut self) -> Self {
        self.config.mode = TaskKind::SignificantFigures;
        self
    }

    pub fn free_text(mut self) -> Self {
        self.config.answer_format = AnswerFormat::FreeText;
        self
    }

    pub fn multiple_choice(mut self) -> Self {
        self.config.answer_format = AnswerFormat::MultipleChoice;
        self
    }

    // ========================================================================
    // Additional Configuration
    // ========================================================================

    pub fn with_starting_lives(mut self, lives: u32) -> Self {
        self.config.starting_lives = lives;
        self
    }

    pub fn with_delays(mut self, feedback: Duration, game_over: Duration) -> Self {
        self.config = self.config.with_delays(feedback, game_over);
        self
    }

    pub fn with_max_precision(mut self, max_precision: u32) -> Self {
        self.config.max_precision = max_precision;
        self
    }

    pub fn with_distractors(mut self, policy: DistractorPolicy) -> Self {
        self.config.distractors = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Replace the random generator, e.g. with a scripted source
    pub fn with_task_source(mut self, tasks: Box<dyn TaskSource>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = handler;
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    pub fn build(self) -> Result<SessionMachine, String> {
        match self.tasks {
            Some(tasks) => create_with_source(self.config, tasks, self.event_handler),
            None => create_from_config(self.config, self.event_handler),
        }
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &GameConfig {
        &self.config
    }
}

impl Default for SessionMachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Phase, Precision};
    use crate::interfaces::ScriptedTaskSource;

    #[test]
    fn test_create_classic_machine() {
        let machine = create_from_config(GameConfig::classic(), Arc::new(NoOpEventHandler)).unwrap();
        assert_eq!(machine.phase(), Phase::Idle);
        assert_eq!(machine.task_source_name(), "random");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig::classic().with_starting_lives(0);
        assert!(create_from_config(config, Arc::new(NoOpEventHandler)).is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let machine = SessionMachineBuilder::new()
            .significant_figures()
            .with_starting_lives(5)
            .with_seed(3)
            .build()
            .unwrap();

        assert_eq!(machine.config().mode, TaskKind::SignificantFigures);
        assert_eq!(machine.snapshot().lives, 5);
    }

    #[test]
    fn test_builder_scripted_source() {
        let source = ScriptedTaskSource::repeating(2.5, Precision::saturating(1)).unwrap();
        let mut machine = SessionMachineBuilder::new()
            .with_task_source(Box::new(source))
            .build()
            .unwrap();

        assert_eq!(machine.task_source_name(), "scripted");
        machine.start().unwrap();
        assert_eq!(machine.current_task().unwrap().expected(), "2.5");
    }

    #[test]
    fn test_builder_multiple_choice_needs_distractors() {
        let policy = DistractorPolicy {
            count: 0,
            ..DistractorPolicy::default()
        };
        let result = SessionMachineBuilder::new()
            .multiple_choice()
            .with_distractors(policy)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_seeded_machines_agree() {
        let mut a = SessionMachineBuilder::new().with_seed(42).build().unwrap();
        let mut b = SessionMachineBuilder::new().with_seed(42).build().unwrap();
        a.start().unwrap();
        b.start().unwrap();

        let left = a.current_task().unwrap();
        let right = b.current_task().unwrap();
        assert_eq!(left.value, right.value);
        assert_eq!(left.precision, right.precision);
    }
}
