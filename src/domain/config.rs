// ============================================================================
// Game Configuration
// Tunable constants for task generation, scoring, timing and distractors
// ============================================================================

use super::task::{Precision, TaskKind};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on distractors produced per task
pub const MAX_DISTRACTORS: usize = 3;

// ============================================================================
// Answer Format
// ============================================================================

/// How the player answers a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnswerFormat {
    /// The player types the canonical string
    FreeText,
    /// The player picks the canonical string among near misses
    MultipleChoice,
}

// ============================================================================
// Distractor Policy
// ============================================================================

/// Bounds for near-miss synthesis
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DistractorPolicy {
    /// Distractors wanted (at most `MAX_DISTRACTORS`)
    pub count: usize,
    /// Candidate draws before giving up with a short set
    pub max_attempts: u32,
    /// Values closer than this count as equal
    pub epsilon: f64,
    /// Reject candidates that are zero or negative
    pub require_positive: bool,
}

impl Default for DistractorPolicy {
    fn default() -> Self {
        Self {
            count: MAX_DISTRACTORS,
            max_attempts: 20,
            epsilon: 1e-10,
            require_positive: false,
        }
    }
}

// ============================================================================
// Complete Game Configuration
// ============================================================================

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameConfig {
    /// Rounding rule for generated tasks
    pub mode: TaskKind,

    /// Free text or multiple choice
    pub answer_format: AnswerFormat,

    /// Lives at the start of a game
    pub starting_lives: u32,

    /// Round length at level 0/1, in seconds
    pub base_round_secs: u32,

    /// Cap on how much higher levels shorten a round, in seconds
    pub max_time_reduction_secs: u32,

    /// Pause between a resolved round and the next one
    pub feedback_delay: Duration,

    /// Pause between the last lost life and game over
    pub game_over_delay: Duration,

    /// A correct answer earns `points_per_level * level`
    pub points_per_level: u32,

    /// A correct answer on every Nth round levels up
    pub rounds_per_level: u32,

    pub hint_cost: u32,
    pub skip_cost: u32,

    /// Time left after a hint is at least this many seconds
    pub hint_min_secs: u32,

    /// Highest precision the generator asks for
    pub max_precision: u32,

    /// Probability that a generated value is negative
    pub negative_probability: f64,

    pub distractors: DistractorPolicy,

    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(mode: TaskKind) -> Self {
        Self {
            mode,
            answer_format: AnswerFormat::FreeText,
            starting_lives: 3,
            base_round_secs: 30,
            max_time_reduction_secs: 12,
            feedback_delay: Duration::from_millis(1500),
            game_over_delay: Duration::from_millis(1500),
            points_per_level: 10,
            rounds_per_level: 5,
            hint_cost: 5,
            skip_cost: 10,
            hint_min_secs: 5,
            max_precision: Precision::MAX,
            negative_probability: 0.1,
            distractors: DistractorPolicy::default(),
            seed: None,
        }
    }

    pub fn with_answer_format(mut self, format: AnswerFormat) -> Self {
        self.answer_format = format;
        self
    }

    pub fn with_starting_lives(mut self, lives: u32) -> Self {
        self.starting_lives = lives;
        self
    }

    pub fn with_delays(mut self, feedback: Duration, game_over: Duration) -> Self {
        self.feedback_delay = feedback;
        self.game_over_delay = game_over;
        self
    }

    pub fn with_max_precision(mut self, max_precision: u32) -> Self {
        self.max_precision = max_precision;
        self
    }

    pub fn with_distractors(mut self, policy: DistractorPolicy) -> Self {
        self.distractors = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seconds on the clock for a round at `level`:
    /// `base - min(max_reduction, level / 2)`.
    pub fn round_duration(&self, level: u32) -> u32 {
        self.base_round_secs
            .saturating_sub((level / 2).min(self.max_time_reduction_secs))
    }

    /// Points earned by a correct answer at `level`
    pub fn points_for(&self, level: u32) -> u32 {
        self.points_per_level.saturating_mul(level)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.starting_lives == 0 {
            return Err("Starting lives must be positive".to_string());
        }

        if self.rounds_per_level == 0 {
            return Err("Rounds per level must be positive".to_string());
        }

        if self.max_time_reduction_secs >= self.base_round_secs {
            return Err("Time reduction must leave a positive round length".to_string());
        }

        if !(Precision::MIN..=Precision::MAX).contains(&self.max_precision) {
            return Err(format!(
                "Max precision must be between {} and {}",
                Precision::MIN,
                Precision::MAX
            ));
        }

        if !(0.0..=1.0).contains(&self.negative_probability) {
            return Err("Negative probability must be between 0 and 1".to_string());
        }

        if self.distractors.count > MAX_DISTRACTORS {
            return Err(format!("At most {} distractors are supported", MAX_DISTRACTORS));
        }

        if self.distractors.epsilon.is_nan() || self.distractors.epsilon < 0.0 {
            return Err("Distractor epsilon cannot be negative".to_string());
        }

        if self.answer_format == AnswerFormat::MultipleChoice && self.distractors.count == 0 {
            return Err("Multiple choice needs at least one distractor".to_string());
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl GameConfig {
    /// Free-text decimal-place drills with the standard timings
    pub fn classic() -> Self {
        Self::new(TaskKind::DecimalPlaces)
    }

    /// Free-text significant-figure drills
    pub fn significant_figures() -> Self {
        Self::new(TaskKind::SignificantFigures)
    }

    /// Multiple-choice drills in the given mode
    pub fn multiple_choice(mode: TaskKind) -> Self {
        Self::new(mode).with_answer_format(AnswerFormat::MultipleChoice)
    }
}

// ============================================================================
// JSON Configuration
// ============================================================================

#[cfg(feature = "serde")]
impl GameConfig {
    /// Parse and validate a configuration document
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("Invalid config JSON: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| e.to_string())
    }
}
