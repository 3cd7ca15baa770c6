// ============================================================================
// Task Generator
// Random rounding tasks scaled by difficulty level
// ============================================================================

use crate::domain::{GameConfig, Precision, Task, TaskId, TaskKind};
use crate::interfaces::TaskSource;
use crate::numeric::round_sf;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generated values are normalised to this many significant digits
const NORMALIZED_DIGITS: u32 = 10;

/// Random task generator
///
/// Values are drawn uniformly from `[100, 1000)` and divided by one of
/// `1, 10, 100, 1000`, so magnitudes span `[0.1, 1000)`. Precision grows
/// with the level: `min(max, 1 + level / 2 + {0, 1, 2})`.
///
/// # Example
/// ```
/// use decimal_dash::engine::TaskGenerator;
/// use decimal_dash::domain::TaskKind;
///
/// let mut generator = TaskGenerator::from_seed(42);
/// let task = generator.pick_task(4, TaskKind::DecimalPlaces);
/// assert!(task.precision.get() >= 3);
/// ```
pub struct TaskGenerator<R: Rng = StdRng> {
    rng: R,
    max_precision: u32,
    negative_probability: f64,
}

impl TaskGenerator<StdRng> {
    /// Deterministic generator
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Generator honouring the configured precision cap, sign probability
    /// and seed
    pub fn from_config(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
            .with_max_precision(config.max_precision)
            .with_negative_probability(config.negative_probability)
    }
}

impl<R: Rng> TaskGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            max_precision: Precision::MAX,
            negative_probability: 0.1,
        }
    }

    pub fn with_max_precision(mut self, max_precision: u32) -> Self {
        self.max_precision = max_precision.clamp(Precision::MIN, Precision::MAX);
        self
    }

    pub fn with_negative_probability(mut self, probability: f64) -> Self {
        self.negative_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    /// Random value spread across magnitudes, occasionally negative
    pub fn random_value(&mut self) -> f64 {
        let base = self.rng.gen_range(100.0..1000.0) / 10f64.powi(self.rng.gen_range(0..4));
        let sign = if self.rng.gen_bool(self.negative_probability) {
            -1.0
        } else {
            1.0
        };
        round_sf(sign * base, NORMALIZED_DIGITS)
    }

    /// Precision for a task at `level`, never above the configured cap
    pub fn precision_for_level(&mut self, level: u32) -> Precision {
        let jitter: u32 = self.rng.gen_range(0..=2);
        let wanted = 1u32.saturating_add(level / 2).saturating_add(jitter);
        Precision::saturating(wanted.min(self.max_precision))
    }

    pub fn pick_task(&mut self, level: u32, kind: TaskKind) -> Task {
        let value = self.random_value();
        let precision = self.precision_for_level(level);
        Task {
            id: TaskId::new(),
            value,
            kind,
            precision,
        }
    }
}

impl<R: Rng + Send> TaskSource for TaskGenerator<R> {
    fn next_task(&mut self, level: u32, kind: TaskKind) -> Task {
        self.pick_task(level, kind)
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// One random task at `level`, using the thread-local RNG
pub fn new_task(level: u32, kind: TaskKind) -> Task {
    TaskGenerator::new(rand::thread_rng()).pick_task(level, kind)
}
