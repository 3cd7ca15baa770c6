// ============================================================================
// Distractor Generator
// Plausible wrong answers for multiple-choice rounds
// ============================================================================

use crate::domain::{DistractorPolicy, RoundedAnswer, Task, TaskKind, MAX_DISTRACTORS};
use crate::numeric::scale_round;
use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::Rng;

/// Up to `MAX_DISTRACTORS` distinct near misses with their display strings.
///
/// A short (or empty) set is a valid result, never padded with duplicates.
#[derive(Debug, Clone, Default)]
pub struct DistractorSet {
    values: ArrayVec<f64, MAX_DISTRACTORS>,
    labels: ArrayVec<String, MAX_DISTRACTORS>,
}

impl DistractorSet {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Canonical answer mixed in with the distractors, shuffled
    pub fn choices<R: Rng + ?Sized>(&self, answer: &RoundedAnswer, rng: &mut R) -> Vec<String> {
        let mut choices = Vec::with_capacity(self.labels.len() + 1);
        choices.push(answer.text.clone());
        choices.extend(self.labels.iter().cloned());
        choices.shuffle(rng);
        choices
    }

    pub fn into_labels(self) -> Vec<String> {
        self.labels.into_iter().collect()
    }
}

/// Synthesises near misses one unit away in the last rounded digit.
///
/// - Decimal places: `± 10^(-precision)`
/// - Significant figures: `± 10^(floor(log10|correct|) - (precision - 1))`
///
/// Generation is bounded by the policy's attempt budget and stops early
/// once enough distinct values are collected.
pub struct DistractorGenerator {
    policy: DistractorPolicy,
}

impl DistractorGenerator {
    pub fn new(policy: DistractorPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DistractorPolicy {
        &self.policy
    }

    /// Decimal exponent of one unit in the last rounded digit.
    ///
    /// Zero has no leading digit; it is treated like a value in `[1, 10)`.
    pub fn unit_exponent(correct: f64, task: &Task) -> i32 {
        let precision = task.precision.get() as i32;
        match task.kind {
            TaskKind::DecimalPlaces => -precision,
            TaskKind::SignificantFigures => {
                let leading = if correct == 0.0 {
                    0
                } else {
                    correct.abs().log10().floor() as i32
                };
                leading - (precision - 1)
            },
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        answer: &RoundedAnswer,
        task: &Task,
        rng: &mut R,
    ) -> DistractorSet {
        let wanted = self.policy.count.min(MAX_DISTRACTORS);
        let mut set = DistractorSet::default();
        if wanted == 0 {
            return set;
        }

        let correct = answer.value;
        let exponent = Self::unit_exponent(correct, task);
        let unit = 10f64.powi(exponent);

        for attempt in 0..self.policy.max_attempts {
            let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            // Snap back onto the unit grid to shed float noise from the add
            let candidate = scale_round(correct + direction * unit, -exponent);

            if !self.accepts(candidate, correct, &set.values) {
                continue;
            }

            let label = answer.format_like(candidate);
            if label == answer.text || set.labels.contains(&label) {
                continue;
            }

            set.values.push(candidate);
            set.labels.push(label);

            if set.len() == wanted {
                tracing::trace!(attempts = attempt + 1, "distractor set complete");
                return set;
            }
        }

        tracing::trace!(
            collected = set.len(),
            wanted,
            "distractor attempts exhausted"
        );
        set
    }

    fn accepts(&self, candidate: f64, correct: f64, accepted: &[f64]) -> bool {
        let epsilon = self.policy.epsilon;
        if (candidate - correct).abs() <= epsilon {
            return false;
        }
        if self.policy.require_positive && candidate <= 0.0 {
            return false;
        }
        accepted.iter().all(|existing| (candidate - existing).abs() > epsilon)
    }
}

impl Default for DistractorGenerator {
    fn default() -> Self {
        Self::new(DistractorPolicy::default())
    }
}

/// Default-policy distractors for `answer`, using the thread-local RNG
pub fn distractors(answer: &RoundedAnswer, task: &Task) -> DistractorSet {
    DistractorGenerator::default().generate(answer, task, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generate(task: &Task, policy: DistractorPolicy, seed: u64) -> DistractorSet {
        let answer = task.canonical_answer();
        let mut rng = StdRng::seed_from_u64(seed);
        DistractorGenerator::new(policy).generate(&answer, task, &mut rng)
    }

    #[test]
    fn test_decimal_places_one_unit_away() {
        let task = Task::decimal_places(12.3, 1).unwrap();
        let set = generate(&task, DistractorPolicy::default(), 7);

        assert!(set.len() <= MAX_DISTRACTORS);
        assert!(!set.is_empty());
        for value in set.values() {
            assert!(((value - 12.3).abs() - 0.1).abs() < 1e-9);
        }
        for (i, a) in set.values().iter().enumerate() {
            for b in &set.values()[i + 1..] {
                assert!((a - b).abs() > 1e-10);
            }
        }
        // Only 12.2 and 12.4 exist one unit away
        assert_eq!(set.len(), 2);
        let mut labels = set.labels().to_vec();
        labels.sort();
        assert_eq!(labels, vec!["12.2".to_string(), "12.4".to_string()]);
    }

    #[test]
    fn test_significant_figures_unit() {
        let task = Task::significant_figures(4.567, 3).unwrap();
        let answer = task.canonical_answer();
        assert_eq!(DistractorGenerator::unit_exponent(answer.value, &task), -2);

        let set = generate(&task, DistractorPolicy::default(), 11);
        for label in set.labels() {
            assert!(label == "4.56" || label == "4.58", "unexpected {}", label);
        }
    }

    #[test]
    fn test_negative_significant_figures() {
        let task = Task::significant_figures(-0.012345, 3).unwrap();
        assert_eq!(task.expected(), "-0.0123");

        let set = generate(&task, DistractorPolicy::default(), 3);
        for label in set.labels() {
            assert!(label == "-0.0122" || label == "-0.0124", "unexpected {}", label);
        }
    }

    #[test]
    fn test_require_positive() {
        let task = Task::decimal_places(0.1, 1).unwrap();
        let policy = DistractorPolicy {
            require_positive: true,
            ..DistractorPolicy::default()
        };
        let set = generate(&task, policy, 5);
        assert_eq!(set.labels(), &["0.2".to_string()]);
    }

    #[test]
    fn test_exhausted_budget_returns_short_set() {
        let task = Task::decimal_places(5.5, 1).unwrap();
        let policy = DistractorPolicy {
            max_attempts: 0,
            ..DistractorPolicy::default()
        };
        assert!(generate(&task, policy, 1).is_empty());
    }

    #[test]
    fn test_count_limit() {
        let task = Task::decimal_places(5.5, 1).unwrap();
        let policy = DistractorPolicy {
            count: 1,
            ..DistractorPolicy::default()
        };
        assert_eq!(generate(&task, policy, 9).len(), 1);
    }

    #[test]
    fn test_free_function_uses_default_policy() {
        let task = Task::significant_figures(123.45, 2).unwrap();
        let answer = task.canonical_answer();
        assert_eq!(answer.text, "120");
        for label in distractors(&answer, &task).labels() {
            assert!(label == "110" || label == "130", "unexpected {}", label);
        }
    }

    #[test]
    fn test_choices_include_answer() {
        let task = Task::decimal_places(7.25, 1).unwrap();
        let answer = task.canonical_answer();
        let set = generate(&task, DistractorPolicy::default(), 21);
        let mut rng = StdRng::seed_from_u64(21);
        let choices = set.choices(&answer, &mut rng);

        assert_eq!(choices.len(), set.len() + 1);
        assert!(choices.contains(&answer.text));
    }
}
