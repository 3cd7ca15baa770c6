// ============================================================================
// Property Tests
// Rounding, distractor and session invariants over generated inputs
// ============================================================================

use decimal_dash::domain::MAX_DISTRACTORS;
use decimal_dash::numeric::{
    format_decimal_places, format_significant_figures, round_to_significant_figures,
};
use decimal_dash::prelude::*;
use proptest::prelude::*;
use quickcheck::{quickcheck, TestResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

fn significant_digits(text: &str) -> usize {
    text.trim_start_matches('-')
        .chars()
        .filter(|c| c.is_ascii_digit())
        .skip_while(|c| *c == '0')
        .count()
}

fn task_kind(sf: bool) -> TaskKind {
    if sf {
        TaskKind::SignificantFigures
    } else {
        TaskKind::DecimalPlaces
    }
}

proptest! {
    #[test]
    fn decimal_places_is_idempotent(value in -10_000.0f64..10_000.0, places in 1u32..=6) {
        let once = format_decimal_places(value, places).unwrap();
        let reparsed: f64 = once.parse().unwrap();
        let twice = format_decimal_places(reparsed, places).unwrap();
        prop_assert_eq!(&once, &twice);

        let fraction = once.split('.').nth(1).unwrap_or("");
        prop_assert_eq!(fraction.len(), places as usize);
    }

    #[test]
    fn significant_figures_digit_count(value in 0.1f64..1000.0, sig in 1u32..=6, negative in any::<bool>()) {
        let value = if negative { -value } else { value };
        let exponent = value.abs().log10();
        // Exact powers of ten and carries over a power of ten print one extra digit
        prop_assume!(exponent.fract() != 0.0);
        let leading = exponent.ceil() as i32;
        prop_assume!(sig as i32 >= leading);
        let rounded = round_to_significant_figures(value, sig).unwrap();
        prop_assume!(rounded.abs() < 10f64.powi(leading));

        let text = format_significant_figures(value, sig).unwrap();
        prop_assert_eq!(significant_digits(&text), sig as usize, "{} @ {} -> {}", value, sig, text);
        prop_assert_eq!(text.starts_with('-'), negative);
    }

    #[test]
    fn distractors_are_distinct_near_misses(
        value in 0.1f64..1000.0,
        precision in 1u32..=6,
        sf in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let task = Task::new(value, task_kind(sf), Precision::new(precision).unwrap()).unwrap();
        let answer = task.canonical_answer();
        let mut rng = StdRng::seed_from_u64(seed);
        let set = DistractorGenerator::default().generate(&answer, &task, &mut rng);

        prop_assert!(set.len() <= MAX_DISTRACTORS);
        for (i, label) in set.labels().iter().enumerate() {
            prop_assert_ne!(label, &answer.text);
            prop_assert!(!set.labels()[i + 1..].contains(label));
        }
        for value in set.values() {
            prop_assert!((value - answer.value).abs() > 1e-10);
        }
    }

    #[test]
    fn canonical_answer_always_accepted(value in -1000.0f64..1000.0, precision in 1u32..=6, sf in any::<bool>()) {
        let task = Task::new(value, task_kind(sf), Precision::new(precision).unwrap()).unwrap();
        let expected = task.expected();
        prop_assert!(check_answer(&task, &expected));
        let padded = format!("  {}\t", expected);
        prop_assert!(check_answer(&task, &padded));
    }
}


fn play(ops: Vec<u8>) -> TestResult {
    let source = ScriptedTaskSource::repeating(7.25, Precision::new(1).unwrap()).unwrap();
    let mut machine = SessionMachineBuilder::new()
        .with_task_source(Box::new(source))
        .with_event_handler(Arc::new(NoOpEventHandler))
        .build()
        .unwrap();
    if machine.start().is_err() {
        return TestResult::failed();
    }

    let mut previous_lives = machine.snapshot().lives;
    for op in ops {
        // Rejected actions are part of the property: they must not change state
        let _ = match op % 6 {
            0 => machine.submit("7.3"),
            1 => machine.submit("7.2"),
            2 => machine.hint(""),
            3 => machine.skip(),
            4 => machine.acknowledge_level_transition(),
            _ => {
                machine.advance(Duration::from_millis(1_600));
                continue;
            },
        };

        let snapshot = machine.snapshot();
        if snapshot.lives > previous_lives || snapshot.lives > 3 || snapshot.level == 0 {
            return TestResult::failed();
        }
        if snapshot.phase == Phase::GameOver && snapshot.lives != 0 {
            return TestResult::failed();
        }
        if snapshot.lives == 0 && snapshot.phase.accepts_input() {
            return TestResult::failed();
        }
        previous_lives = snapshot.lives;
    }
    TestResult::passed()
}

#[test]
fn session_invariants_hold_for_any_input_sequence() {
    quickcheck(play as fn(Vec<u8>) -> TestResult);
}

fn penalties_only(ops: Vec<bool>) -> bool {
    let source = ScriptedTaskSource::repeating(1.5, Precision::new(1).unwrap()).unwrap();
    let mut machine = SessionMachineBuilder::new()
        .with_task_source(Box::new(source))
        .build()
        .unwrap();
    if machine.start().is_err() {
        return false;
    }

    for hint_first in ops {
        if hint_first && machine.hint("").is_err() {
            return false;
        }
        if machine.skip().is_err() {
            return false;
        }
        machine.advance(Duration::from_millis(1_500));
        if machine.snapshot().score != 0 {
            return false;
        }
    }
    machine.snapshot().lives == 3
}

#[test]
fn score_never_drops_below_zero() {
    quickcheck(penalties_only as fn(Vec<bool>) -> bool);
}
