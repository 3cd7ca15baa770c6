// ============================================================================
// Task Source Interface
// Defines the contract for pluggable task providers
// ============================================================================

use crate::domain::{Precision, Task, TaskId, TaskKind};

/// Strategy interface for producing the next task of a session.
/// Implementations: `TaskGenerator` (random), `ScriptedTaskSource` (fixed list).
pub trait TaskSource: Send {
    /// Produce the task for a round at `level` in the requested mode
    fn next_task(&mut self, level: u32, kind: TaskKind) -> Task;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Replays a fixed list of `(value, precision)` pairs, cycling at the end.
///
/// Useful for tutorials, replays and deterministic tests.
#[derive(Debug, Clone)]
pub struct ScriptedTaskSource {
    entries: Vec<(f64, Precision)>,
    cursor: usize,
}

impl ScriptedTaskSource {
    /// # Errors
    /// Rejects an empty script or non-finite values.
    pub fn new(entries: Vec<(f64, Precision)>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("Task script cannot be empty".to_string());
        }
        if entries.iter().any(|(value, _)| !value.is_finite()) {
            return Err("Task script values must be finite".to_string());
        }
        Ok(Self { entries, cursor: 0 })
    }

    /// A script that repeats one task forever
    pub fn repeating(value: f64, precision: Precision) -> Result<Self, String> {
        Self::new(vec![(value, precision)])
    }
}

impl TaskSource for ScriptedTaskSource {
    fn next_task(&mut self, _level: u32, kind: TaskKind) -> Task {
        let (value, precision) = self.entries[self.cursor % self.entries.len()];
        self.cursor = self.cursor.wrapping_add(1);
        Task {
            id: TaskId::new(),
            value,
            kind,
            precision,
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
