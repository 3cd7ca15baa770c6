// ============================================================================
// Session Machine
// Owns the session and sequences rounds, penalties, rewards and timers
// ============================================================================

use crate::domain::{
    AnswerFormat, FeedbackMessage, GameConfig, Phase, PhaseTransition, RoundedAnswer, Session,
    SessionAction, SessionError, SessionSnapshot, Task, TaskKind,
};
use crate::engine::answer_checker::{AnswerChecker, Hint};
use crate::engine::distractors::DistractorGenerator;
use crate::engine::scheduler::{DeferredAction, Fired, Scheduler};
use crate::interfaces::{EventHandler, SessionEvent, TaskSource};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::Duration;

/// Events produced by a single operation
pub type EventBatch = SmallVec<[SessionEvent; 4]>;

/// Result of an accepted session operation
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Counters after the operation
    pub snapshot: SessionSnapshot,
    /// Text for the player, if the operation produced any
    pub message: Option<FeedbackMessage>,
    /// Revealed character, for hint operations
    pub hint: Option<Hint>,
    pub events: EventBatch,
}

enum Loss {
    Wrong,
    Timeout,
}

/// Single-threaded session state machine.
///
/// Time only moves through [`SessionMachine::advance`]; the driver decides
/// whether that is wall-clock time or a test clock. User operations outside
/// their phase return an error and leave the session unchanged.
pub struct SessionMachine {
    config: GameConfig,
    session: Session,
    scheduler: Scheduler,
    tasks: Box<dyn TaskSource>,
    distractors: DistractorGenerator,
    rng: StdRng,
    event_handler: Arc<dyn EventHandler>,
    choices: Vec<String>,
    last_message: Option<FeedbackMessage>,
}

impl SessionMachine {
    /// Create an idle machine. The configuration is expected to be valid;
    /// use the factory to validate it.
    pub fn new(
        config: GameConfig,
        tasks: Box<dyn TaskSource>,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self {
            session: Session::new(config.mode, config.starting_lives),
            scheduler: Scheduler::new(),
            tasks,
            distractors: DistractorGenerator::new(config.distractors),
            rng,
            event_handler,
            choices: Vec::new(),
            last_message: None,
            config,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.session.current_task()
    }

    pub fn current_answer(&self) -> Option<RoundedAnswer> {
        self.session.current_task().map(Task::canonical_answer)
    }

    /// Answer options for the current round in multiple-choice mode
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Most recent message, including ones produced by timers
    pub fn last_message(&self) -> Option<&FeedbackMessage> {
        self.last_message.as_ref()
    }

    pub fn countdown_active(&self) -> bool {
        self.scheduler.countdown_active()
    }

    pub fn pending_transition(&self) -> Option<DeferredAction> {
        self.scheduler.pending_deferred()
    }

    pub fn task_source_name(&self) -> &str {
        self.tasks.name()
    }

    // ========================================================================
    // Session operations
    // ========================================================================

    /// `Idle -> AwaitingAnswer` with fresh counters and the first task
    pub fn start(&mut self) -> Result<Outcome, SessionError> {
        self.ensure(Phase::Idle, SessionAction::Start)?;

        let mut events = EventBatch::new();
        self.session.apply(PhaseTransition::Start)?;
        self.session.id = crate::domain::SessionId::new();
        self.session.score = 0;
        self.session.lives = self.config.starting_lives;
        self.session.level = 1;
        self.session.round = 0;

        tracing::info!(
            session_id = %self.session.id.as_uuid(),
            mode = ?self.session.mode,
            source = self.tasks.name(),
            "session started"
        );
        events.push(SessionEvent::SessionStarted {
            session_id: self.session.id,
            mode: self.session.mode,
            timestamp: Utc::now(),
        });
        self.open_round(&mut events);

        Ok(self.finish(Some(FeedbackMessage::Prompt), None, events))
    }

    /// Grade the typed (or chosen) answer for the current round.
    ///
    /// Blank input is not graded; the round stays open.
    pub fn submit(&mut self, raw_input: &str) -> Result<Outcome, SessionError> {
        self.ensure_input(SessionAction::Submit)?;
        let task = self
            .session
            .current_task()
            .cloned()
            .ok_or(SessionError::NoCurrentTask)?;

        if raw_input.trim().is_empty() {
            return Ok(self.finish(Some(FeedbackMessage::EmptyAnswer), None, EventBatch::new()));
        }

        let expected = task.expected();
        let verdict = AnswerChecker::evaluate(&expected, raw_input);
        tracing::debug!(round = self.session.round, ?verdict, "answer graded");

        let mut events = EventBatch::new();
        let message = if verdict.is_correct() {
            self.resolve_correct(&mut events)?
        } else {
            self.resolve_loss(Loss::Wrong, expected, &mut events)?
        };
        Ok(self.finish(Some(message), None, events))
    }

    /// Reveal one character of the answer. Once per round.
    pub fn hint(&mut self, current_input: &str) -> Result<Outcome, SessionError> {
        self.ensure_input(SessionAction::Hint)?;
        if self.session.hint_used {
            return Err(SessionError::HintAlreadyUsed);
        }
        let task = self
            .session
            .current_task()
            .cloned()
            .ok_or(SessionError::NoCurrentTask)?;

        self.scheduler.stop_countdown();

        let expected = task.expected();
        let hint = AnswerChecker::hint_with_cost(&expected, current_input, self.config.hint_cost);
        self.session.charge(self.config.hint_cost);
        self.session.hint_used = true;
        self.session.time_left = self.session.time_left.max(self.config.hint_min_secs);
        self.scheduler.start_countdown();

        let message = match hint.character {
            Some(character) => FeedbackMessage::Hint {
                kind: task.kind,
                position: hint.index + 1,
                character,
            },
            None => FeedbackMessage::HintTooLong {
                answer_len: expected.chars().count(),
            },
        };

        let mut events = EventBatch::new();
        events.push(SessionEvent::HintUsed {
            round: self.session.round,
            index: hint.index,
            character: hint.character,
            timestamp: Utc::now(),
        });
        Ok(self.finish(Some(message), Some(hint), events))
    }

    /// Give up on the round: no life lost, score penalty, answer revealed
    pub fn skip(&mut self) -> Result<Outcome, SessionError> {
        self.ensure_input(SessionAction::Skip)?;
        let task = self
            .session
            .current_task()
            .cloned()
            .ok_or(SessionError::NoCurrentTask)?;

        // No late timeout may fire once the round has been given up
        self.scheduler.stop_countdown();
        self.session.apply(PhaseTransition::Resolve)?;
        self.session.charge(self.config.skip_cost);

        let expected = task.expected();
        let mut events = EventBatch::new();
        events.push(SessionEvent::Skipped {
            round: self.session.round,
            expected: expected.clone(),
            timestamp: Utc::now(),
        });
        self.scheduler
            .defer(DeferredAction::NextRound, self.config.feedback_delay);

        Ok(self.finish(Some(FeedbackMessage::Skipped { expected }), None, events))
    }

    /// `LevelTransition -> AwaitingAnswer`
    pub fn acknowledge_level_transition(&mut self) -> Result<Outcome, SessionError> {
        self.ensure(Phase::LevelTransition, SessionAction::AcknowledgeLevel)?;
        self.session.apply(PhaseTransition::NextRound)?;

        let mut events = EventBatch::new();
        self.open_round(&mut events);
        Ok(self.finish(Some(FeedbackMessage::Prompt), None, events))
    }

    /// Cancel every timer and return to `Idle`
    pub fn reset(&mut self) -> Result<Outcome, SessionError> {
        self.scheduler.cancel_all();
        self.session.apply(PhaseTransition::Reset)?;
        self.session.current = None;
        self.session.hint_used = false;
        self.session.time_left = 0;
        self.choices.clear();
        self.last_message = None;

        let mut events = EventBatch::new();
        events.push(SessionEvent::SessionReset {
            session_id: self.session.id,
            timestamp: Utc::now(),
        });
        Ok(self.finish(None, None, events))
    }

    /// Reset and start a fresh game from any phase
    pub fn restart(&mut self) -> Result<Outcome, SessionError> {
        let reset = self.reset()?;
        let mut started = self.start()?;
        let mut events = reset.events;
        events.extend(started.events.drain(..));
        started.events = events;
        Ok(started)
    }

    /// Switch between decimal places and significant figures.
    /// A game in progress restarts in the new mode.
    pub fn set_mode(&mut self, mode: TaskKind) -> Result<Outcome, SessionError> {
        self.session.mode = mode;
        self.config.mode = mode;
        if self.session.phase().is_playing() {
            self.restart()
        } else {
            Ok(self.finish(None, None, EventBatch::new()))
        }
    }

    // ========================================================================
    // Time
    // ========================================================================

    /// Let `elapsed` pass, firing countdown ticks, timeouts and deferred
    /// transitions in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let mut events = EventBatch::new();
        let mut remaining = elapsed;

        while let Some((consumed, fired)) = self.scheduler.poll(remaining) {
            remaining = remaining.saturating_sub(consumed);
            if let Err(err) = self.on_fired(fired, &mut events) {
                tracing::warn!(%err, ?fired, "scheduled transition rejected");
            }
        }

        let events = events.into_vec();
        if !events.is_empty() {
            self.event_handler.on_events(events.clone());
        }
        events
    }

    fn on_fired(&mut self, fired: Fired, events: &mut EventBatch) -> Result<(), SessionError> {
        match fired {
            Fired::Tick(_) => {
                self.session.time_left = self.session.time_left.saturating_sub(1);
                let seconds_remaining = self.session.time_left;
                tracing::trace!(seconds_remaining, "tick");
                self.event_handler.on_tick(seconds_remaining);
                events.push(SessionEvent::Tick {
                    seconds_remaining,
                    timestamp: Utc::now(),
                });

                if seconds_remaining == 0 {
                    self.event_handler.on_timeout();
                    let expected = self
                        .session
                        .current_task()
                        .map(Task::expected)
                        .ok_or(SessionError::NoCurrentTask)?;
                    let message = self.resolve_loss(Loss::Timeout, expected, events)?;
                    self.last_message = Some(message);
                }
            },
            Fired::Deferred(_, DeferredAction::NextRound) => {
                self.session.apply(PhaseTransition::NextRound)?;
                self.open_round(events);
                self.last_message = Some(FeedbackMessage::Prompt);
            },
            Fired::Deferred(_, DeferredAction::GameOver) => {
                self.session.apply(PhaseTransition::EndGame)?;
                tracing::info!(
                    score = self.session.score,
                    rounds = self.session.round,
                    "game over"
                );
                events.push(SessionEvent::GameOver {
                    score: self.session.score,
                    rounds: self.session.round,
                    timestamp: Utc::now(),
                });
                self.last_message = Some(FeedbackMessage::GameOver {
                    score: self.session.score,
                });
            },
        }
        Ok(())
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn ensure(&self, phase: Phase, action: SessionAction) -> Result<(), SessionError> {
        if self.session.phase() == phase {
            Ok(())
        } else {
            tracing::debug!(phase = ?self.session.phase(), ?action, "action ignored");
            Err(SessionError::IllegalAction {
                phase: self.session.phase(),
                action,
            })
        }
    }

    fn ensure_input(&self, action: SessionAction) -> Result<(), SessionError> {
        self.ensure(Phase::AwaitingAnswer, action)
    }

    /// Number the round, pick its task and start the countdown.
    /// The phase must already be `AwaitingAnswer`.
    fn open_round(&mut self, events: &mut EventBatch) {
        self.scheduler.cancel_deferred();

        self.session.round += 1;
        self.session.hint_used = false;
        let task = self
            .tasks
            .next_task(self.session.level, self.session.mode);
        self.session.time_left = self.config.round_duration(self.session.level);

        self.choices = match self.config.answer_format {
            AnswerFormat::FreeText => Vec::new(),
            AnswerFormat::MultipleChoice => {
                let answer = task.canonical_answer();
                let set = self.distractors.generate(&answer, &task, &mut self.rng);
                set.choices(&answer, &mut self.rng)
            },
        };

        tracing::debug!(
            round = self.session.round,
            level = self.session.level,
            value = task.value,
            kind = ?task.kind,
            precision = task.precision.get(),
            "round opened"
        );
        events.push(SessionEvent::RoundStarted {
            round: self.session.round,
            level: self.session.level,
            task: task.clone(),
            choices: self.choices.clone(),
            seconds: self.session.time_left,
            timestamp: Utc::now(),
        });

        self.session.current = Some(task);
        self.scheduler.start_countdown();
    }

    fn resolve_correct(&mut self, events: &mut EventBatch) -> Result<FeedbackMessage, SessionError> {
        self.scheduler.stop_countdown();
        self.session.apply(PhaseTransition::Resolve)?;

        let points = self.config.points_for(self.session.level);
        self.session.score = self.session.score.saturating_add(points);
        events.push(SessionEvent::AnswerAccepted {
            round: self.session.round,
            points,
            timestamp: Utc::now(),
        });

        if self.session.round % self.config.rounds_per_level != 0 {
            self.scheduler
                .defer(DeferredAction::NextRound, self.config.feedback_delay);
            return Ok(FeedbackMessage::Correct { points });
        }

        self.session.apply(PhaseTransition::LevelUp)?;
        self.session.level += 1;
        let (level, score) = (self.session.level, self.session.score);
        tracing::info!(level, score, "level up");
        events.push(SessionEvent::LevelUp {
            level,
            score,
            timestamp: Utc::now(),
        });
        Ok(FeedbackMessage::LevelUp { level, score })
    }

    fn resolve_loss(
        &mut self,
        loss: Loss,
        expected: String,
        events: &mut EventBatch,
    ) -> Result<FeedbackMessage, SessionError> {
        self.scheduler.stop_countdown();
        self.session.apply(PhaseTransition::Resolve)?;
        self.session.lives = self.session.lives.saturating_sub(1);

        let round = self.session.round;
        let lives = self.session.lives;
        let message = match loss {
            Loss::Wrong => {
                events.push(SessionEvent::AnswerRejected {
                    round,
                    expected: expected.clone(),
                    lives,
                    timestamp: Utc::now(),
                });
                FeedbackMessage::Wrong { expected }
            },
            Loss::Timeout => {
                events.push(SessionEvent::TimedOut {
                    round,
                    expected: expected.clone(),
                    lives,
                    timestamp: Utc::now(),
                });
                FeedbackMessage::TimeUp { expected }
            },
        };

        if lives == 0 {
            self.scheduler
                .defer(DeferredAction::GameOver, self.config.game_over_delay);
        } else {
            self.scheduler
                .defer(DeferredAction::NextRound, self.config.feedback_delay);
        }

        Ok(message)
    }

    fn finish(
        &mut self,
        message: Option<FeedbackMessage>,
        hint: Option<Hint>,
        events: EventBatch,
    ) -> Outcome {
        if message.is_some() {
            self.last_message = message.clone();
        }
        if !events.is_empty() {
            self.event_handler.on_events(events.to_vec());
        }
        Outcome {
            snapshot: self.session.snapshot(),
            message,
            hint,
            events,
        }
    }
}
