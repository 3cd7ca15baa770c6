// ============================================================================
// Event Handler Interface
// Defines the contract for observing session events
// ============================================================================

use crate::domain::{SessionId, Task, TaskKind};
use chrono::{DateTime, Utc};
use crossbeam::channel::{self, Receiver, Sender};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the session machine
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SessionEvent {
    /// A fresh game began
    SessionStarted {
        session_id: SessionId,
        mode: TaskKind,
        timestamp: DateTime<Utc>,
    },

    /// A task became current and its countdown started
    RoundStarted {
        round: u32,
        level: u32,
        task: Task,
        /// Shuffled answer options in multiple-choice mode, empty otherwise
        choices: Vec<String>,
        seconds: u32,
        timestamp: DateTime<Utc>,
    },

    /// One second of the countdown elapsed
    Tick {
        seconds_remaining: u32,
        timestamp: DateTime<Utc>,
    },

    AnswerAccepted {
        round: u32,
        points: u32,
        timestamp: DateTime<Utc>,
    },

    AnswerRejected {
        round: u32,
        expected: String,
        lives: u32,
        timestamp: DateTime<Utc>,
    },

    TimedOut {
        round: u32,
        expected: String,
        lives: u32,
        timestamp: DateTime<Utc>,
    },

    /// A hint revealed one character (`None` when the input is too long)
    HintUsed {
        round: u32,
        index: usize,
        character: Option<char>,
        timestamp: DateTime<Utc>,
    },

    Skipped {
        round: u32,
        expected: String,
        timestamp: DateTime<Utc>,
    },

    /// Level increased; waiting for acknowledgement
    LevelUp {
        level: u32,
        score: u32,
        timestamp: DateTime<Utc>,
    },

    GameOver {
        score: u32,
        rounds: u32,
        timestamp: DateTime<Utc>,
    },

    /// Session returned to idle, all timers cancelled
    SessionReset {
        session_id: SessionId,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing session events.
/// Implementations can drive rendering, audio, logging, etc.
pub trait EventHandler: Send + Sync {
    /// Handle a session event
    fn on_event(&self, event: SessionEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<SessionEvent>) {
        for event in events {
            self.on_event(event);
        }
    }

    /// Countdown callback, fired after every elapsed second
    fn on_tick(&self, _seconds_remaining: u32) {}

    /// Fired once when a round's countdown reaches zero
    fn on_timeout(&self) {}
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: SessionEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: SessionEvent) {
        tracing::debug!("Session event: {:?}", event);
    }

    fn on_timeout(&self) {
        tracing::debug!("Round timed out");
    }
}

/// Forwards events to a channel, e.g. a render thread
pub struct ChannelEventHandler {
    sender: Sender<SessionEvent>,
}

impl ChannelEventHandler {
    pub fn new(sender: Sender<SessionEvent>) -> Self {
        Self { sender }
    }

    /// Handler plus the receiving end of an unbounded channel
    pub fn unbounded() -> (Self, Receiver<SessionEvent>) {
        let (sender, receiver) = channel::unbounded();
        (Self::new(sender), receiver)
    }
}

impl EventHandler for ChannelEventHandler {
    fn on_event(&self, event: SessionEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("Session event dropped: receiver gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_handler() {
        let handler = NoOpEventHandler;
        handler.on_event(SessionEvent::SessionReset {
            session_id: SessionId::new(),
            timestamp: Utc::now(),
        });
        handler.on_tick(3);
        handler.on_timeout();
        // Should not panic
    }

    #[test]
    fn test_channel_handler_forwards_batches() {
        let (handler, receiver) = ChannelEventHandler::unbounded();
        handler.on_events(vec![
            SessionEvent::Tick {
                seconds_remaining: 2,
                timestamp: Utc::now(),
            },
            SessionEvent::Tick {
                seconds_remaining: 1,
                timestamp: Utc::now(),
            },
        ]);

        let received: Vec<_> = receiver.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert!(matches!(
            received[1],
            SessionEvent::Tick {
                seconds_remaining: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_channel_handler_survives_dropped_receiver() {
        let (handler, receiver) = ChannelEventHandler::unbounded();
        drop(receiver);
        handler.on_event(SessionEvent::GameOver {
            score: 0,
            rounds: 3,
            timestamp: Utc::now(),
        });
    }
}
