//! Lock-free event buffer between session handlers and the simulation
//!
//! Uses crossbeam-channel for lock-free MPSC communication. Handlers
//! submit joins, leaves and inputs at any time; the simulation drains
//! everything at the start of the next fixed tick, in submission order.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::game::spawner::JoinOptions;
use crate::game::state::{Intent, PlayerId};

/// Session-level event addressed to a room
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    Join {
        session_id: PlayerId,
        options: JoinOptions,
    },
    Leave {
        session_id: PlayerId,
    },
    Input {
        session_id: PlayerId,
        intent: Intent,
    },
}

impl RoomEvent {
    pub fn session_id(&self) -> PlayerId {
        match self {
            RoomEvent::Join { session_id, .. }
            | RoomEvent::Leave { session_id }
            | RoomEvent::Input { session_id, .. } => *session_id,
        }
    }
}

/// Bounded event buffer
///
/// Every handler holds its own [`EventSender`] clone; the simulation owns
/// the buffer and drains it once per tick.
pub struct EventBuffer {
    sender: Sender<RoomEvent>,
    receiver: Receiver<RoomEvent>,
    capacity: usize,
}

impl EventBuffer {
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Create a new sender handle for a session handler
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Submit an event from the owning side (non-blocking)
    #[inline]
    pub fn try_submit(&self, event: RoomEvent) -> Result<(), EventBufferError> {
        self.sender.try_send(event).map_err(EventBufferError::from)
    }

    /// Drain all pending events for this tick
    pub fn drain(&self) -> Vec<RoomEvent> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBuffer {
    fn default() -> Self {
        Self::new(crate::game::constants::room::EVENT_QUEUE_CAPACITY)
    }
}

/// Clonable sender handle for session handlers
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<RoomEvent>,
}

impl EventSender {
    /// Submit an event (non-blocking); fails when the buffer is full or the
    /// simulation is gone
    #[inline]
    pub fn try_send(&self, event: RoomEvent) -> Result<(), EventBufferError> {
        self.sender.try_send(event).map_err(EventBufferError::from)
    }

    pub fn join(&self, session_id: PlayerId, options: JoinOptions) -> Result<(), EventBufferError> {
        self.try_send(RoomEvent::Join { session_id, options })
    }

    pub fn leave(&self, session_id: PlayerId) -> Result<(), EventBufferError> {
        self.try_send(RoomEvent::Leave { session_id })
    }

    pub fn input(&self, session_id: PlayerId, intent: Intent) -> Result<(), EventBufferError> {
        self.try_send(RoomEvent::Input { session_id, intent })
    }
}

/// Event buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EventBufferError {
    /// Buffer is full (backpressure)
    #[error("event buffer is full")]
    Full,
    /// Receiver dropped (simulation stopped)
    #[error("event buffer is disconnected")]
    Disconnected,
}

impl<T> From<TrySendError<T>> for EventBufferError {
    fn from(err: TrySendError<T>) -> Self {
        match err {
            TrySendError::Full(_) => EventBufferError::Full,
            TrySendError::Disconnected(_) => EventBufferError::Disconnected,
        }
    }
}
