//! Room runtime
//!
//! Owns a [`Simulation`] inside a tokio task. The task samples real time on
//! a short interval, feeds it to the fixed-step clock and publishes the
//! latest snapshot. Everything else talks to the room through a
//! [`RoomHandle`]: events go in through the lock-free queue, snapshots come
//! out through a watch channel.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::{ConfigError, RoomConfig};
use crate::game::game_loop::Simulation;
use crate::game::input_buffer::{EventBufferError, EventSender};
use crate::game::snapshot::WorldSnapshot;
use crate::game::spawner::JoinOptions;
use crate::game::state::{EntitySet, Intent, PlayerId};
use crate::metrics::Metrics;

/// Room errors surfaced to the transport
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoomError {
    #[error("invalid room configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("room is full ({max_clients} clients)")]
    Full { max_clients: usize },
    #[error("room event queue is full")]
    QueueFull,
    #[error("room is closed")]
    Closed,
}

impl From<EventBufferError> for RoomError {
    fn from(err: EventBufferError) -> Self {
        match err {
            EventBufferError::Full => RoomError::QueueFull,
            EventBufferError::Disconnected => RoomError::Closed,
        }
    }
}

/// Starts room tasks
pub struct RoomRuntime;

impl RoomRuntime {
    /// Validate `config`, build the simulation and start its driver task.
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: RoomConfig) -> Result<RoomHandle, RoomError> {
        config.validate()?;

        let max_clients = config.max_clients;
        let driver_interval = Duration::from_millis(config.driver_interval_ms);
        let simulation = Simulation::new(config);

        let events = simulation.sender();
        let metrics = Arc::new(Metrics::new());
        metrics.record_state(simulation.state());
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(simulation.snapshot()));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(drive(
            simulation,
            driver_interval,
            snapshot_tx,
            metrics.clone(),
            shutdown_rx,
        ));

        Ok(RoomHandle {
            events,
            snapshots: snapshot_rx,
            metrics,
            max_clients,
            sessions: Mutex::new(EntitySet::default()),
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

/// Driver loop: runs until shutdown is signalled or the handle is dropped.
/// Each iteration is synchronous once woken, so an in-flight tick always
/// finishes before the loop observes shutdown.
async fn drive(
    mut simulation: Simulation,
    driver_interval: Duration,
    snapshots: watch::Sender<Arc<WorldSnapshot>>,
    metrics: Arc<Metrics>,
    mut shutdown: oneshot::Receiver<()>,
) -> Simulation {
    let mut ticker = interval(driver_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Room loop started: {}ms fixed step, driver every {}ms",
        simulation.config().fixed_step_ms,
        driver_interval.as_millis()
    );

    let mut last = Instant::now();
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let now = Instant::now();
                let elapsed_ms = now.duration_since(last).as_millis() as u64;
                // Carry the sub-millisecond remainder into the next sample
                last += Duration::from_millis(elapsed_ms);

                let started = std::time::Instant::now();
                let tick_before = simulation.state().tick;
                let events = simulation.on_tick(elapsed_ms);
                metrics.record_tick_time(started.elapsed());

                if simulation.state().tick != tick_before {
                    metrics.record_events(&events);
                    metrics.record_state(simulation.state());
                    snapshots.send_replace(Arc::new(simulation.snapshot()));
                }
            }
        }
    }

    info!("Room loop stopped at tick {}", simulation.state().tick);
    simulation
}

/// Handle to a running room
pub struct RoomHandle {
    events: EventSender,
    snapshots: watch::Receiver<Arc<WorldSnapshot>>,
    metrics: Arc<Metrics>,
    max_clients: usize,
    /// Sessions holding a client slot, including joins not yet applied
    sessions: Mutex<EntitySet<PlayerId>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Simulation>,
}

impl RoomHandle {
    /// Claim a client slot and queue the join; the player appears on the
    /// next tick. A session that already holds a slot re-joins without
    /// claiming another one.
    pub fn join(&self, session_id: PlayerId, options: JoinOptions) -> Result<(), RoomError> {
        let mut sessions = self.sessions.lock();
        let claimed = sessions.insert(session_id);
        if claimed && sessions.len() > self.max_clients {
            sessions.remove(&session_id);
            debug!("Rejected session {}: room full", session_id);
            return Err(RoomError::Full {
                max_clients: self.max_clients,
            });
        }

        self.events.join(session_id, options).map_err(|err| {
            if claimed {
                sessions.remove(&session_id);
            }
            RoomError::from(err)
        })
    }

    /// Release the session's slot and queue its removal
    pub fn leave(&self, session_id: PlayerId) -> Result<(), RoomError> {
        self.sessions.lock().remove(&session_id);
        Ok(self.events.leave(session_id)?)
    }

    /// Queue an intent; a later intent for the same session overwrites it
    pub fn input(&self, session_id: PlayerId, intent: Intent) -> Result<(), RoomError> {
        Ok(self.events.input(session_id, intent)?)
    }

    /// Event sender for session handlers. Joins sent through it skip the
    /// client limit; use [`RoomHandle::join`] for admission.
    pub fn sender(&self) -> EventSender {
        self.events.clone()
    }

    /// Receiver that always holds the latest snapshot
    pub fn subscribe(&self) -> watch::Receiver<Arc<WorldSnapshot>> {
        self.snapshots.clone()
    }

    pub fn latest_snapshot(&self) -> Arc<WorldSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    /// Sessions holding a client slot
    pub fn client_count(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Admission hint: a new session would get a slot
    pub fn has_capacity(&self) -> bool {
        self.client_count() < self.max_clients
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the driver, wait for it and return the final world snapshot
    pub async fn shutdown(mut self) -> Result<WorldSnapshot, RoomError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let simulation = self.task.await.map_err(|_| RoomError::Closed)?;
        Ok(simulation.snapshot())
    }
}
