//! Room metrics
//!
//! Lock-free counters updated by the room task and readable from anywhere
//! through the room handle. Tick timing keeps a rolling window for
//! percentiles.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::game::game_loop::GameLoopEvent;
use crate::game::state::WorldState;

/// Samples kept for percentile calculation
const TICK_HISTORY_LEN: usize = 1000;

/// Metrics registry for one room
#[derive(Debug)]
pub struct Metrics {
    // Population
    pub players: AtomicU64,
    pub humans: AtomicU64,
    pub bots: AtomicU64,
    pub foods: AtomicU64,

    // Lifetime event counters
    pub bots_spawned: AtomicU64,
    pub foods_consumed: AtomicU64,
    pub absorptions: AtomicU64,

    // Simulation ticks executed
    pub tick_count: AtomicU64,

    // Driver invocation timing (microseconds)
    pub tick_time_us: AtomicU64,
    pub tick_time_p95_us: AtomicU64,
    pub tick_time_max_us: AtomicU64,

    start_time: Instant,

    // Rolling driver timings (VecDeque for O(1) pop_front)
    tick_history: RwLock<VecDeque<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            players: AtomicU64::new(0),
            humans: AtomicU64::new(0),
            bots: AtomicU64::new(0),
            foods: AtomicU64::new(0),
            bots_spawned: AtomicU64::new(0),
            foods_consumed: AtomicU64::new(0),
            absorptions: AtomicU64::new(0),
            tick_count: AtomicU64::new(0),
            tick_time_us: AtomicU64::new(0),
            tick_time_p95_us: AtomicU64::new(0),
            tick_time_max_us: AtomicU64::new(0),
            start_time: Instant::now(),
            tick_history: RwLock::new(VecDeque::with_capacity(TICK_HISTORY_LEN)),
        }
    }

    /// Record how long one driver invocation took and update percentiles
    pub fn record_tick_time(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.tick_time_us.store(us, Ordering::Relaxed);

        let mut history = self.tick_history.write();
        history.push_back(us);
        while history.len() > TICK_HISTORY_LEN {
            history.pop_front();
        }

        if history.len() >= 10 {
            let mut sorted: Vec<u64> = history.iter().copied().collect();
            sorted.sort_unstable();

            let p95_idx = (sorted.len() as f32 * 0.95) as usize;
            self.tick_time_p95_us
                .store(sorted[p95_idx.min(sorted.len() - 1)], Ordering::Relaxed);
            self.tick_time_max_us
                .store(sorted.last().copied().unwrap_or(0), Ordering::Relaxed);
        }
    }

    /// Refresh population gauges from the world
    pub fn record_state(&self, state: &WorldState) {
        self.players.store(state.player_count() as u64, Ordering::Relaxed);
        self.humans.store(state.human_count() as u64, Ordering::Relaxed);
        self.bots.store(state.bot_count() as u64, Ordering::Relaxed);
        self.foods.store(state.food_count() as u64, Ordering::Relaxed);
        self.tick_count.store(state.tick, Ordering::Relaxed);
    }

    /// Fold tick events into the lifetime counters
    pub fn record_events(&self, events: &[GameLoopEvent]) {
        for event in events {
            match event {
                GameLoopEvent::BotSpawned { .. } => {
                    self.bots_spawned.fetch_add(1, Ordering::Relaxed);
                }
                GameLoopEvent::FoodConsumed { .. } => {
                    self.foods_consumed.fetch_add(1, Ordering::Relaxed);
                }
                GameLoopEvent::PlayerAbsorbed { .. } => {
                    self.absorptions.fetch_add(1, Ordering::Relaxed);
                }
                GameLoopEvent::PlayerJoined { .. } | GameLoopEvent::PlayerLeft { .. } => {}
            }
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// One-line summary for periodic logging
    pub fn summary(&self) -> String {
        format!(
            "Room: {}s, tick {}, {} humans + {} bots, {} food | eaten {}, absorbed {} \
             | tick {}us (p95 {}us, max {}us)",
            self.uptime_seconds(),
            self.tick_count.load(Ordering::Relaxed),
            self.humans.load(Ordering::Relaxed),
            self.bots.load(Ordering::Relaxed),
            self.foods.load(Ordering::Relaxed),
            self.foods_consumed.load(Ordering::Relaxed),
            self.absorptions.load(Ordering::Relaxed),
            self.tick_time_us.load(Ordering::Relaxed),
            self.tick_time_p95_us.load(Ordering::Relaxed),
            self.tick_time_max_us.load(Ordering::Relaxed),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_record_tick_time_percentiles() {
        let metrics = Metrics::new();
        for us in 1..=100 {
            metrics.record_tick_time(Duration::from_micros(us));
        }
        assert_eq!(metrics.tick_time_us.load(Ordering::Relaxed), 100);
        assert_eq!(metrics.tick_time_max_us.load(Ordering::Relaxed), 100);
        assert_eq!(metrics.tick_time_p95_us.load(Ordering::Relaxed), 96);
    }

    #[test]
    fn test_tick_history_bounded() {
        let metrics = Metrics::new();
        for _ in 0..(TICK_HISTORY_LEN + 50) {
            metrics.record_tick_time(Duration::from_micros(5));
        }
        assert_eq!(metrics.tick_history.read().len(), TICK_HISTORY_LEN);
    }

    #[test]
    fn test_record_events() {
        let metrics = Metrics::new();
        let id = Uuid::new_v4();
        metrics.record_events(&[
            GameLoopEvent::BotSpawned { id, name: "Bot#1".to_string() },
            GameLoopEvent::FoodConsumed { player_id: id, food_id: 3 },
            GameLoopEvent::FoodConsumed { player_id: id, food_id: 4 },
            GameLoopEvent::PlayerAbsorbed { absorber_id: id, victim_id: Uuid::new_v4() },
            GameLoopEvent::PlayerLeft { player_id: id },
        ]);
        assert_eq!(metrics.bots_spawned.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.foods_consumed.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.absorptions.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_record_state_and_summary() {
        let metrics = Metrics::new();
        let mut state = WorldState::new();
        state.tick = 12;
        metrics.record_state(&state);
        assert_eq!(metrics.tick_count.load(Ordering::Relaxed), 12);
        assert!(metrics.summary().contains("tick 12"));
    }
}
