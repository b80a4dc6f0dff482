//! Room simulation: the per-room aggregate and its fixed-tick schedule
//!
//! Tick order:
//! 1. Apply queued joins, leaves and inputs (arrival order)
//! 2. Self-heal: stale roster entries, non-finite positions
//! 3. Auto-populate: at most one bot per tick below target occupancy
//! 4. Bot decisions (on their own reaction timers)
//! 5. Movement for every player
//! 6. Food pass, then player pass
//! 7. Bounds pass, tick counter

use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use tracing::{debug, info, warn};

use crate::config::RoomConfig;
use crate::game::clock::FixedStepClock;
use crate::game::constants::player;
use crate::game::input_buffer::{EventBuffer, EventSender, RoomEvent};
use crate::game::snapshot::WorldSnapshot;
use crate::game::spawner::{self, JoinOptions};
use crate::game::state::{FoodId, Intent, PlayerId, WorldState};
use crate::game::systems::{ai, collision, movement};

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameLoopEvent {
    PlayerJoined { player_id: PlayerId, name: String },
    PlayerLeft { player_id: PlayerId },
    BotSpawned { id: PlayerId, name: String },
    FoodConsumed { player_id: PlayerId, food_id: FoodId },
    PlayerAbsorbed { absorber_id: PlayerId, victim_id: PlayerId },
}

/// One room's world plus everything needed to advance it
pub struct Simulation {
    config: RoomConfig,
    state: WorldState,
    rng: ChaCha12Rng,
    clock: FixedStepClock,
    events: EventBuffer,
    seed: u64,
}

impl Simulation {
    /// Create a room and stock it with its food population.
    /// Without a configured seed, one is drawn from OS entropy.
    pub fn new(config: RoomConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha12Rng::seed_from_u64(seed);
        let mut state = WorldState::new();
        spawner::populate_food(&mut state, &config, &mut rng);

        info!(
            "Room created: {}x{} world, {} food, seed {}",
            config.world_width, config.world_height, config.food_count, seed
        );

        Self {
            clock: FixedStepClock::new(config.fixed_step_ms),
            events: EventBuffer::default(),
            config,
            state,
            rng,
            seed,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Handle for submitting events applied at the start of the next tick
    pub fn sender(&self) -> EventSender {
        self.events.sender()
    }

    /// Admission hint for the transport: room below its human limit
    pub fn has_capacity(&self) -> bool {
        self.state.human_count() < self.config.max_clients
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.state)
    }

    /// Create (or replace) the human player for `session_id`
    pub fn on_join(&mut self, session_id: PlayerId, options: &JoinOptions) -> GameLoopEvent {
        let human = spawner::spawn_human(session_id, options, &self.config, &mut self.rng);
        let name = human.name().to_string();
        if self.state.get_player(session_id).is_some() {
            debug!("Session {} re-joined, replacing player", session_id);
        }
        self.state.upsert_player(human);
        debug!("Player {} ({}) joined", name, session_id);
        GameLoopEvent::PlayerJoined {
            player_id: session_id,
            name,
        }
    }

    /// Remove the player for `session_id`; unknown sessions are ignored
    pub fn on_leave(&mut self, session_id: PlayerId) -> Option<GameLoopEvent> {
        let removed = self.state.remove_player(session_id)?;
        debug!("Player {} ({}) left", removed.name(), session_id);
        Some(GameLoopEvent::PlayerLeft {
            player_id: session_id,
        })
    }

    /// Replace a human's intent wholesale. Returns false when there is no
    /// live human for the session (late input, bot id).
    pub fn on_input(&mut self, session_id: PlayerId, intent: Intent) -> bool {
        match self.state.get_player_mut(session_id) {
            Some(player) if !player.is_bot => {
                player.latest_input = Some(intent);
                true
            }
            _ => false,
        }
    }

    /// Feed real elapsed time; runs every fixed tick that became due
    pub fn on_tick(&mut self, elapsed_ms: u64) -> Vec<GameLoopEvent> {
        let due = self.clock.advance(elapsed_ms);
        let mut events = Vec::new();
        for _ in 0..due {
            events.extend(self.fixed_tick());
        }
        events
    }

    /// Run exactly one fixed tick
    pub fn fixed_tick(&mut self) -> Vec<GameLoopEvent> {
        let mut events = Vec::new();

        for event in self.events.drain() {
            self.apply_event(event, &mut events);
        }

        self.state.heal_roster();
        self.sanitize();

        if self.state.player_count() < self.config.target_occupancy {
            let bot = spawner::spawn_bot(&mut self.state, &self.config, &mut self.rng);
            let (id, name) = (bot.id, bot.name().to_string());
            self.state.upsert_player(bot);
            debug!("Spawned {} ({})", name, id);
            events.push(GameLoopEvent::BotSpawned { id, name });
        }

        let now_ms = self.clock.sim_time_ms(self.state.tick);
        ai::update_bots(&mut self.state, now_ms, &mut self.rng);

        movement::update(&mut self.state, &self.config, self.config.fixed_step_secs());

        for eaten in collision::resolve_food(&mut self.state, &self.config, &mut self.rng) {
            events.push(GameLoopEvent::FoodConsumed {
                player_id: eaten.player_id,
                food_id: eaten.food_id,
            });
        }
        for absorption in collision::resolve_players(&mut self.state) {
            debug!("Player {} absorbed {}", absorption.absorber_id, absorption.victim_id);
            events.push(GameLoopEvent::PlayerAbsorbed {
                absorber_id: absorption.absorber_id,
                victim_id: absorption.victim_id,
            });
        }

        movement::enforce_bounds(&mut self.state, &self.config);
        self.state.tick += 1;

        events
    }

    fn apply_event(&mut self, event: RoomEvent, events: &mut Vec<GameLoopEvent>) {
        match event {
            RoomEvent::Join {
                session_id,
                options,
            } => events.push(self.on_join(session_id, &options)),
            RoomEvent::Leave { session_id } => events.extend(self.on_leave(session_id)),
            RoomEvent::Input { session_id, intent } => {
                self.on_input(session_id, intent);
            }
        }
    }

    /// Reset non-finite positions and invalid radii so one corrupt entity
    /// can't poison the whole tick
    fn sanitize(&mut self) -> usize {
        let mut fixed = 0;
        for player in self.state.players.values_mut() {
            if !player.radius.is_finite() || player.radius <= 0.0 {
                warn!("Fixed invalid radius for player {}", player.id);
                player.radius = player::STARTING_RADIUS;
                fixed += 1;
            }
            if !player.position.is_finite() {
                warn!("Fixed NaN position for player {}", player.id);
                let position = spawner::random_position(
                    &mut self.rng,
                    self.config.world_width,
                    self.config.world_height,
                );
                player.position = spawner::clamp_to_world(position, player.radius, &self.config);
                fixed += 1;
            }
        }
        fixed
    }
}
