//! Entity store
//!
//! Owns every Player and Food of a room for the room's lifetime, plus the
//! bot roster kept in lockstep with player insertion/removal.

use hashbrown::{HashMap, HashSet};
use rustc_hash::FxBuildHasher;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::constants::{food, player};
use crate::util::vec2::Vec2;

/// Unique player identifier (session id for humans, RNG-built for bots)
pub type PlayerId = Uuid;

/// Food identifier; stable for the room's lifetime, reused on respawn
pub type FoodId = u32;

/// Map with a fixed hasher so iteration order only depends on insertion history
pub type EntityMap<K, V> = HashMap<K, V, FxBuildHasher>;

/// Set counterpart of [`EntityMap`]
pub type EntitySet<K> = HashSet<K, FxBuildHasher>;

/// Directional intent: four independent flags, replaced wholesale on every input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Intent {
    pub fn new(left: bool, right: bool, up: bool, down: bool) -> Self {
        Self { left, right, up, down }
    }

    /// Raw (unnormalized) direction: each active flag contributes ±1 on its axis
    pub fn raw_direction(&self) -> Vec2 {
        let mut direction = Vec2::ZERO;
        if self.left {
            direction.x -= 1.0;
        }
        if self.right {
            direction.x += 1.0;
        }
        if self.up {
            direction.y -= 1.0;
        }
        if self.down {
            direction.y += 1.0;
        }
        direction
    }
}

/// A human or bot blob
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Center position in world space
    pub position: Vec2,
    /// Collision radius; only ever grows while the player is alive
    pub radius: f32,
    /// 24-bit RGB display color
    pub color: u32,
    pub is_bot: bool,
    /// Latest directional intent; `None` means "stand still"
    pub latest_input: Option<Intent>,
    /// Bots only: simulation time (ms) at which the next decision is allowed
    pub reaction_timer: u64,
    name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: String, is_bot: bool, position: Vec2, color: u32) -> Self {
        Self {
            id,
            position,
            radius: player::STARTING_RADIUS,
            color,
            is_bot,
            latest_input: None,
            reaction_timer: 0,
            name,
        }
    }

    /// Display name, fixed at creation
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A food pellet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: FoodId,
    pub position: Vec2,
    pub radius: f32,
    pub color: u32,
}

impl Food {
    pub fn new(id: FoodId, position: Vec2, color: u32) -> Self {
        Self {
            id,
            position,
            radius: food::RADIUS,
            color,
        }
    }
}

/// Complete world state of one room
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorldState {
    /// Number of fixed ticks executed so far
    pub tick: u64,
    pub(crate) players: EntityMap<PlayerId, Player>,
    pub(crate) foods: EntityMap<FoodId, Food>,
    /// Ids of bot-controlled players
    pub(crate) bots: EntitySet<PlayerId>,
    /// Bots ever created in this room; never decremented
    bots_created: u32,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a player, keyed by `player.id`.
    /// Bot players join the roster in the same step.
    pub fn upsert_player(&mut self, player: Player) {
        if player.is_bot {
            self.bots.insert(player.id);
        } else {
            self.bots.remove(&player.id);
        }
        self.players.insert(player.id, player);
    }

    /// Remove a player and its roster entry together
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        self.bots.remove(&id);
        self.players.remove(&id)
    }

    /// Insert or replace a food, keyed by `food.id`
    pub fn upsert_food(&mut self, food: Food) {
        self.foods.insert(food.id, food);
    }

    pub fn remove_food(&mut self, id: FoodId) -> Option<Food> {
        self.foods.remove(&id)
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn get_food(&self, id: FoodId) -> Option<&Food> {
        self.foods.get(&id)
    }

    /// Iterate players in no particular order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Iterate food in no particular order
    pub fn foods(&self) -> impl Iterator<Item = &Food> {
        self.foods.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn food_count(&self) -> usize {
        self.foods.len()
    }

    pub fn bot_count(&self) -> usize {
        self.bots.len()
    }

    pub fn human_count(&self) -> usize {
        self.players.values().filter(|p| !p.is_bot).count()
    }

    pub fn is_bot(&self, id: PlayerId) -> bool {
        self.bots.contains(&id)
    }

    /// Snapshot of roster ids, safe to hold while mutating players
    pub fn bot_ids(&self) -> Vec<PlayerId> {
        self.bots.iter().copied().collect()
    }

    /// Claim the next bot number (1-based, never reused)
    pub fn next_bot_number(&mut self) -> u32 {
        self.bots_created += 1;
        self.bots_created
    }

    pub fn bots_created(&self) -> u32 {
        self.bots_created
    }

    /// Drop roster entries that no longer reference a live bot.
    /// Returns how many stale entries were removed.
    pub fn heal_roster(&mut self) -> usize {
        let players = &self.players;
        let before = self.bots.len();
        self.bots.retain(|id| {
            let live = players.get(id).is_some_and(|p| p.is_bot);
            if !live {
                tracing::warn!("Dropping stale bot roster entry {}", id);
            }
            live
        });
        before - self.bots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_player(is_bot: bool) -> Player {
        Player::new(Uuid::new_v4(), "Test".to_string(), is_bot, Vec2::new(100.0, 100.0), 0xffffff)
    }

    #[test]
    fn test_player_new() {
        let player = make_player(false);
        assert_eq!(player.radius, player::STARTING_RADIUS);
        assert_eq!(player.name(), "Test");
        assert!(player.latest_input.is_none());
        assert_eq!(player.reaction_timer, 0);
    }

    #[test]
    fn test_intent_raw_direction() {
        assert_eq!(Intent::default().raw_direction(), Vec2::ZERO);
        assert_eq!(Intent::new(true, false, true, false).raw_direction(), Vec2::new(-1.0, -1.0));
        assert_eq!(Intent::new(false, true, false, true).raw_direction(), Vec2::new(1.0, 1.0));
        // Opposing flags cancel out
        assert_eq!(Intent::new(true, true, true, true).raw_direction(), Vec2::ZERO);
    }

    #[test]
    fn test_upsert_and_remove_player() {
        let mut state = WorldState::new();
        let player = make_player(false);
        let id = player.id;

        state.upsert_player(player);
        assert!(state.get_player(id).is_some());
        assert_eq!(state.player_count(), 1);
        assert_eq!(state.human_count(), 1);
        assert_eq!(state.bot_count(), 0);

        let removed = state.remove_player(id);
        assert!(removed.is_some());
        assert!(state.get_player(id).is_none());
        assert!(state.remove_player(id).is_none());
    }

    #[test]
    fn test_bot_roster_lockstep() {
        let mut state = WorldState::new();
        let bot = make_player(true);
        let id = bot.id;

        state.upsert_player(bot);
        assert!(state.is_bot(id));
        assert_eq!(state.bot_ids(), vec![id]);

        state.remove_player(id);
        assert!(!state.is_bot(id));
        assert_eq!(state.bot_count(), 0);
    }

    #[test]
    fn test_upsert_food_replaces_same_id() {
        let mut state = WorldState::new();
        state.upsert_food(Food::new(7, Vec2::new(1.0, 1.0), 0));
        state.upsert_food(Food::new(7, Vec2::new(2.0, 2.0), 0));

        assert_eq!(state.food_count(), 1);
        assert_eq!(state.get_food(7).map(|f| f.position), Some(Vec2::new(2.0, 2.0)));
        assert!(state.remove_food(7).is_some());
        assert_eq!(state.food_count(), 0);
    }

    #[test]
    fn test_bot_numbers_never_reused() {
        let mut state = WorldState::new();
        assert_eq!(state.next_bot_number(), 1);
        assert_eq!(state.next_bot_number(), 2);
        assert_eq!(state.bots_created(), 2);
    }

    #[test]
    fn test_heal_roster_drops_stale_entries() {
        let mut state = WorldState::new();
        let bot = make_player(true);
        let bot_id = bot.id;
        state.upsert_player(bot);

        let ghost = Uuid::new_v4();
        state.bots.insert(ghost);
        assert_eq!(state.bot_count(), 2);

        assert_eq!(state.heal_roster(), 1);
        assert_eq!(state.bot_ids(), vec![bot_id]);
        assert_eq!(state.heal_roster(), 0);
    }

    #[test]
    fn test_serialization() {
        let mut state = WorldState::new();
        state.upsert_player(make_player(true));
        state.upsert_food(Food::new(0, Vec2::new(5.0, 5.0), 0x00ff00));

        let encoded = bincode::serde::encode_to_vec(&state, bincode::config::standard()).unwrap();
        let (decoded, _): (WorldState, usize) =
            bincode::serde::decode_from_slice(&encoded, bincode::config::standard()).unwrap();
        assert_eq!(decoded.player_count(), 1);
        assert_eq!(decoded.food_count(), 1);
        assert_eq!(decoded.bot_count(), 1);
    }
}
