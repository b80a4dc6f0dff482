//! Spawner: food, bots and humans at random positions
//!
//! Every function takes the room RNG explicitly so a seeded room
//! reproduces the same world.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RoomConfig;
use crate::game::constants::{bot, food, player};
use crate::game::state::{Food, FoodId, Player, PlayerId, WorldState};
use crate::util::vec2::Vec2;

/// Options a client supplies when joining
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOptions {
    pub username: Option<String>,
}

impl JoinOptions {
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    /// Username to display, falling back to the default for missing/blank names
    pub fn display_name(&self) -> String {
        match self.username.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => player::DEFAULT_NAME.to_string(),
        }
    }
}

/// Uniform position in `[0, width) x [0, height)`
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Vec2 {
    Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height)
}

/// Any 24-bit RGB color
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(0..food::COLOR_RANGE)
}

/// Light color: every channel drawn from the pastel range
pub fn pastel_color<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    let mut channel = || rng.gen_range(player::PASTEL_CHANNEL_MIN..=player::PASTEL_CHANNEL_MAX);
    let r = channel();
    let g = channel();
    let b = channel();
    (r << 16) | (g << 8) | b
}

/// Build a food under `id` at a random world position
pub fn spawn_food<R: Rng + ?Sized>(id: FoodId, config: &RoomConfig, rng: &mut R) -> Food {
    let position = random_position(rng, config.world_width, config.world_height);
    Food::new(id, position, random_color(rng))
}

/// Fill the store with the configured food population (ids `0..food_count`)
pub fn populate_food<R: Rng + ?Sized>(state: &mut WorldState, config: &RoomConfig, rng: &mut R) {
    for id in (0..FoodId::MAX).take(config.food_count) {
        state.upsert_food(spawn_food(id, config, rng));
    }
}

/// Build a new bot named after the room's bot counter.
///
/// The counter is claimed here, so every call yields a fresh name even if
/// the caller discards the bot.
pub fn spawn_bot<R: Rng + ?Sized>(
    state: &mut WorldState,
    config: &RoomConfig,
    rng: &mut R,
) -> Player {
    let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
    let position = random_position(rng, config.world_width, config.world_height);
    let color = pastel_color(rng);
    let name = format!("{}{}", bot::NAME_PREFIX, state.next_bot_number());
    Player::new(id, name, true, position, color)
}

/// Build a human player for a session that passed admission.
///
/// Humans spawn in the (smaller) human spawn rectangle, clamped so the
/// whole blob starts inside the world.
pub fn spawn_human<R: Rng + ?Sized>(
    id: PlayerId,
    options: &JoinOptions,
    config: &RoomConfig,
    rng: &mut R,
) -> Player {
    let raw = random_position(rng, config.human_spawn_width, config.human_spawn_height);
    let color = pastel_color(rng);
    let mut human = Player::new(id, options.display_name(), false, raw, color);
    human.position = clamp_to_world(human.position, human.radius, config);
    human
}

/// Keep a circle of `radius` inside the world bounds
pub fn clamp_to_world(position: Vec2, radius: f32, config: &RoomConfig) -> Vec2 {
    let min = Vec2::new(radius, radius);
    let max = Vec2::new(config.world_width - radius, config.world_height - radius);
    position.clamp_to_rect(min, max)
}
