//! Bot controller
//!
//! Each bot re-decides its intent on its own reaction timer; between
//! decisions the previous intent keeps being integrated every tick by the
//! movement system, exactly like a human's.

use rand::Rng;

use crate::game::constants::bot::*;
use crate::game::state::{Food, Intent, WorldState};
use crate::util::vec2::Vec2;

/// Four independent coin flips with probability `p` each
fn random_intent<R: Rng + ?Sized>(rng: &mut R, p: f64) -> Intent {
    Intent::new(rng.gen_bool(p), rng.gen_bool(p), rng.gen_bool(p), rng.gen_bool(p))
}

/// Nearest food strictly inside the view range; the first one wins ties
pub fn nearest_food<'a>(position: Vec2, foods: impl Iterator<Item = &'a Food>) -> Option<&'a Food> {
    let mut best: Option<&Food> = None;
    let mut best_distance = f32::INFINITY;
    for food in foods {
        let distance = position.distance_to(food.position);
        if distance < best_distance && distance < VIEW_RANGE {
            best_distance = distance;
            best = Some(food);
        }
    }
    best
}

/// Steer toward `target`, leaving an axis idle inside the dead zone
pub fn seek(position: Vec2, target: Vec2) -> Intent {
    let dx = target.x - position.x;
    let dy = target.y - position.y;
    Intent::new(dx < -DEAD_ZONE, dx > DEAD_ZONE, dy < -DEAD_ZONE, dy > DEAD_ZONE)
}

/// One bot decision: noisy wander, else seek the nearest visible food,
/// else a weaker wander
pub fn decide<'a, R: Rng + ?Sized>(
    position: Vec2,
    foods: impl Iterator<Item = &'a Food>,
    rng: &mut R,
) -> Intent {
    if rng.gen_bool(RANDOM_MOVE_CHANCE) {
        return random_intent(rng, WANDER_DIRECTION_CHANCE);
    }
    match nearest_food(position, foods) {
        Some(food) => seek(position, food.position),
        None => random_intent(rng, IDLE_DIRECTION_CHANCE),
    }
}

/// Run the decision cycle for every bot whose reaction timer has elapsed.
/// `now_ms` is simulation time. Returns how many bots decided this tick.
pub fn update_bots<R: Rng + ?Sized>(state: &mut WorldState, now_ms: u64, rng: &mut R) -> usize {
    let mut decided = 0;

    for bot_id in state.bot_ids() {
        let position = match state.get_player(bot_id) {
            Some(bot) if now_ms >= bot.reaction_timer => bot.position,
            _ => continue,
        };

        let intent = decide(position, state.foods(), rng);

        if let Some(bot) = state.get_player_mut(bot_id) {
            bot.latest_input = Some(intent);
            bot.reaction_timer = now_ms + REACTION_DELAY_MS;
            decided += 1;
        }
    }

    decided
}
