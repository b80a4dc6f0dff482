//! Collision and consumption resolver
//!
//! Two pairwise passes per tick: players eating food, then players
//! absorbing smaller players. Both are brute force (players x foods and
//! players^2); rooms are capped at a handful of players.

use rand::Rng;
use smallvec::SmallVec;
use tracing::trace;

use crate::config::RoomConfig;
use crate::game::constants::{absorb, food};
use crate::game::spawner::spawn_food;
use crate::game::state::{FoodId, PlayerId, WorldState};

/// A food eaten this tick (already respawned under the same id)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodConsumption {
    pub player_id: PlayerId,
    pub food_id: FoodId,
}

/// One successful absorption check. A victim can appear more than once
/// when several players absorb it in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Absorption {
    pub absorber_id: PlayerId,
    pub victim_id: PlayerId,
}

/// Whether a player of `absorber_radius` can absorb one of `victim_radius`
/// whose center is `distance` away
#[inline]
pub fn can_absorb(absorber_radius: f32, victim_radius: f32, distance: f32) -> bool {
    absorber_radius > victim_radius * absorb::SIZE_RATIO
        && distance < absorber_radius - victim_radius * absorb::OVERLAP_FACTOR
}

/// Food pass: every player against every food.
///
/// An eaten food is replaced in place by a fresh one under the same id, so
/// the population never changes and the scan never sees a missing entry.
/// Growth is applied immediately and counts for the rest of the scan.
pub fn resolve_food<R: Rng + ?Sized>(
    state: &mut WorldState,
    config: &RoomConfig,
    rng: &mut R,
) -> Vec<FoodConsumption> {
    let mut consumed = Vec::new();

    for player in state.players.values_mut() {
        for pellet in state.foods.values_mut() {
            let distance = player.position.distance_to(pellet.position);
            if distance < player.radius + pellet.radius {
                let growth = pellet.radius * food::GROWTH_FACTOR;
                let food_id = pellet.id;
                *pellet = spawn_food(food_id, config, rng);
                player.radius += growth;

                trace!("Player {} ate food {}", player.id, food_id);
                consumed.push(FoodConsumption {
                    player_id: player.id,
                    food_id,
                });
            }
        }
    }

    consumed
}

/// Player pass: every ordered pair (A, B), A != B.
///
/// Victims are only marked during the scan and removed afterwards, so a
/// player absorbed this tick can still absorb others before it goes.
/// Removal also drops the victim from the bot roster.
pub fn resolve_players(state: &mut WorldState) -> Vec<Absorption> {
    let ids: SmallVec<[PlayerId; 16]> = state.players.keys().copied().collect();
    let mut absorptions = Vec::new();
    let mut marked: SmallVec<[PlayerId; 8]> = SmallVec::new();

    for &absorber_id in &ids {
        for &victim_id in &ids {
            if absorber_id == victim_id {
                continue;
            }

            let (victim_position, victim_radius) = match state.players.get(&victim_id) {
                Some(victim) => (victim.position, victim.radius),
                None => continue,
            };
            let Some(absorber) = state.players.get_mut(&absorber_id) else {
                continue;
            };

            let distance = absorber.position.distance_to(victim_position);
            if can_absorb(absorber.radius, victim_radius, distance) {
                absorber.radius += victim_radius * absorb::GROWTH_FACTOR;
                marked.push(victim_id);
                absorptions.push(Absorption {
                    absorber_id,
                    victim_id,
                });
            }
        }
    }

    for victim_id in marked {
        state.remove_player(victim_id);
    }

    absorptions
}
