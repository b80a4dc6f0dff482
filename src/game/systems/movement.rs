use rayon::prelude::*;

use crate::config::RoomConfig;
use crate::game::constants::{bot, player};
use crate::game::spawner::clamp_to_world;
use crate::game::state::{Intent, Player, WorldState};
use crate::util::vec2::Vec2;

/// Movement speed for a player kind, in units per second
#[inline]
pub fn speed_for(is_bot: bool) -> f32 {
    if is_bot {
        bot::SPEED
    } else {
        player::HUMAN_SPEED
    }
}

/// Velocity for an intent: unit direction times `speed`.
/// A degenerate (all-off or cancelling) intent yields zero velocity.
pub fn velocity_for(intent: &Intent, speed: f32) -> Vec2 {
    intent.raw_direction().normalize() * speed
}

/// Advance one player by `dt` seconds using its latest intent, then clamp
/// it into the world. A player with no intent does not move.
pub fn integrate(player: &mut Player, config: &RoomConfig, dt: f32) {
    let Some(intent) = player.latest_input else {
        return;
    };
    let velocity = velocity_for(&intent, speed_for(player.is_bot));
    if velocity == Vec2::ZERO {
        return;
    }
    player.position += velocity * dt;
    player.position = clamp_to_world(player.position, player.radius, config);
}

/// Update movement for all players
/// Per-player work has no cross-entity dependency, so players are
/// integrated in parallel with rayon.
pub fn update(state: &mut WorldState, config: &RoomConfig, dt: f32) {
    state.players.par_values_mut().for_each(|player| {
        integrate(player, config, dt);
    });
}

/// Clamp every live player into the world.
/// Run after growth so a radius increase never leaves a blob hanging over
/// the edge. Returns how many players actually moved.
pub fn enforce_bounds(state: &mut WorldState, config: &RoomConfig) -> usize {
    let mut corrected = 0;
    for player in state.players.values_mut() {
        let clamped = clamp_to_world(player.position, player.radius, config);
        if clamped != player.position {
            player.position = clamped;
            corrected += 1;
        }
    }
    corrected
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_player(is_bot: bool, position: Vec2, intent: Option<Intent>) -> Player {
        let mut player = Player::new(Uuid::new_v4(), "Test".to_string(), is_bot, position, 0);
        player.latest_input = intent;
        player
    }

    #[test]
    fn test_velocity_for_normalizes_diagonals() {
        let v = velocity_for(&Intent::new(false, true, false, true), 500.0);
        assert!((v.length() - 500.0).abs() < 1e-3);
        assert!((v.x - v.y).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_for_degenerate_intent() {
        assert_eq!(velocity_for(&Intent::default(), 500.0), Vec2::ZERO);
        assert_eq!(velocity_for(&Intent::new(true, true, false, false), 500.0), Vec2::ZERO);
    }

    #[test]
    fn test_human_moves_at_human_speed() {
        let config = RoomConfig::default();
        let right = Intent::new(false, true, false, false);
        let mut human = make_player(false, Vec2::new(1000.0, 1000.0), Some(right));
        integrate(&mut human, &config, 0.05);
        assert!((human.position.x - 1025.0).abs() < 1e-3);
        assert_eq!(human.position.y, 1000.0);
    }

    #[test]
    fn test_bot_moves_at_bot_speed() {
        let config = RoomConfig::default();
        let up = Intent::new(false, false, true, false);
        let mut bot = make_player(true, Vec2::new(1000.0, 1000.0), Some(up));
        integrate(&mut bot, &config, 0.05);
        assert!((bot.position.y - 984.0).abs() < 1e-3);
    }

    #[test]
    fn test_no_intent_no_movement() {
        let config = RoomConfig::default();
        let mut player = make_player(false, Vec2::new(100.0, 100.0), None);
        for _ in 0..100 {
            integrate(&mut player, &config, 0.05);
        }
        assert_eq!(player.position, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_movement_clamped_to_world() {
        let config = RoomConfig::default();
        let up_left = Intent::new(true, false, true, false);
        let mut player = make_player(false, Vec2::new(60.0, 60.0), Some(up_left));
        for _ in 0..20 {
            integrate(&mut player, &config, 0.05);
        }
        assert_eq!(player.position, Vec2::new(player.radius, player.radius));
    }

    #[test]
    fn test_update_moves_everyone() {
        let config = RoomConfig::default();
        let mut state = WorldState::new();
        let right = Some(Intent::new(false, true, false, false));
        let human = make_player(false, Vec2::new(500.0, 500.0), right);
        let bot = make_player(true, Vec2::new(500.0, 500.0), right);
        let (human_id, bot_id) = (human.id, bot.id);
        state.upsert_player(human);
        state.upsert_player(bot);

        update(&mut state, &config, 0.05);

        assert!((state.get_player(human_id).unwrap().position.x - 525.0).abs() < 1e-3);
        assert!((state.get_player(bot_id).unwrap().position.x - 516.0).abs() < 1e-3);
    }

    #[test]
    fn test_enforce_bounds_after_growth() {
        let config = RoomConfig::default();
        let mut state = WorldState::new();
        let mut player = make_player(false, Vec2::new(50.0, 2000.0), None);
        player.radius = 80.0;
        let id = player.id;
        state.upsert_player(player);

        assert_eq!(enforce_bounds(&mut state, &config), 1);
        assert_eq!(state.get_player(id).unwrap().position, Vec2::new(80.0, 2000.0));
        assert_eq!(enforce_bounds(&mut state, &config), 0);
    }
}
