//! Read-only projection of a room handed to the transport after each tick

use serde::{Deserialize, Serialize};

use crate::game::state::{Food, FoodId, Player, PlayerId, WorldState};

/// Complete visible world state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    /// Sorted by id
    pub players: Vec<PlayerSnapshot>,
    /// Sorted by id
    pub foods: Vec<FoodSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: u32,
    pub name: String,
    pub is_bot: bool,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            x: player.position.x,
            y: player.position.y,
            radius: player.radius,
            color: player.color,
            name: player.name().to_string(),
            is_bot: player.is_bot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodSnapshot {
    pub id: FoodId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: u32,
}

impl From<&Food> for FoodSnapshot {
    fn from(food: &Food) -> Self {
        Self {
            id: food.id,
            x: food.position.x,
            y: food.position.y,
            radius: food.radius,
            color: food.color,
        }
    }
}

impl WorldSnapshot {
    /// Capture the current state of a world
    pub fn capture(state: &WorldState) -> Self {
        let mut players: Vec<PlayerSnapshot> = state.players().map(PlayerSnapshot::from).collect();
        players.sort_unstable_by_key(|p| p.id);

        let mut foods: Vec<FoodSnapshot> = state.foods().map(FoodSnapshot::from).collect();
        foods.sort_unstable_by_key(|f| f.id);

        Self {
            tick: state.tick,
            players,
            foods,
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerSnapshot> {
        self.players
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|index| &self.players[index])
    }

    pub fn food(&self, id: FoodId) -> Option<&FoodSnapshot> {
        self.foods
            .binary_search_by_key(&id, |f| f.id)
            .ok()
            .map(|index| &self.foods[index])
    }

    /// Encode with bincode (standard config)
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| EncodeError(e.to_string()))
    }

    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        bincode::serde::decode_from_slice(data, bincode::config::standard())
            .map(|(snapshot, _)| snapshot)
            .map_err(|e| DecodeError(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Encode error: {0}")]
pub struct EncodeError(String);

#[derive(Debug, thiserror::Error)]
#[error("Decode error: {0}")]
pub struct DecodeError(String);
