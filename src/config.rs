use crate::game::constants::{bot, food, player, room, tick, world};

/// Room configuration
///
/// Every tunable a room needs at creation. Constants in `game::constants`
/// provide the defaults; the environment can override them.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfig {
    /// World width in world units
    pub world_width: f32,
    /// World height in world units
    pub world_height: f32,
    /// Width of the rectangle humans spawn in (anchored at the origin)
    pub human_spawn_width: f32,
    /// Height of the rectangle humans spawn in
    pub human_spawn_height: f32,
    /// Number of food entities kept alive at all times
    pub food_count: usize,
    /// Player count the bot auto-populator converges toward
    pub target_occupancy: usize,
    /// Maximum human clients (admission hint for the transport)
    pub max_clients: usize,
    /// Fixed simulation step in milliseconds
    pub fixed_step_ms: u64,
    /// How often the async driver samples elapsed time, in milliseconds
    pub driver_interval_ms: u64,
    /// RNG seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            world_width: world::WIDTH,
            world_height: world::HEIGHT,
            human_spawn_width: world::HUMAN_SPAWN_WIDTH,
            human_spawn_height: world::HUMAN_SPAWN_HEIGHT,
            food_count: food::COUNT,
            target_occupancy: bot::TARGET_OCCUPANCY,
            max_clients: room::MAX_CLIENTS,
            fixed_step_ms: tick::FIXED_STEP_MS,
            driver_interval_ms: tick::DRIVER_INTERVAL_MS,
            seed: None,
        }
    }
}

impl RoomConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Some(width) = env_parse::<f32>("WORLD_WIDTH") {
            config.world_width = width;
        }
        if let Some(height) = env_parse::<f32>("WORLD_HEIGHT") {
            config.world_height = height;
        }

        if let Some(count) = env_parse::<usize>("FOOD_COUNT") {
            if count <= food::MAX_COUNT {
                config.food_count = count;
            } else {
                tracing::warn!("FOOD_COUNT must be 0-{}, using default", food::MAX_COUNT);
            }
        }

        if let Some(target) = env_parse::<usize>("TARGET_OCCUPANCY") {
            if target <= 1000 {
                config.target_occupancy = target;
            } else {
                tracing::warn!("TARGET_OCCUPANCY must be 0-1000, using default");
            }
        }

        if let Some(max_clients) = env_parse::<usize>("MAX_CLIENTS") {
            config.max_clients = max_clients;
        }

        if let Some(step) = env_parse::<u64>("FIXED_STEP_MS") {
            if step > 0 {
                config.fixed_step_ms = step;
            } else {
                tracing::warn!("FIXED_STEP_MS must be > 0, using default");
            }
        }

        if let Some(interval) = env_parse::<u64>("DRIVER_INTERVAL_MS") {
            if interval > 0 {
                config.driver_interval_ms = interval;
            } else {
                tracing::warn!("DRIVER_INTERVAL_MS must be > 0, using default");
            }
        }

        config.seed = env_parse::<u64>("ROOM_SEED");

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_width.is_finite() && self.world_height.is_finite())
            || self.world_width <= 0.0
            || self.world_height <= 0.0
        {
            return Err(ConfigError::InvalidWorld {
                width: self.world_width,
                height: self.world_height,
            });
        }
        let min_side = player::STARTING_RADIUS * 2.0;
        if self.world_width < min_side || self.world_height < min_side {
            return Err(ConfigError::WorldTooSmall { min_side });
        }
        if self.food_count > food::MAX_COUNT {
            return Err(ConfigError::TooMuchFood {
                count: self.food_count,
                max: food::MAX_COUNT,
            });
        }
        if self.fixed_step_ms == 0 {
            return Err(ConfigError::ZeroFixedStep);
        }
        if self.driver_interval_ms == 0 {
            return Err(ConfigError::ZeroDriverInterval);
        }
        Ok(())
    }

    /// Fixed step duration in seconds
    pub fn fixed_step_secs(&self) -> f32 {
        self.fixed_step_ms as f32 / 1000.0
    }
}

/// Read and parse an environment variable, warning on garbage
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("World dimensions must be positive and finite (got {width}x{height})")]
    InvalidWorld { width: f32, height: f32 },
    #[error("World must be at least {min_side} units on each side")]
    WorldTooSmall { min_side: f32 },
    #[error("food_count {count} exceeds the maximum of {max}")]
    TooMuchFood { count: usize, max: usize },
    #[error("fixed_step_ms must be at least 1")]
    ZeroFixedStep,
    #[error("driver_interval_ms must be at least 1")]
    ZeroDriverInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RoomConfig::default();
        assert_eq!(config.world_width, 4000.0);
        assert_eq!(config.world_height, 4000.0);
        assert_eq!(config.food_count, 100);
        assert_eq!(config.target_occupancy, 10);
        assert_eq!(config.max_clients, 10);
        assert_eq!(config.fixed_step_ms, 50);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_step_secs() {
        let config = RoomConfig::default();
        assert!((config.fixed_step_secs() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_world() {
        let config = RoomConfig {
            world_width: 0.0,
            ..RoomConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWorld { .. })));

        let config = RoomConfig {
            world_height: f32::NAN,
            ..RoomConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWorld { .. })));

        let config = RoomConfig {
            world_width: 60.0,
            ..RoomConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::WorldTooSmall { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_timing() {
        let config = RoomConfig {
            fixed_step_ms: 0,
            ..RoomConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFixedStep));

        let config = RoomConfig {
            driver_interval_ms: 0,
            ..RoomConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDriverInterval));
    }

    #[test]
    fn test_validate_caps_food_count() {
        let config = RoomConfig {
            food_count: food::MAX_COUNT,
            ..RoomConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = RoomConfig {
            food_count: food::MAX_COUNT + 1,
            ..RoomConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooMuchFood {
                count: food::MAX_COUNT + 1,
                max: food::MAX_COUNT,
            })
        );
    }

    #[test]
    fn test_load_or_default() {
        let config = RoomConfig::load_or_default();
        assert!(config.fixed_step_ms > 0);
        assert!(config.driver_interval_ms > 0);
    }
}
