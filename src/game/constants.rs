/// World geometry defaults (overridable through `RoomConfig`)
pub mod world {
    /// World width in world units
    pub const WIDTH: f32 = 4000.0;
    /// World height in world units
    pub const HEIGHT: f32 = 4000.0;
    /// Human spawn rectangle width (smaller than the world, kept as-is)
    pub const HUMAN_SPAWN_WIDTH: f32 = 800.0;
    /// Human spawn rectangle height
    pub const HUMAN_SPAWN_HEIGHT: f32 = 600.0;
}

/// Simulation timing
pub mod tick {
    /// Fixed simulation step in milliseconds (20 Hz)
    pub const FIXED_STEP_MS: u64 = 50;
    /// How often the async driver samples elapsed time
    pub const DRIVER_INTERVAL_MS: u64 = 16;
}

/// Food constants
pub mod food {
    /// Number of food entities that exist at all times
    pub const COUNT: usize = 100;
    /// Largest food population a room accepts
    pub const MAX_COUNT: usize = 100_000;
    /// Fixed food radius
    pub const RADIUS: f32 = 10.0;
    /// Fraction of a food's radius added to the eater's radius
    pub const GROWTH_FACTOR: f32 = 0.1;
    /// Exclusive upper bound for random food colors (24-bit RGB)
    pub const COLOR_RANGE: u32 = 0xFF_FFFF;
}

/// Player constants shared by humans and bots
pub mod player {
    /// Starting radius for every player
    pub const STARTING_RADIUS: f32 = 50.0;
    /// Human movement speed in units per second
    pub const HUMAN_SPEED: f32 = 500.0;
    /// Fallback display name when a join carries none
    pub const DEFAULT_NAME: &str = "Player";
    /// Pastel color channel range (inclusive), biased toward light colors
    pub const PASTEL_CHANNEL_MIN: u32 = 127;
    pub const PASTEL_CHANNEL_MAX: u32 = 254;
}

/// Absorption (player eats player) rules
pub mod absorb {
    /// Absorber radius must exceed victim radius times this ratio
    pub const SIZE_RATIO: f32 = 1.15;
    /// Centers must be closer than `absorber - victim * OVERLAP_FACTOR`
    pub const OVERLAP_FACTOR: f32 = 0.2;
    /// Fraction of the victim's radius added to the absorber
    pub const GROWTH_FACTOR: f32 = 0.25;
}

/// AI bot constants
pub mod bot {
    /// Room occupancy the auto-populator converges toward
    pub const TARGET_OCCUPANCY: usize = 10;
    /// Bot movement speed in units per second
    pub const SPEED: f32 = 320.0;
    /// Food farther than this is invisible to a bot
    pub const VIEW_RANGE: f32 = 600.0;
    /// Chance per decision of a noisy wander instead of seeking food
    pub const RANDOM_MOVE_CHANCE: f64 = 0.25;
    /// Per-direction chance when wandering with no food in sight
    pub const IDLE_DIRECTION_CHANCE: f64 = 0.3;
    /// Per-direction chance during a noisy wander
    pub const WANDER_DIRECTION_CHANCE: f64 = 0.5;
    /// Delay between two decisions of the same bot (milliseconds)
    pub const REACTION_DELAY_MS: u64 = 150;
    /// Offset under which an axis is considered "on target"
    pub const DEAD_ZONE: f32 = 20.0;
    /// Display name prefix; the suffix is the room's bot counter
    pub const NAME_PREFIX: &str = "Bot#";
}

/// Room/runtime constants
pub mod room {
    /// Admission hint for the transport layer
    pub const MAX_CLIENTS: usize = 10;
    /// Capacity of the inbound event queue
    pub const EVENT_QUEUE_CAPACITY: usize = 1024;
    /// Seconds between periodic stats log lines
    pub const STATS_LOG_INTERVAL_SECS: u64 = 30;
}
