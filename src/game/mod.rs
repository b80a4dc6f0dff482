pub mod constants;
pub mod state;
pub mod spawner;
pub mod clock;
pub mod input_buffer;
pub mod snapshot;
pub mod systems;
pub mod game_loop;
