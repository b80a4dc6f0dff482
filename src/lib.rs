//! Blob Arena Server Library
//!
//! Authoritative fixed-tick simulation for an agar-style arena: players and
//! bots move, eat food and absorb smaller players. Transport is left to the
//! embedder, which talks to a room through [`room::RoomHandle`].

pub mod config;
pub mod util;
pub mod game;
pub mod metrics;
pub mod room;
