pub mod movement;
pub mod collision;
pub mod ai;
