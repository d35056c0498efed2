//! Data models for Courtside

mod hit;
mod lineup;
mod match_state;
mod player;
mod set;
mod team;

pub use hit::*;
pub use lineup::*;
pub use match_state::*;
pub use player::*;
pub use set::*;
pub use team::*;
