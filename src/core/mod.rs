//! Core engine types: sides, board, RNG, configuration.
//!
//! This module contains the building blocks shared by the wheel resolver,
//! the spell pipeline and the skill phase.

pub mod board;
pub mod config;
pub mod rng;
pub mod side;

pub use board::{empty_lanes, find_lane, lane_total, lane_value, locate, no_boosts, Board, LaneBoosts, Lanes};
pub use config::{EngineConfig, Phase, LANE_COUNT, WHEEL_POSITIONS};
pub use rng::SeededRng;
pub use side::{Side, SideMap};
