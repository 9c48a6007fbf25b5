//! Wheels, tokens and victory conditions.
//!
//! - `Wheel`/`Section`: validated layout of victory-condition arcs
//! - `spin`/`resolve_token`: pure token arithmetic
//! - `evaluate`/`resolve_board`: winner determination per lane

mod section;
mod token;
mod victory;

pub use section::{Section, VictoryCondition, Wheel, WheelError};
pub use token::{resolve_token, spin, TokenResolution, WheelToken};
pub use victory::{evaluate, reserve_sum, resolve_board, LaneContext, LaneOutcome};
