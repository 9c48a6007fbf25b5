//! Effect application.
//!
//! - `MatchHost`: Caller-owned match state behind updater callbacks
//! - `MatchState`: In-memory host with call counters
//! - `EffectEngine`: Applies an `EffectPayload` to a host
//!
//! Spells and skills only describe what should happen. This module is the
//! single place where those descriptions reach the board, the reserves,
//! the wheel tokens and the initiative.

mod engine;
mod host;

pub use engine::{ApplyReport, ApplyScope, DeferredEffects, EffectEngine};
pub use host::{ChillStacks, MatchHost, MatchState, Tokens};
