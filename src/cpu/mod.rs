//! CPU spell casting.
//!
//! - `CpuCaster`: Mana, income and remaining turns of a caster
//! - `choose`: Picks a spell (or saves mana)
//! - `choose_selection`: Picks a target for the current stage of a cast

mod selector;

pub use selector::{choose, choose_selection, CpuCaster, CpuChoice};
