//! Token spin arithmetic.
//!
//! A wheel's token advances by the sum of both sides' committed values at
//! that wheel, modulo the 16 positions. Everything here is pure; callers
//! persist the results.

use serde::{Deserialize, Serialize};

use crate::core::WHEEL_POSITIONS;

use super::section::{VictoryCondition, Wheel};

/// Advance a token position by both committed values.
///
/// Negative sums wrap backwards into `0..16`.
///
/// ```
/// use wheel_duel::wheel::spin;
///
/// assert_eq!(spin(3, 5, 6), 14);
/// assert_eq!(spin(10, 4, 3), 1);
/// assert_eq!(spin(1, -2, 0), 15);
/// ```
#[must_use]
pub fn spin(current: u8, player_value: i32, enemy_value: i32) -> u8 {
    let total = i64::from(current) + i64::from(player_value) + i64::from(enemy_value);
    total.rem_euclid(i64::from(WHEEL_POSITIONS)) as u8
}

/// Persisted token of one wheel.
///
/// `origin` is where the token stood before this round's spin and
/// `position` is where it stands now. Recomputing after a committed value
/// changes is always `spin(origin, p, e)`, never an incremental delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WheelToken {
    pub origin: u8,
    pub position: u8,
}

impl WheelToken {
    /// A token resting at `position` with no spin applied this round.
    #[must_use]
    pub const fn at(position: u8) -> Self {
        Self {
            origin: position,
            position,
        }
    }

    /// The token after spinning from its origin by the given values.
    #[must_use]
    pub fn spun(self, player_value: i32, enemy_value: i32) -> Self {
        Self {
            origin: self.origin,
            position: spin(self.origin, player_value, enemy_value),
        }
    }

    /// Move both origin and position by `delta` steps.
    #[must_use]
    pub fn shifted(self, delta: i32) -> Self {
        Self {
            origin: spin(self.origin, delta, 0),
            position: spin(self.position, delta, 0),
        }
    }

    /// Start a new round from the current position.
    #[must_use]
    pub const fn settled(self) -> Self {
        Self::at(self.position)
    }
}

/// Result of spinning a wheel's token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResolution {
    pub new_position: u8,
    pub section_index: usize,
    pub condition: VictoryCondition,
}

/// Spin a wheel's token and find the section it lands in.
#[must_use]
pub fn resolve_token(wheel: &Wheel, current: u8, player_value: i32, enemy_value: i32) -> TokenResolution {
    let new_position = spin(current, player_value, enemy_value);
    let (section_index, section) = wheel.section_at(new_position);
    TokenResolution {
        new_position,
        section_index,
        condition: section.condition,
    }
}
