//! Side identification and per-side data storage.
//!
//! ## Side
//!
//! A duel always has exactly two sides: the player and the enemy.
//! Ownership checks in spell targeting and turn handoff in the skill
//! phase are both expressed relative to a `Side`.
//!
//! ## SideMap
//!
//! Per-side data storage with O(1) access, indexable by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two sides of a duel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Player,
    Enemy,
}

impl Side {
    /// Both sides, player first.
    pub const BOTH: [Side; 2] = [Side::Player, Side::Enemy];

    /// The opposing side.
    ///
    /// ```
    /// use wheel_duel::core::Side;
    ///
    /// assert_eq!(Side::Player.opponent(), Side::Enemy);
    /// assert_eq!(Side::Enemy.opponent(), Side::Player);
    /// ```
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Get the raw side index (player = 0, enemy = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// Per-side data storage.
///
/// ## Example
///
/// ```
/// use wheel_duel::core::{Side, SideMap};
///
/// let mut mana: SideMap<u32> = SideMap::with_value(3);
/// mana[Side::Enemy] -= 1;
///
/// assert_eq!(mana[Side::Player], 3);
/// assert_eq!(mana[Side::Enemy], 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    pub player: T,
    pub enemy: T,
}

impl<T> SideMap<T> {
    /// Create a map with explicit values.
    pub const fn from_pair(player: T, enemy: T) -> Self {
        Self { player, enemy }
    }

    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            player: factory(Side::Player),
            enemy: factory(Side::Enemy),
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            player: value.clone(),
            enemy: value,
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Iterate over (Side, &T) pairs, player first.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Player, &self.player), (Side::Enemy, &self.enemy)].into_iter()
    }

    /// Transform both entries.
    pub fn map<U>(&self, f: impl Fn(Side, &T) -> U) -> SideMap<U> {
        SideMap {
            player: f(Side::Player, &self.player),
            enemy: f(Side::Enemy, &self.enemy),
        }
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
