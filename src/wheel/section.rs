//! Wheel layout: victory-condition sections over 16 positions.
//!
//! A section covers the inclusive arc `start..=end`. When `start > end`
//! the arc wraps through position 0. A valid wheel assigns every position
//! to exactly one section.

use serde::{Deserialize, Serialize};

use crate::core::WHEEL_POSITIONS;

/// Rule deciding who wins a wheel when the token lands in a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryCondition {
    /// Higher committed value wins.
    Strongest,
    /// Lower committed value wins.
    Weakest,
    /// Higher reserve sum wins.
    ReserveSum,
    /// Committed value nearest the section target wins.
    ClosestToTarget,
    /// The initiative holder wins.
    Initiative,
}

/// One arc of a wheel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub condition: VictoryCondition,
    /// Display color (0xRRGGBB), opaque to the engine.
    pub color: u32,
    pub start: u8,
    pub end: u8,
    /// Target value for `ClosestToTarget`.
    pub target: Option<i32>,
}

impl Section {
    /// Create a section covering `start..=end`.
    #[must_use]
    pub const fn new(condition: VictoryCondition, start: u8, end: u8) -> Self {
        Self {
            condition,
            color: 0,
            start,
            end,
            target: None,
        }
    }

    /// Set the target value (builder pattern).
    #[must_use]
    pub const fn with_target(mut self, target: i32) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the display color (builder pattern).
    #[must_use]
    pub const fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Whether this arc contains `position`.
    #[must_use]
    pub const fn contains(&self, position: u8) -> bool {
        if self.start <= self.end {
            self.start <= position && position <= self.end
        } else {
            position >= self.start || position <= self.end
        }
    }
}

/// Errors from building a wheel.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WheelError {
    /// A section boundary lies outside the wheel.
    #[error("section {index} boundary out of range ({start}..={end})")]
    OutOfRange { index: usize, start: u8, end: u8 },

    /// Two sections claim the same position.
    #[error("position {position} is covered by more than one section")]
    Overlap { position: u8 },

    /// No section claims a position.
    #[error("position {position} is not covered by any section")]
    Uncovered { position: u8 },

    /// A `ClosestToTarget` section has no target.
    #[error("section {index} needs a target value")]
    MissingTarget { index: usize },
}

/// A validated wheel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Section>", into = "Vec<Section>")]
pub struct Wheel {
    sections: Vec<Section>,
}

impl Wheel {
    /// Build a wheel, checking that sections tile all positions exactly once.
    pub fn new(sections: Vec<Section>) -> Result<Self, WheelError> {
        for (index, section) in sections.iter().enumerate() {
            if section.start >= WHEEL_POSITIONS || section.end >= WHEEL_POSITIONS {
                return Err(WheelError::OutOfRange {
                    index,
                    start: section.start,
                    end: section.end,
                });
            }
            if section.condition == VictoryCondition::ClosestToTarget && section.target.is_none() {
                return Err(WheelError::MissingTarget { index });
            }
        }

        for position in 0..WHEEL_POSITIONS {
            match sections.iter().filter(|s| s.contains(position)).count() {
                0 => return Err(WheelError::Uncovered { position }),
                1 => {}
                _ => return Err(WheelError::Overlap { position }),
            }
        }

        Ok(Self { sections })
    }

    /// A standard layout with one wrapping section.
    ///
    /// | positions | condition |
    /// |-----------|-----------|
    /// | 14..=3    | Strongest |
    /// | 4..=6     | Weakest |
    /// | 7..=9     | ReserveSum |
    /// | 10..=11   | ClosestToTarget (8) |
    /// | 12..=13   | Initiative |
    #[must_use]
    pub fn standard() -> Self {
        Self {
            sections: vec![
                Section::new(VictoryCondition::Strongest, 14, 3).with_color(0xC0392B),
                Section::new(VictoryCondition::Weakest, 4, 6).with_color(0x2980B9),
                Section::new(VictoryCondition::ReserveSum, 7, 9).with_color(0x27AE60),
                Section::new(VictoryCondition::ClosestToTarget, 10, 11)
                    .with_target(8)
                    .with_color(0x8E44AD),
                Section::new(VictoryCondition::Initiative, 12, 13).with_color(0xF1C40F),
            ],
        }
    }

    /// All sections in declaration order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The section containing `position` and its index.
    ///
    /// `position` is reduced modulo the wheel size first.
    #[must_use]
    pub fn section_at(&self, position: u8) -> (usize, &Section) {
        let position = position % WHEEL_POSITIONS;
        self.sections
            .iter()
            .enumerate()
            .find(|(_, s)| s.contains(position))
            .unwrap_or_else(|| unreachable!("validated wheel covers position {position}"))
    }
}

impl TryFrom<Vec<Section>> for Wheel {
    type Error = WheelError;

    fn try_from(sections: Vec<Section>) -> Result<Self, Self::Error> {
        Self::new(sections)
    }
}

impl From<Wheel> for Vec<Section> {
    fn from(wheel: Wheel) -> Self {
        wheel.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_plain_arc() {
        let section = Section::new(VictoryCondition::Weakest, 4, 6);
        assert!(!section.contains(3));
        assert!(section.contains(4));
        assert!(section.contains(6));
        assert!(!section.contains(7));
    }

    #[test]
    fn test_contains_wrapping_arc() {
        let section = Section::new(VictoryCondition::Strongest, 14, 3);
        assert!(section.contains(14));
        assert!(section.contains(15));
        assert!(section.contains(0));
        assert!(section.contains(3));
        assert!(!section.contains(4));
        assert!(!section.contains(13));
    }

    #[test]
    fn test_standard_wheel_is_valid() {
        let standard = Wheel::standard();
        let rebuilt = Wheel::new(standard.sections().to_vec()).unwrap();
        assert_eq!(standard, rebuilt);
    }

    #[test]
    fn test_section_at() {
        let wheel = Wheel::standard();
        assert_eq!(wheel.section_at(0).1.condition, VictoryCondition::Strongest);
        assert_eq!(wheel.section_at(15).1.condition, VictoryCondition::Strongest);
        assert_eq!(wheel.section_at(5).1.condition, VictoryCondition::Weakest);
        assert_eq!(wheel.section_at(8).0, 2);
        assert_eq!(wheel.section_at(12).1.condition, VictoryCondition::Initiative);
    }

    #[test]
    fn test_uncovered_position() {
        let result = Wheel::new(vec![Section::new(VictoryCondition::Strongest, 0, 14)]);
        assert_eq!(result, Err(WheelError::Uncovered { position: 15 }));
    }

    #[test]
    fn test_overlapping_sections() {
        let result = Wheel::new(vec![
            Section::new(VictoryCondition::Strongest, 0, 8),
            Section::new(VictoryCondition::Weakest, 8, 15),
        ]);
        assert_eq!(result, Err(WheelError::Overlap { position: 8 }));
    }

    #[test]
    fn test_out_of_range_and_missing_target() {
        let result = Wheel::new(vec![Section::new(VictoryCondition::Strongest, 0, 16)]);
        assert!(matches!(result, Err(WheelError::OutOfRange { index: 0, .. })));

        let result = Wheel::new(vec![Section::new(VictoryCondition::ClosestToTarget, 0, 15)]);
        assert_eq!(result, Err(WheelError::MissingTarget { index: 0 }));
    }

    #[test]
    fn test_wheel_serde_validates() {
        let json = serde_json::to_string(&Wheel::standard()).unwrap();
        let wheel: Wheel = serde_json::from_str(&json).unwrap();
        assert_eq!(wheel, Wheel::standard());

        let broken = serde_json::to_string(&vec![Section::new(VictoryCondition::Strongest, 0, 3)]).unwrap();
        assert!(serde_json::from_str::<Wheel>(&broken).is_err());
    }
}
