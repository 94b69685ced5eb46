#![forbid(unsafe_code)]

//! Available-height computation.
//!
//! A paginator or scroll box grows to fill its parent minus whatever its
//! in-flow siblings occupy (headers, banners, tab bars). Only siblings that
//! take part in normal block flow reduce the space: absolutely/fixed
//! positioned boxes float above the flow, inline-block and floated boxes sit
//! beside it.
//!
//! # Invariants
//!
//! 1. The result is never negative.
//! 2. Siblings that are out of flow never change the result.

use serde::{Deserialize, Serialize};

/// CSS `position` of a sibling box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

/// CSS `display` of a sibling box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    #[default]
    Block,
    Inline,
    InlineBlock,
    Flex,
    None,
}

/// CSS `float` of a sibling box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Float {
    #[default]
    None,
    Left,
    Right,
}

/// Computed style and rendered height of one sibling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SiblingBox {
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub float: Float,
    /// Rendered height in pixels.
    pub height: f64,
}

impl SiblingBox {
    /// An in-flow block of the given height.
    #[must_use]
    pub const fn block(height: f64) -> Self {
        Self {
            position: Position::Static,
            display: Display::Block,
            float: Float::None,
            height,
        }
    }

    /// Builder: set `position`.
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Builder: set `display`.
    #[must_use]
    pub const fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    /// Builder: set `float`.
    #[must_use]
    pub const fn with_float(mut self, float: Float) -> Self {
        self.float = float;
        self
    }

    /// Whether this sibling takes vertical space away from its neighbours.
    #[must_use]
    pub fn occupies_flow(&self) -> bool {
        let positioned_in_flow = matches!(self.position, Position::Static | Position::Relative);
        let block_level = self.display != Display::InlineBlock && self.float == Float::None;
        positioned_in_flow && block_level
    }
}

/// Height left for a container inside a parent of `parent_height`, given
/// its siblings.
#[must_use]
pub fn available_height(parent_height: f64, siblings: &[SiblingBox]) -> f64 {
    let taken: f64 = siblings
        .iter()
        .filter(|s| s.occupies_flow())
        .map(|s| s.height.max(0.0))
        .sum();
    (parent_height - taken).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_blocks_are_subtracted() {
        let sibs = [SiblingBox::block(44.0), SiblingBox::block(50.0)];
        assert_eq!(available_height(480.0, &sibs), 386.0);
    }

    #[test]
    fn relative_counts_absolute_does_not() {
        let sibs = [
            SiblingBox::block(40.0).with_position(Position::Relative),
            SiblingBox::block(300.0).with_position(Position::Absolute),
            SiblingBox::block(300.0).with_position(Position::Fixed),
        ];
        assert_eq!(available_height(480.0, &sibs), 440.0);
    }

    #[test]
    fn inline_block_and_floats_are_ignored() {
        let sibs = [
            SiblingBox::block(100.0).with_display(Display::InlineBlock),
            SiblingBox::block(100.0).with_float(Float::Left),
            SiblingBox::block(20.0).with_display(Display::Inline),
        ];
        assert_eq!(available_height(480.0, &sibs), 460.0);
    }

    #[test]
    fn never_negative() {
        let sibs = [SiblingBox::block(900.0)];
        assert_eq!(available_height(480.0, &sibs), 0.0);
        assert_eq!(available_height(0.0, &[]), 0.0);
    }
}
