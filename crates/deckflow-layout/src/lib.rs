#![forbid(unsafe_code)]

//! Host environment and layout description for deckflow engines.
//!
//! The engines never touch a real document. Everything they need to know
//! about the host (how tall a container may grow, whether the device has a
//! touch screen, which way text runs) comes through [`LayoutProbe`], and the
//! structure they manage is declared up front as a [`LayoutNode`] tree.

pub mod available;
pub mod probe;
pub mod style;
pub mod tree;

pub use available::{Display, Float, Position, SiblingBox, available_height};
pub use probe::{LayoutProbe, OffsetUnit, StaticProbe, WritingDirection};
pub use style::{StyleRule, Stylesheet};
pub use tree::{
    ElementNode, FreeScrollNode, LayoutError, LayoutNode, NodeHandle, PaginatorNode, PaneNode,
    TextNode,
};

pub use deckflow_core::geometry::{Orientation, Size};
