#![forbid(unsafe_code)]

//! Notifications and render outputs.

use std::fmt;

use deckflow_layout::Stylesheet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A paginator moved to another pane (or was jumped in place).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageChange {
    /// Id of the paginator.
    pub id: Option<String>,
    pub from_index: usize,
    pub to_index: usize,
    pub from_pane_id: Option<String>,
    pub to_pane_id: Option<String>,
    /// Whether a released drag caused the change.
    pub manual: bool,
}

/// A paginator adopted new dimensions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResizeNotice {
    pub id: Option<String>,
    pub width: f64,
    pub height: f64,
}

/// Document-level setup a host applies once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSetup {
    /// Rules to insert into the document.
    pub stylesheet: Stylesheet,
    /// Cancel default handling of touch moves on the document body so the
    /// page itself never scrolls.
    pub block_document_touch_move: bool,
    /// Cancel mouse-down on images so mouse drags are not stolen by native
    /// image dragging.
    pub suppress_image_drag: bool,
}

/// Everything a context reports to its subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PageChanged(PageChange),
    Resized(ResizeNotice),
    HostSetup(HostSetup),
}

impl EngineEvent {
    /// The page change, if this is one.
    #[must_use]
    pub fn as_page_change(&self) -> Option<&PageChange> {
        match self {
            Self::PageChanged(change) => Some(change),
            _ => None,
        }
    }
}

/// Horizontal translation of a paginator's pane strip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Translate {
    /// Percent of the paginator width.
    Percent(f64),
    Pixels(f64),
}

impl Translate {
    /// Numeric value regardless of unit.
    #[must_use]
    pub fn value(&self) -> f64 {
        match *self {
            Self::Percent(v) | Self::Pixels(v) => v,
        }
    }

    /// CSS transform, e.g. `translate3d(-100%, 0, 0)`.
    #[must_use]
    pub fn css(&self) -> String {
        format!("translate3d({self}, 0, 0)")
    }
}

impl fmt::Display for Translate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Percent(v) => write!(f, "{}%", v + 0.0),
            Self::Pixels(v) => write!(f, "{}px", v + 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_css() {
        assert_eq!(Translate::Percent(-100.0).css(), "translate3d(-100%, 0, 0)");
        assert_eq!(Translate::Pixels(-640.0).css(), "translate3d(-640px, 0, 0)");
        assert_eq!(Translate::Percent(-0.0).to_string(), "0%");
    }
}
