#![forbid(unsafe_code)]

//! Engine tuning.
//!
//! Defaults reproduce the feel the engines shipped with: a 3 px dead zone
//! before a page drag starts, a drag of a third of the width committing a
//! page, quarter-second slides, and a 2.5 rubber-band divisor for scroll
//! overshoot.

use std::fmt;

use deckflow_core::animation::{Easing, Transition};
use web_time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placeholder swapped into `<img src>` when scroll content is replaced.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "../img/blank.png";

/// Paginator tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeckConfig {
    /// Horizontal travel (px) before a drag starts paging (default: 3).
    pub drag_dead_zone: f64,
    /// Multiplier applied to the dragged fraction of the width on release
    /// (default: 3). A third of the width commits a page.
    pub commit_scale: f64,
    /// Slide used by navigation and released drags (default: 250ms ease-out).
    pub page_transition: Transition,
    /// Delay before the neighbour visibility swap after an adjacent move
    /// (default: 150ms).
    pub swap_delay: Duration,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            drag_dead_zone: 3.0,
            commit_scale: 3.0,
            page_transition: Transition::millis(250, Easing::EaseOut),
            swap_delay: Duration::from_millis(150),
        }
    }
}

/// Free-scroll tuning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollConfig {
    /// Vertical travel (px) per move before a scroll engages (default: 5).
    pub drag_dead_zone: f64,
    /// Divisor applied to overshoot past either bound (default: 2.5).
    pub tension: f64,
    /// Fling gain applied to the last move's squared velocity (default: 0.75).
    pub fling_factor: f64,
    /// Settle animation after a fling (default: 750ms, decelerating curve).
    pub settle: Transition,
    /// Image swapped in for released images.
    pub placeholder_image: String,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            drag_dead_zone: 5.0,
            tension: 2.5,
            fling_factor: 0.75,
            settle: Transition::millis(750, Easing::SETTLE),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub deck: DeckConfig,
    pub scroll: ScrollConfig,
}

impl EngineConfig {
    #[must_use]
    pub fn with_page_transition(mut self, transition: Transition) -> Self {
        self.deck.page_transition = transition;
        self
    }

    #[must_use]
    pub fn with_swap_delay(mut self, delay: Duration) -> Self {
        self.deck.swap_delay = delay;
        self
    }

    #[must_use]
    pub fn with_deck_dead_zone(mut self, px: f64) -> Self {
        self.deck.drag_dead_zone = px;
        self
    }

    #[must_use]
    pub fn with_commit_scale(mut self, scale: f64) -> Self {
        self.deck.commit_scale = scale;
        self
    }

    #[must_use]
    pub fn with_scroll_dead_zone(mut self, px: f64) -> Self {
        self.scroll.drag_dead_zone = px;
        self
    }

    #[must_use]
    pub fn with_tension(mut self, tension: f64) -> Self {
        self.scroll.tension = tension;
        self
    }

    #[must_use]
    pub fn with_fling_factor(mut self, factor: f64) -> Self {
        self.scroll.fling_factor = factor;
        self
    }

    #[must_use]
    pub fn with_settle(mut self, transition: Transition) -> Self {
        self.scroll.settle = transition;
        self
    }

    #[must_use]
    pub fn with_placeholder_image(mut self, src: impl Into<String>) -> Self {
        self.scroll.placeholder_image = src.into();
        self
    }

    /// Check every tunable is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scroll.tension.is_finite() && self.scroll.tension > 0.0) {
            return Err(ConfigError::NonPositiveTension(self.scroll.tension));
        }
        for (field, value) in [
            ("deck.drag_dead_zone", self.deck.drag_dead_zone),
            ("scroll.drag_dead_zone", self.scroll.drag_dead_zone),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeDeadZone { field, value });
            }
        }
        if !(self.deck.commit_scale.is_finite() && self.deck.commit_scale > 0.0) {
            return Err(ConfigError::NonPositiveCommitScale(self.deck.commit_scale));
        }
        if !(self.scroll.fling_factor.is_finite() && self.scroll.fling_factor >= 0.0) {
            return Err(ConfigError::NegativeFlingFactor(self.scroll.fling_factor));
        }
        Ok(())
    }
}

/// Rejected configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    NonPositiveTension(f64),
    NegativeDeadZone { field: &'static str, value: f64 },
    NonPositiveCommitScale(f64),
    NegativeFlingFactor(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveTension(v) => write!(f, "scroll tension must be positive, got {v}"),
            Self::NegativeDeadZone { field, value } => {
                write!(f, "{field} must be a non-negative distance, got {value}")
            }
            Self::NonPositiveCommitScale(v) => {
                write!(f, "deck commit scale must be positive, got {v}")
            }
            Self::NegativeFlingFactor(v) => {
                write!(f, "scroll fling factor must be non-negative, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.deck.page_transition.css(), "250ms ease-out");
        assert_eq!(cfg.deck.swap_delay, Duration::from_millis(150));
        assert_eq!(cfg.scroll.settle.duration, Duration::from_millis(750));
        assert_eq!(cfg.scroll.placeholder_image, "../img/blank.png");
    }

    #[test]
    fn rejects_zero_tension() {
        let err = EngineConfig::default().with_tension(0.0).validate().unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveTension(0.0));
    }

    #[test]
    fn rejects_negative_dead_zone() {
        let err = EngineConfig::default()
            .with_scroll_dead_zone(-1.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().starts_with("scroll.drag_dead_zone"));
    }

    #[test]
    fn rejects_zero_commit_scale() {
        let err = EngineConfig::default().with_commit_scale(0.0).validate().unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveCommitScale(0.0));
    }

    #[test]
    fn rejects_nan() {
        assert!(EngineConfig::default().with_fling_factor(f64::NAN).validate().is_err());
    }
}
