#![forbid(unsafe_code)]

//! Baseline stylesheet installed once per host.
//!
//! Engines position layers with transforms; these rules lay panes out side
//! by side, clip scroll boxes and promote animated layers to their own
//! compositing layer. Hosts insert the rendered CSS into their document.

use std::fmt;

use deckflow_core::animation::Transition;

/// Class carried by paginator containers.
pub const PAGINATOR_CLASS: &str = "paginator";
/// Class carried by each pane.
pub const PANE_CLASS: &str = "pane";
/// Class carried by free-scroll containers.
pub const SCROLL_CLASS: &str = "scrollbox";
/// Class of the translated layer inside a scroll box.
pub const FLOW_CLASS: &str = "flow";
/// Class of the shadow strip drawn over a scroll box's top edge.
pub const SHADOW_CLASS: &str = "innershadow";

/// One selector and its declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<String>,
}

impl StyleRule {
    #[must_use]
    pub fn new<I, S>(selector: impl Into<String>, declarations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selector: selector.into(),
            declarations: declarations.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{ {} }}", self.selector, self.declarations.join("; "))
    }
}

/// Ordered list of rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Rules every deckflow host needs.
    ///
    /// `page_transition` is the paginator's default slide. Hosts without
    /// touch input also get text selection disabled on paginators so mouse
    /// drags page instead of selecting.
    #[must_use]
    pub fn baseline(has_touch: bool, page_transition: Transition) -> Self {
        let deck = format!(".{PAGINATOR_CLASS}");
        let pane = format!(".{PAGINATOR_CLASS} > .{PANE_CLASS}");
        let mut rules = vec![
            StyleRule::new("html", ["width: 100%", "overflow-x: hidden"]),
            StyleRule::new(
                deck.clone(),
                [
                    "white-space: nowrap".to_string(),
                    "width: 100%".to_string(),
                    format!("transition: transform {}", page_transition.css()),
                ],
            ),
            StyleRule::new(format!("{deck}, {pane}"), ["transform: translate3d(0, 0, 0)"]),
            StyleRule::new(
                pane,
                [
                    "white-space: normal",
                    "vertical-align: top",
                    "display: inline-block",
                    "width: 100%",
                ],
            ),
            StyleRule::new(format!(".{SCROLL_CLASS}"), ["overflow: hidden"]),
            StyleRule::new(
                format!(".{SCROLL_CLASS} > .{FLOW_CLASS}"),
                ["transform: translate3d(0, 0, 0)"],
            ),
            StyleRule::new(
                format!(".{SHADOW_CLASS}"),
                [
                    "position: absolute",
                    "z-index: 1000",
                    "height: 8px",
                    "width: 100%",
                    "background: linear-gradient(to bottom, rgba(0, 0, 0, 0.5), rgba(0, 0, 0, 0))",
                ],
            ),
        ];
        if !has_touch {
            rules.push(StyleRule::new(deck, ["user-select: none"]));
        }
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// First rule with exactly this selector.
    #[must_use]
    pub fn rule(&self, selector: &str) -> Option<&StyleRule> {
        self.rules.iter().find(|r| r.selector == selector)
    }

    pub fn push(&mut self, rule: StyleRule) {
        self.rules.push(rule);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}
