#![forbid(unsafe_code)]

//! Construction errors.
//!
//! Navigation and gesture handling never fail; only building engines from a
//! layout tree or a configuration can.

use std::fmt;

use deckflow_layout::NodeHandle;

pub use crate::config::ConfigError;

/// Which engine kind an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Paginator,
    FreeScroll,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Paginator => "paginator",
            Self::FreeScroll => "free scroll",
        })
    }
}

/// Failure to build an engine.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A live engine of the same kind already uses this id.
    DuplicateId { kind: EngineKind, id: String },
    /// The root node is neither a paginator nor a free scroll.
    NotAnEngine { handle: Option<NodeHandle> },
    InvalidConfig(ConfigError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId { kind, id } => write!(f, "{kind} id {id:?} is already registered"),
            Self::NotAnEngine { handle: Some(h) } => {
                write!(f, "node {h} is neither a paginator nor a free scroll")
            }
            Self::NotAnEngine { handle: None } => {
                write!(f, "text node is neither a paginator nor a free scroll")
            }
            Self::InvalidConfig(err) => write!(f, "invalid engine configuration: {err}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for BuildError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn messages() {
        let dup = BuildError::DuplicateId {
            kind: EngineKind::Paginator,
            id: "deck".into(),
        };
        assert_eq!(dup.to_string(), "paginator id \"deck\" is already registered");
        let root = BuildError::NotAnEngine {
            handle: Some(NodeHandle(4)),
        };
        assert_eq!(root.to_string(), "node #4 is neither a paginator nor a free scroll");
    }

    #[test]
    fn config_error_is_source() {
        let err = BuildError::from(ConfigError::NonPositiveTension(0.0));
        assert!(err.source().is_some());
    }
}
