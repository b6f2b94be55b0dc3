//! Structural levels of the content hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed hierarchy levels of a content tree.
///
/// `Page` is the top-level unit boundary: succession never crosses from one
/// page into the next, and gating sessions are scoped to a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Course,
    Page,
    Article,
    Block,
    Component,
}

impl NodeKind {
    /// Numeric depth of this kind, course at 0, leaf components at 4.
    pub fn level(self) -> u8 {
        match self {
            Self::Course => 0,
            Self::Page => 1,
            Self::Article => 2,
            Self::Block => 3,
            Self::Component => 4,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Course),
            1 => Some(Self::Page),
            2 => Some(Self::Article),
            3 => Some(Self::Block),
            4 => Some(Self::Component),
            _ => None,
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "course" => Some(Self::Course),
            "page" => Some(Self::Page),
            "article" => Some(Self::Article),
            "block" => Some(Self::Block),
            "component" => Some(Self::Component),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Page => "page",
            Self::Article => "article",
            Self::Block => "block",
            Self::Component => "component",
        }
    }

    /// True for the top-level unit boundary kind.
    pub fn is_unit(self) -> bool {
        matches!(self, Self::Page)
    }

    /// True for kinds that cannot carry children.
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Component)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
