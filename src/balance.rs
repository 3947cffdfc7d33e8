use serde::{Deserialize, Serialize};

/// Which side of a node is taller, if either.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Balance {
    Left,
    #[default]
    Same,
    Right,
}

/// The arm of a node that a descent took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Balance {
    /// The glyph used by the debug dump: `/`, `=` or `\`.
    pub fn glyph(self) -> char {
        match self {
            Balance::Left => '/',
            Balance::Same => '=',
            Balance::Right => '\\',
        }
    }

    /// True when this node leans toward `side`.
    pub fn leans(self, side: Side) -> bool {
        self == Balance::from(side)
    }
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl From<Side> for Balance {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Balance::Left,
            Side::Right => Balance::Right,
        }
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
