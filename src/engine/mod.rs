//! Grid transformation engine.
//!
//! Leaf-first:
//! - [`line`]: collapse a single line of four tiles.
//! - [`state`]: the [`Grid`] value type and row/column access.
//! - [`ops`]: apply an [`Action`] to a whole grid.
//! - [`spawn`]: random tile insertion behind the [`TileSource`] trait.
//! - [`animate`]: per-line displacement vectors for the presentation layer.
//! - [`session`]: the caller-side game loop.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod animate;
pub mod line;
pub mod ops;
pub mod session;
pub mod spawn;
pub mod state;

pub use animate::{derive_displacement, AnimationInstruction, Offsets};
pub use line::{collapse, Line};
pub use ops::apply_action;
pub use session::{Session, Transition};
pub use spawn::{init_state, spawn, spawn_tile, ScriptedSource, Spawned, TileSource};
pub use state::Grid;

/// A single cell's value. 0 is empty, anything else is a power of two.
pub type Tile = u32;

/// Side length of the grid; also the length of every line.
pub const SIZE: usize = 4;

/// Row or column selector for line access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Row,
    Col,
}

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    /// All four actions, in `Up, Down, Left, Right` order.
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    /// Left/Right work on rows, Up/Down on columns.
    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Action::Left | Action::Right => Axis::Row,
            Action::Up | Action::Down => Axis::Col,
        }
    }

    /// True when the compaction edge is the high-index end of the line.
    #[inline]
    pub fn is_reverse(self) -> bool {
        matches!(self, Action::Down | Action::Right)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised action {0:?} (expected up/down/left/right, u/l/r or w/a/s/d)")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "w" => Ok(Action::Up),
            "down" | "s" => Ok(Action::Down),
            "left" | "l" | "a" => Ok(Action::Left),
            "right" | "r" | "d" => Ok(Action::Right),
            other => Err(ParseActionError(other.to_string())),
        }
    }
}

/// Structural equality, used by callers to detect no-op moves.
#[inline]
pub fn grids_equal(a: &Grid, b: &Grid) -> bool {
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_axis_and_reverse() {
        assert_eq!(Action::Left.axis(), Axis::Row);
        assert_eq!(Action::Right.axis(), Axis::Row);
        assert_eq!(Action::Up.axis(), Axis::Col);
        assert_eq!(Action::Down.axis(), Axis::Col);
        assert!(Action::Down.is_reverse());
        assert!(Action::Right.is_reverse());
        assert!(!Action::Up.is_reverse());
        assert!(!Action::Left.is_reverse());
    }

    #[test]
    fn parse_action_tokens() {
        assert_eq!("Up".parse::<Action>(), Ok(Action::Up));
        assert_eq!(" s ".parse::<Action>(), Ok(Action::Down));
        assert_eq!("a".parse::<Action>(), Ok(Action::Left));
        assert_eq!("right".parse::<Action>(), Ok(Action::Right));
        assert_eq!("d".parse::<Action>(), Ok(Action::Right));
        assert_eq!("x".parse::<Action>(), Err(ParseActionError("x".to_string())));
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn grids_equal_is_structural() {
        let g = Grid::from_rows([[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]);
        let copy = g;
        assert!(grids_equal(&g, &copy));
        assert!(!grids_equal(&g, &Grid::EMPTY));
    }
}
