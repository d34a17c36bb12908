//! Animation instructions: how far each tile travels during a move.
//!
//! The presentation layer receives one [`Offsets`] vector per row or column.
//! Each entry is indexed by the tile's *source* position in the line and
//! holds the number of cells it slides toward the action's edge. Two tiles
//! that merge both travel to the same destination cell.

use serde::{Deserialize, Serialize};

use super::line::Line;
use super::{Action, Axis, SIZE};

/// Per-cell travel distances for one line, in cells (0 = stays put).
pub type Offsets = [u8; SIZE];

/// Everything a presentation layer needs to animate one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationInstruction {
    pub action: Action,
    /// One vector per line along `action.axis()`, in grid orientation.
    pub lines: [Offsets; SIZE],
}

impl AnimationInstruction {
    /// True when no tile moves at all.
    pub fn is_still(&self) -> bool {
        self.lines.iter().all(|l| l.iter().all(|&d| d == 0))
    }

    /// Destination of the tile at (row, col), or `None` if it does not move.
    pub fn destination(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        let (line, pos) = match self.action.axis() {
            Axis::Row => (row, col),
            Axis::Col => (col, row),
        };
        let d = self.lines[line][pos] as usize;
        if d == 0 {
            return None;
        }
        let to = if self.action.is_reverse() { pos + d } else { pos.checked_sub(d)? };
        Some(match self.action.axis() {
            Axis::Row => (row, to),
            Axis::Col => (to, col),
        })
    }
}

/// Match each source tile of `before` to its resting place in `after`.
///
/// `before` must be the line as fed into [`collapse`](super::collapse) and
/// `after` its output, both with index 0 as the compaction edge. Other pairs
/// terminate but produce meaningless offsets.
///
/// ```
/// use slide_2048::engine::derive_displacement;
/// assert_eq!(derive_displacement([2, 2, 4, 4], [4, 8, 0, 0]), [0, 1, 1, 2]);
/// assert_eq!(derive_displacement([0, 0, 0, 2], [2, 0, 0, 0]), [0, 0, 0, 3]);
/// ```
pub fn derive_displacement(before: Line, after: Line) -> Offsets {
    let mut out = [0; SIZE];
    let mut i = 0;
    let mut j = 0;
    while j < SIZE && after[j] != 0 {
        while i < SIZE && before[i] == 0 {
            i += 1;
        }
        if i >= SIZE {
            break;
        }
        if after[j] == before[i] {
            out[i] = i.saturating_sub(j) as u8;
            i += 1;
        } else {
            let mut k = i + 1;
            while k < SIZE && before[k] == 0 {
                k += 1;
            }
            out[i] = i.saturating_sub(j) as u8;
            if k < SIZE {
                out[k] = k.saturating_sub(j) as u8;
            }
            i = k + 1;
        }
        j += 1;
    }
    out
}
