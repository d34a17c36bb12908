use super::{Tile, SIZE};

/// One row or column, with index 0 as the compaction edge.
pub type Line = [Tile; SIZE];

/// Compact a line toward index 0 and merge equal neighbours once.
///
/// A merged tile never merges again in the same pass, so `[2, 2, 4, 0]`
/// becomes `[4, 4, 0, 0]`, not `[8, 0, 0, 0]`.
///
/// ```
/// use slide_2048::engine::collapse;
/// assert_eq!(collapse([2, 2, 2, 2]), [4, 4, 0, 0]);
/// assert_eq!(collapse([2, 0, 0, 2]), [4, 0, 0, 0]);
/// ```
pub fn collapse(line: Line) -> Line {
    let mut packed = compact(line);
    let mut idx = 0;
    while idx + 1 < SIZE && packed[idx] != 0 {
        if packed[idx] == packed[idx + 1] {
            packed[idx] += packed[idx + 1];
            packed[idx + 1] = 0;
            idx += 2;
        } else {
            idx += 1;
        }
    }
    compact(packed)
}

/// Stable removal of zeros, right-padded back to full length.
fn compact(line: Line) -> Line {
    let mut out = [0; SIZE];
    for (slot, tile) in out.iter_mut().zip(line.into_iter().filter(|&t| t != 0)) {
        *slot = tile;
    }
    out
}
