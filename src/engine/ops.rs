use super::animate::{derive_displacement, AnimationInstruction};
use super::line::collapse;
use super::{Action, Grid, SIZE};

/// Slide/merge every line of `grid` toward the edge `action` points at.
///
/// Returns the new grid and the displacement vectors for each line along
/// `action.axis()`. No randomness; the input grid is untouched.
///
/// Lines of a reverse action (Down, Right) are flipped before collapsing so
/// that the merge always runs toward index 0, and flipped back afterwards
/// together with their offsets.
pub fn apply_action(grid: Grid, action: Action) -> (Grid, AnimationInstruction) {
    let axis = action.axis();
    let reverse = action.is_reverse();
    let mut next = grid;
    let mut lines = [[0; SIZE]; SIZE];
    for (idx, offsets) in lines.iter_mut().enumerate() {
        let mut line = grid.line(axis, idx);
        if reverse {
            line.reverse();
        }
        let mut merged = collapse(line);
        *offsets = derive_displacement(line, merged);
        if reverse {
            merged.reverse();
            offsets.reverse();
        }
        next = next.with_line(axis, idx, merged);
    }
    (next, AnimationInstruction { action, lines })
}
