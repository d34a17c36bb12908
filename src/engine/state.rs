use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::animate::AnimationInstruction;
use super::line::Line;
use super::spawn::TileSource;
use super::{ops, spawn, Action, Axis, Tile, SIZE};

/// A 4x4 2048 grid, stored row-major.
///
/// `Grid` is `Copy`: every operation that "changes" it returns a new value and
/// leaves the original untouched, so a caller can keep the pre-move grid
/// around for comparison.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid([[Tile; SIZE]; SIZE]);

impl Grid {
    /// A constant empty grid (all zeros).
    pub const EMPTY: Grid = Grid([[0; SIZE]; SIZE]);

    /// Construct a `Grid` from its rows.
    #[inline]
    pub const fn from_rows(rows: [[Tile; SIZE]; SIZE]) -> Self {
        Grid(rows)
    }

    /// Borrow the rows.
    #[inline]
    pub fn rows(&self) -> &[[Tile; SIZE]; SIZE] {
        &self.0
    }

    /// Consume this `Grid`, returning its rows.
    #[inline]
    pub fn into_rows(self) -> [[Tile; SIZE]; SIZE] {
        self.0
    }

    /// Tile at (row, col). Panics when either index is out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.0[row][col]
    }

    /// Return a copy with one cell replaced.
    #[inline]
    pub fn with_tile(self, row: usize, col: usize, tile: Tile) -> Self {
        let mut next = self;
        next.0[row][col] = tile;
        next
    }

    /// Extract row or column `index` as a line.
    ///
    /// ```
    /// use slide_2048::engine::{Axis, Grid};
    /// let g = Grid::from_rows([[2, 0, 0, 0], [4, 0, 0, 0], [0; 4], [0, 0, 0, 8]]);
    /// assert_eq!(g.line(Axis::Row, 3), [0, 0, 0, 8]);
    /// assert_eq!(g.line(Axis::Col, 0), [2, 4, 0, 0]);
    /// ```
    pub fn line(&self, axis: Axis, index: usize) -> Line {
        assert!(index < SIZE, "line index {index} out of range for a {SIZE}x{SIZE} grid");
        match axis {
            Axis::Row => self.0[index],
            Axis::Col => std::array::from_fn(|i| self.0[i][index]),
        }
    }

    /// Return a copy with row or column `index` overwritten by `line`.
    pub fn with_line(self, axis: Axis, index: usize, line: Line) -> Self {
        assert!(index < SIZE, "line index {index} out of range for a {SIZE}x{SIZE} grid");
        let mut next = self;
        match axis {
            Axis::Row => next.0[index] = line,
            Axis::Col => {
                for (i, tile) in line.into_iter().enumerate() {
                    next.0[i][index] = tile;
                }
            }
        }
        next
    }

    /// Slide/merge tiles for `action` and report per-tile displacement (no random insert).
    ///
    /// ```
    /// use slide_2048::engine::{Action, Grid};
    /// let g = Grid::from_rows([[0, 0, 2, 2], [0; 4], [0; 4], [0; 4]]);
    /// let (moved, instruction) = g.apply(Action::Left);
    /// assert_eq!(moved.line(slide_2048::engine::Axis::Row, 0), [4, 0, 0, 0]);
    /// assert_eq!(instruction.lines[0], [0, 0, 2, 3]);
    /// ```
    #[inline]
    pub fn apply(self, action: Action) -> (Self, AnimationInstruction) {
        ops::apply_action(self, action)
    }

    /// Like [`Grid::apply`] but without the animation data.
    #[inline]
    pub fn shift(self, action: Action) -> Self {
        ops::apply_action(self, action).0
    }

    /// Insert a 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
    ///
    /// Panics if the grid has no empty cell.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use slide_2048::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let g = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<S: TileSource + ?Sized>(self, source: &mut S) -> Self {
        spawn::spawn(self, source)
    }

    /// Convenience: like `with_random_tile` but uses thread-local RNG.
    #[inline]
    pub fn with_random_tile_thread(self) -> Self {
        let mut rng = rand::thread_rng();
        self.with_random_tile(&mut rng)
    }

    /// Perform an action then insert a random tile if the action changed the grid.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, action: Action, rng: &mut R) -> Self {
        let moved = self.shift(action);
        if moved != self { moved.with_random_tile(rng) } else { self }
    }

    /// Positions of all empty cells, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells().filter(|&(_, _, t)| t == 0).map(|(r, c, _)| (r, c)).collect()
    }

    /// Count the number of empty cells on the grid.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.cells().filter(|&(_, _, t)| t == 0).count()
    }

    /// Return the highest tile value present (0 for an empty grid).
    pub fn highest_tile(&self) -> Tile {
        self.cells().map(|(_, _, t)| t).max().unwrap_or(0)
    }

    /// Iterate `(row, col, tile)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &t)| (r, c, t)))
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({:?})", self.0)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(SIZE * 7 + SIZE - 1);
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl From<[[Tile; SIZE]; SIZE]> for Grid {
    fn from(rows: [[Tile; SIZE]; SIZE]) -> Self {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for [[Tile; SIZE]; SIZE] {
    fn from(g: Grid) -> Self {
        g.into_rows()
    }
}

fn format_val(val: &Tile) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{x:^7}"),
    }
}
