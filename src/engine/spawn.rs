use std::collections::VecDeque;

use rand::Rng;

use super::{Grid, Tile};

/// Where a spawned tile landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Spawned {
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
}

/// Source of the two random draws a spawn needs.
///
/// Every `rand::Rng` is a `TileSource`. Tests and replays can use
/// [`ScriptedSource`] to supply a fixed sequence instead.
pub trait TileSource {
    /// Pick an index in `0..empty`.
    fn pick_cell(&mut self, empty: usize) -> usize;
    /// Pick the value of the new tile.
    fn pick_tile(&mut self) -> Tile;
}

impl<R: Rng + ?Sized> TileSource for R {
    #[inline]
    fn pick_cell(&mut self, empty: usize) -> usize {
        self.gen_range(0..empty)
    }

    #[inline]
    fn pick_tile(&mut self) -> Tile {
        generate_random_tile(self)
    }
}

/// Replays a fixed list of `(empty-cell index, tile)` picks.
///
/// Panics when asked for more picks than it was given.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    picks: VecDeque<(usize, Tile)>,
}

impl ScriptedSource {
    pub fn new(picks: impl IntoIterator<Item = (usize, Tile)>) -> Self {
        Self { picks: picks.into_iter().collect() }
    }

    /// Picks not consumed yet.
    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl TileSource for ScriptedSource {
    fn pick_cell(&mut self, empty: usize) -> usize {
        let (idx, _) = *self.picks.front().expect("ScriptedSource exhausted");
        assert!(idx < empty, "scripted cell index {idx} but only {empty} empty cells");
        idx
    }

    fn pick_tile(&mut self) -> Tile {
        self.picks.pop_front().expect("ScriptedSource exhausted").1
    }
}

/// Insert a 2 (90%) or 4 (10%) tile into a uniformly chosen empty cell.
///
/// Panics if `grid` is full: spawning after a move that changed nothing, or on
/// a finished game, is a caller bug.
pub fn spawn<S: TileSource + ?Sized>(grid: Grid, source: &mut S) -> Grid {
    spawn_tile(grid, source).0
}

/// Like [`spawn`], also reporting where the tile went.
pub fn spawn_tile<S: TileSource + ?Sized>(grid: Grid, source: &mut S) -> (Grid, Spawned) {
    let empty = grid.empty_cells();
    assert!(!empty.is_empty(), "cannot spawn a tile on a full grid");
    let (row, col) = empty[source.pick_cell(empty.len())];
    let tile = source.pick_tile();
    (grid.with_tile(row, col, tile), Spawned { row, col, tile })
}

/// Starting grid: two spawns on the empty grid.
///
/// The second spawn sees the first tile, so the two never share a cell.
pub fn init_state<S: TileSource + ?Sized>(source: &mut S) -> Grid {
    spawn(spawn(Grid::EMPTY, source), source)
}

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}
