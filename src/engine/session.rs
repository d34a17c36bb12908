//! Caller-side game loop.
//!
//! A [`Session`] owns the visible grid and the tile source, and enforces the
//! two rules a presentation layer must follow:
//! - a tile is spawned only when an action actually changed the grid;
//! - no new action is accepted while the previous transition is still being
//!   shown, i.e. until [`Session::finish_animation`] is called.

use tracing::{debug, trace};

use super::animate::AnimationInstruction;
use super::spawn::{init_state, spawn_tile, Spawned, TileSource};
use super::{ops, Action, Grid};

/// Result of one accepted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: Action,
    /// Grid before the action.
    pub before: Grid,
    /// Grid after sliding/merging, before the spawn.
    pub merged: Grid,
    /// Grid to show once the animation completes.
    pub grid: Grid,
    pub instruction: AnimationInstruction,
    /// Whether the action changed the grid.
    pub moved: bool,
    pub spawned: Option<Spawned>,
}

/// The visible grid, its tile source, and whether a transition is on screen.
#[derive(Debug)]
pub struct Session<S> {
    grid: Grid,
    source: S,
    animating: bool,
}

impl<S: TileSource> Session<S> {
    /// Start a new game: two spawns on the empty grid.
    pub fn new(mut source: S) -> Self {
        let grid = init_state(&mut source);
        debug!(?grid, "session started");
        Self { grid, source, animating: false }
    }

    /// Start from a given grid, e.g. a test fixture.
    pub fn from_grid(grid: Grid, source: S) -> Self {
        Self { grid, source, animating: false }
    }

    #[inline]
    pub fn grid(&self) -> Grid {
        self.grid
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Apply `action` and spawn a tile if it changed the grid.
    ///
    /// Returns `None` while a previous transition is still animating. A no-op
    /// action returns a transition with `moved == false` and does not block
    /// further input.
    pub fn play(&mut self, action: Action) -> Option<Transition> {
        if self.animating {
            trace!(%action, "action ignored while animating");
            return None;
        }
        let before = self.grid;
        let (merged, instruction) = ops::apply_action(before, action);
        if merged == before {
            trace!(%action, "action left the grid unchanged");
            return Some(Transition {
                action,
                before,
                merged,
                grid: before,
                instruction,
                moved: false,
                spawned: None,
            });
        }
        let (grid, spawned) = spawn_tile(merged, &mut self.source);
        debug!(%action, row = spawned.row, col = spawned.col, tile = spawned.tile, "tile spawned");
        self.grid = grid;
        self.animating = true;
        Some(Transition {
            action,
            before,
            merged,
            grid,
            instruction,
            moved: true,
            spawned: Some(spawned),
        })
    }

    /// Mark the current transition as shown and return the grid to redraw.
    pub fn finish_animation(&mut self) -> Grid {
        self.animating = false;
        self.grid
    }

    /// Give back the tile source, e.g. to continue a seeded sequence elsewhere.
    pub fn into_source(self) -> S {
        self.source
    }
}
