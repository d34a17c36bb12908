//! Recorded sessions.
//!
//! A [`Run`] stores the starting grid and, per accepted action, the grid it
//! was applied to and where the follow-up tile spawned. That is enough to
//! replay the session exactly without the original random source. Runs are
//! postcard-encoded replay logs; they carry no tile source state and are not
//! a way to continue a game.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::{Action, Grid, Session, Spawned, Tile, TileSource, Transition, SIZE};

const VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub version: u8,
    /// Number of steps, saturating at `u32::MAX`.
    pub steps: u32,
    pub start_unix_s: u64,
    /// RNG seed, when the session was seeded.
    pub seed: Option<u64>,
    pub highest_tile: Tile,
    pub engine_str: Option<String>,
}

/// One action as it was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Grid the action was applied to.
    pub before: Grid,
    pub action: Action,
    /// `None` for an action that changed nothing.
    pub spawned: Option<Spawned>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub meta: Meta,
    pub initial: Grid,
    pub steps: Vec<Step>,
    pub final_grid: Grid,
}

#[derive(thiserror::Error, Debug)]
pub enum TraceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error("unsupported trace version {0}")]
    Version(u8),
    #[error("replay diverged at step {step}")]
    Replay { step: usize },
}

/// Accumulates [`Step`]s from a running [`Session`].
#[derive(Debug, Clone)]
pub struct Recorder {
    seed: Option<u64>,
    start_unix_s: u64,
    initial: Grid,
    steps: Vec<Step>,
}

impl Recorder {
    pub fn new(initial: Grid, seed: Option<u64>) -> Self {
        Self { seed, start_unix_s: now_unix_seconds(), initial, steps: Vec::new() }
    }

    /// Start recording from the session's current grid.
    pub fn for_session<S: TileSource>(session: &Session<S>, seed: Option<u64>) -> Self {
        Self::new(session.grid(), seed)
    }

    pub fn record(&mut self, t: &Transition) {
        self.steps.push(Step { before: t.before, action: t.action, spawned: t.spawned });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn finish(self, final_grid: Grid) -> Run {
        let highest_tile = std::iter::once(self.initial)
            .chain(self.steps.iter().map(|s| s.before))
            .chain(std::iter::once(final_grid))
            .map(|g| g.highest_tile())
            .max()
            .unwrap_or(0);
        Run {
            meta: Meta {
                version: VERSION,
                steps: step_count(self.steps.len()),
                start_unix_s: self.start_unix_s,
                seed: self.seed,
                highest_tile,
                engine_str: Some(format!("slide-2048 {}", env!("CARGO_PKG_VERSION"))),
            },
            initial: self.initial,
            steps: self.steps,
            final_grid,
        }
    }
}

impl Run {
    /// Replay every step and check it reproduces the recorded grids.
    pub fn verify(&self) -> Result<(), TraceError> {
        let grids = self.grids()?;
        if grids.last() != Some(&self.final_grid) {
            return Err(TraceError::Replay { step: self.steps.len() });
        }
        debug!(steps = self.steps.len(), "trace verified");
        Ok(())
    }

    /// The visible grid after each step, starting with the initial grid.
    ///
    /// Fails on the first step that does not replay, so on success there is
    /// exactly one grid per step plus the initial one.
    pub fn grids(&self) -> Result<Vec<Grid>, TraceError> {
        if self.meta.version != VERSION {
            return Err(TraceError::Version(self.meta.version));
        }
        let mut out = Vec::with_capacity(self.steps.len() + 1);
        let mut current = self.initial;
        out.push(current);
        for (idx, step) in self.steps.iter().enumerate() {
            if step.before != current {
                return Err(TraceError::Replay { step: idx });
            }
            current = replay_step(step).ok_or(TraceError::Replay { step: idx })?;
            out.push(current);
        }
        Ok(out)
    }
}

/// Grid after `step`, or `None` if the recorded spawn is inconsistent with the move.
fn replay_step(step: &Step) -> Option<Grid> {
    let merged = step.before.shift(step.action);
    match step.spawned {
        None if merged == step.before => Some(merged),
        Some(s)
            if merged != step.before
                && s.row < SIZE
                && s.col < SIZE
                && matches!(s.tile, 2 | 4)
                && merged.get(s.row, s.col) == 0 =>
        {
            Some(merged.with_tile(s.row, s.col, s.tile))
        }
        _ => None,
    }
}

fn step_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Encode a run to postcard bytes.
pub fn to_postcard_bytes(run: &Run) -> Result<Vec<u8>, TraceError> {
    Ok(postcard::to_allocvec(run)?)
}

/// Decode a run from postcard bytes.
pub fn from_postcard_bytes(bytes: &[u8]) -> Result<Run, TraceError> {
    Ok(postcard::from_bytes(bytes)?)
}

/// Write a postcard-encoded run to a file.
pub fn write_to_path<P: AsRef<Path>>(path: P, run: &Run) -> Result<(), TraceError> {
    let bytes = to_postcard_bytes(run)?;
    fs::write(path.as_ref(), &bytes)?;
    info!(path = %path.as_ref().display(), bytes = bytes.len(), steps = run.meta.steps, "trace written");
    Ok(())
}

/// Read a postcard-encoded run from a file.
pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Run, TraceError> {
    let bytes = fs::read(path)?;
    from_postcard_bytes(&bytes)
}

pub fn now_unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use tempfile::NamedTempFile;

    fn make_run() -> Run {
        let mut session = Session::new(StdRng::seed_from_u64(11));
        let mut rec = Recorder::for_session(&session, Some(11));
        for action in [Action::Left, Action::Up, Action::Right, Action::Down, Action::Left] {
            if let Some(t) = session.play(action) {
                rec.record(&t);
                session.finish_animation();
            }
        }
        rec.finish(session.grid())
    }

    #[test]
    fn recorded_run_verifies() {
        let run = make_run();
        assert_eq!(run.meta.steps, 5);
        assert_eq!(run.meta.seed, Some(11));
        run.verify().expect("replay");
        let grids = run.grids().expect("replay");
        assert_eq!(grids.len(), 6);
        assert_eq!(grids.last(), Some(&run.final_grid));
    }

    #[test]
    fn tampered_run_fails_verify() {
        let mut run = make_run();
        run.final_grid = run.final_grid.with_tile(0, 0, 1024);
        assert!(matches!(run.verify(), Err(TraceError::Replay { step: 5 })));

        let mut run = make_run();
        run.meta.version = 0;
        assert!(matches!(run.verify(), Err(TraceError::Version(0))));
    }

    #[test]
    fn spawn_on_occupied_cell_is_rejected() {
        let before = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let step = Step {
            before,
            action: Action::Left,
            spawned: Some(Spawned { row: 0, col: 0, tile: 2 }),
        };
        assert_eq!(replay_step(&step), None);
    }

    fn first_spawning_step(run: &Run) -> (usize, Spawned) {
        run.steps
            .iter()
            .enumerate()
            .find_map(|(idx, s)| s.spawned.map(|sp| (idx, sp)))
            .expect("run has a spawning step")
    }

    #[test]
    fn spawn_outside_the_grid_is_rejected() {
        let mut run = make_run();
        let (idx, spawned) = first_spawning_step(&run);
        run.steps[idx].spawned = Some(Spawned { row: 9, ..spawned });
        let loaded = from_postcard_bytes(&to_postcard_bytes(&run).unwrap()).unwrap();
        assert!(matches!(loaded.verify(), Err(TraceError::Replay { step }) if step == idx));

        run.steps[idx].spawned = Some(Spawned { col: SIZE, ..spawned });
        assert!(matches!(run.verify(), Err(TraceError::Replay { step }) if step == idx));
    }

    #[test]
    fn spawn_of_other_tile_values_is_rejected() {
        let before = Grid::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        for tile in [0, 3, 8] {
            let step = Step {
                before,
                action: Action::Left,
                spawned: Some(Spawned { row: 1, col: 1, tile }),
            };
            assert_eq!(replay_step(&step), None, "tile {tile}");
        }
        let step = Step {
            before,
            action: Action::Left,
            spawned: Some(Spawned { row: 1, col: 1, tile: 4 }),
        };
        assert!(replay_step(&step).is_some());
    }

    #[test]
    fn grids_stop_at_divergent_step() {
        let mut run = make_run();
        let (idx, spawned) = first_spawning_step(&run);
        run.steps[idx].spawned = Some(Spawned { tile: 3, ..spawned });
        assert!(matches!(run.grids(), Err(TraceError::Replay { step }) if step == idx));

        let mut run = make_run();
        run.meta.version = 0;
        assert!(matches!(run.grids(), Err(TraceError::Version(0))));
    }

    #[test]
    fn step_count_saturates() {
        assert_eq!(step_count(5), 5);
        assert_eq!(step_count(usize::MAX), u32::MAX);
    }

    #[test]
    fn test_write_and_read_path() {
        let run = make_run();
        let tmp = NamedTempFile::new().unwrap();
        write_to_path(tmp.path(), &run).unwrap();
        let loaded = read_from_path(tmp.path()).unwrap();
        assert_eq!(run, loaded);
        loaded.verify().unwrap();
    }

    #[test]
    fn truncated_bytes_are_an_error() {
        let bytes = to_postcard_bytes(&make_run()).unwrap();
        assert!(matches!(
            from_postcard_bytes(&bytes[..bytes.len() / 2]),
            Err(TraceError::Postcard(_))
        ));
    }
}
