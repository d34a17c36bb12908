use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use slide_2048::engine::{Action, AnimationInstruction, Session, Transition};
use slide_2048::trace::{self, Recorder};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slide-2048", version, about = "Play 2048 in the terminal")]
struct Args {
    /// Seed the tile RNG for a reproducible game
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Record the session to this file (postcard)
    #[arg(long, value_name = "PATH", global = true)]
    trace: Option<PathBuf>,
    /// Print per-line displacement offsets after each move
    #[arg(long, global = true)]
    offsets: bool,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Read one action per line from stdin (default)
    Play,
    /// Apply a string of moves, e.g. "wasd" or "ulrs"
    Script { moves: String },
    /// Verify a recorded trace and print its grids
    Replay {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

/// A session plus its recorder, printing each transition as text.
struct Game {
    session: Session<StdRng>,
    recorder: Recorder,
    offsets: bool,
}

impl Game {
    fn new(args: &Args) -> Self {
        let rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let session = Session::new(rng);
        let recorder = Recorder::for_session(&session, args.seed);
        println!("{}", session.grid());
        Self { session, recorder, offsets: args.offsets }
    }

    fn step(&mut self, action: Action) {
        let Some(t) = self.session.play(action) else { return };
        self.recorder.record(&t);
        print_transition(&t, self.offsets);
        // Text output has no playback delay.
        self.session.finish_animation();
    }

    fn finish(self, trace_path: Option<&Path>) -> Result<(), trace::TraceError> {
        info!(steps = self.recorder.len(), "game finished");
        if let Some(path) = trace_path {
            let run = self.recorder.finish(self.session.grid());
            trace::write_to_path(path, &run)?;
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match &args.cmd {
        Some(Cmd::Replay { path }) => replay(path),
        Some(Cmd::Script { moves }) => {
            let actions = moves
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_string().parse::<Action>())
                .collect::<Result<Vec<_>, _>>()?;
            let mut game = Game::new(&args);
            for action in actions {
                game.step(action);
            }
            game.finish(args.trace.as_deref())?;
            Ok(())
        }
        Some(Cmd::Play) | None => {
            let mut game = Game::new(&args);
            prompt()?;
            for line in io::stdin().lock().lines() {
                let line = line?;
                match line.trim() {
                    "" => continue,
                    "q" | "quit" => break,
                    token => match token.parse::<Action>() {
                        Ok(action) => game.step(action),
                        Err(e) => warn!("{e}"),
                    },
                }
                prompt()?;
            }
            game.finish(args.trace.as_deref())?;
            Ok(())
        }
    }
}

fn prompt() -> io::Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "move (w/a/s/d, q to quit)> ")?;
    out.flush()
}

fn print_transition(t: &Transition, offsets: bool) {
    if !t.moved {
        println!("{}: nothing moved", t.action);
        return;
    }
    println!("{}:", t.action);
    if offsets {
        print_offsets(&t.instruction);
    }
    println!("{}", t.grid);
}

fn print_offsets(ins: &AnimationInstruction) {
    for (idx, line) in ins.lines.iter().enumerate() {
        println!("  {:?} {idx}: {line:?}", ins.action.axis());
    }
}

fn replay(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let run = trace::read_from_path(path)?;
    run.verify()?;
    let grids = run.grids()?;
    info!(steps = run.meta.steps, seed = ?run.meta.seed, "trace loaded");
    println!("{}", run.initial);
    for (step, grid) in run.steps.iter().zip(&grids[1..]) {
        println!("{}:", step.action);
        println!("{grid}");
    }
    println!("steps: {}, highest tile: {}", run.meta.steps, run.meta.highest_tile);
    Ok(())
}
