//! slide-2048: a 2048 grid transformation engine with animation offsets
//!
//! This crate provides:
//! - A `Grid` value type with ergonomic methods (`apply`, `shift`, `with_random_tile`, ...)
//! - Per-line displacement vectors (`engine::AnimationInstruction`) describing how far
//!   each tile travels during a move, for a presentation layer to animate
//! - A `Session` driver that enforces the "spawn only after a real move" and
//!   "no new input while animating" contracts
//! - A postcard trace format for recorded sessions (`trace` module)
//!
//! Quick start:
//! ```
//! use slide_2048::engine::{Action, Grid};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic grid initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let g0 = Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
//! let (g1, instruction) = g0.apply(Action::Left);
//! assert_eq!(instruction.action, Action::Left);
//! assert!(g1.count_empty() >= g0.count_empty());
//! ```
//!
//! Driving a game (the presentation layer's loop)
//! ```
//! use slide_2048::engine::{Action, Session};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut session = Session::new(StdRng::seed_from_u64(7));
//! for action in Action::ALL {
//!     if let Some(transition) = session.play(action) {
//!         // ... animate `transition.instruction`, then redraw:
//!         let _visible = session.finish_animation();
//!         assert_eq!(transition.moved, transition.spawned.is_some());
//!     }
//! }
//! ```
//!
//! Note: for convenience there are also free functions mirroring the `Grid`
//! methods (`engine::apply_action`, `engine::spawn`, `engine::init_state`).
//!
pub mod engine;
pub mod trace;
