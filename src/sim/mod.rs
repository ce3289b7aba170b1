//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One cell per tick, no wall-clock reads
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod grid;
pub mod lifecycle;
pub mod snapshot;
pub mod state;
pub mod steering;
pub mod tick;

pub use grid::{PlacementError, all_cells, random_unoccupied_cell};
pub use lifecycle::{LifecycleError, TransitionError, confirm_win, play_again, start};
pub use snapshot::Snapshot;
pub use state::{Direction, GameEvent, GameState, GameStatus, ItemKind, Items, Snake};
pub use steering::{is_attracted, next_head};
pub use tick::{TickError, TickOutcome, advance_tick};
