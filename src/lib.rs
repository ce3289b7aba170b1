//! Matcha Bear - a single-screen grid arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, pickups, game status)
//! - `scheduler`: Frame-driven fixed-timestep loop that owns the game state
//! - `timer`: Cancellable one-shot timers used by the scheduler
//! - `audio`: Signal-to-tone translation for the audio collaborator
//! - `input`: Key/touch mapping onto direction requests
//! - `settings`: User preferences loaded from JSON

pub mod audio;
pub mod input;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod timer;

pub use scheduler::Scheduler;
pub use settings::Settings;

use glam::IVec2;

/// A grid cell. `x` grows to the right, `y` grows downward.
pub type Cell = IVec2;

/// Game configuration constants
pub mod consts {
    /// Cells per side of the square board
    pub const GRID_SIZE: i32 = 15;
    /// Matcha needed to win
    pub const HEART_GOAL: u32 = 12;

    /// Tick interval at the start of a game (ms)
    pub const INITIAL_SPEED: u32 = 200;
    /// Fastest allowed tick interval (ms)
    pub const MIN_SPEED: u32 = 100;
    /// Interval reduction per matcha (ms)
    pub const SPEED_INCREMENT: u32 = 2;

    /// Score lost when stepping on the toilet
    pub const TOILET_PENALTY: u32 = 5;

    /// Steering is taken over when the head is this close to the man
    pub const ATTRACTION_RADIUS: f32 = 1.5;

    /// Wall-clock length of the bed freeze (ms)
    pub const FREEZE_DURATION_MS: u64 = 1000;

    /// Rejection-sampling attempts before placement falls back to a scan
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 256;
}

/// True if the cell lies on the board
#[inline]
pub fn in_bounds(cell: Cell) -> bool {
    (0..consts::GRID_SIZE).contains(&cell.x) && (0..consts::GRID_SIZE).contains(&cell.y)
}

/// Euclidean distance between two cells
#[inline]
pub fn cell_distance(a: Cell, b: Cell) -> f32 {
    (b - a).as_vec2().length()
}
