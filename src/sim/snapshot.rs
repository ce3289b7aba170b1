//! Read-only view of the game for renderers
//!
//! Captured after every tick. Serializable so a front-end living elsewhere
//! (another thread, a web page) can consume it as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::{Direction, GameState, GameStatus, Items};
use crate::Cell;
use crate::consts::{GRID_SIZE, HEART_GOAL};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: GameStatus,
    pub score: u32,
    pub goal: u32,
    pub frozen: bool,
    /// Heading the head sprite should face
    pub facing: Direction,
    pub head: Cell,
    /// Body cells after the head, in order
    pub body: Vec<Cell>,
    pub items: Items,
    pub speed_ms: u32,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            status: state.status,
            score: state.score,
            goal: HEART_GOAL,
            frozen: state.frozen,
            facing: state.facing(),
            head: state.snake.head(),
            body: state.snake.iter().skip(1).collect(),
            items: state.items,
            speed_ms: state.speed_ms,
        }
    }

    /// Items are hidden on the title screen
    pub fn items_visible(&self) -> bool {
        self.status != GameStatus::Start
    }

    fn glyph(&self, cell: Cell) -> char {
        if cell == self.head {
            return match self.facing {
                Direction::Up => '^',
                Direction::Down => 'v',
                Direction::Left => '<',
                Direction::Right => '>',
            };
        }
        if self.body.contains(&cell) {
            return 'o';
        }
        if self.items_visible() {
            if cell == self.items.matcha {
                return 'M';
            }
            if cell == self.items.toilet {
                return 'T';
            }
            if cell == self.items.bed {
                return 'Z';
            }
            if cell == self.items.man {
                return 'X';
            }
        }
        '.'
    }
}

/// Plain text board, for logs and the demo binary
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE {
            let row: String = (0..GRID_SIZE).map(|x| self.glyph(Cell::new(x, y))).collect();
            writeln!(f, "{row}")?;
        }
        write!(
            f,
            "{:?} | {}/{} matcha | {}ms{}",
            self.status,
            self.score,
            self.goal,
            self.speed_ms,
            if self.frozen { " | zzz" } else { "" }
        )
    }
}
