//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`], which the
//! scheduler owns exclusively.

use std::collections::VecDeque;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Cell;
use crate::consts::*;

/// Heading on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// One-cell step in this direction
    pub fn delta(self) -> Cell {
        match self {
            Direction::Up => Cell::NEG_Y,
            Direction::Down => Cell::Y,
            Direction::Left => Cell::NEG_X,
            Direction::Right => Cell::X,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Title screen, items hidden
    Start,
    /// Active gameplay
    Playing,
    /// Ran into a wall or into itself
    LostWallOrSelf,
    /// Walked into the man
    LostThreat,
    /// Collected enough matcha, waiting for the player to answer
    Won,
    /// Post-win celebration screen
    Celebrating,
}

impl GameStatus {
    /// Either of the game over screens
    pub fn is_lost(self) -> bool {
        matches!(self, GameStatus::LostWallOrSelf | GameStatus::LostThreat)
    }
}

/// The four special items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Goal: +1 score, grows the bear, speeds up the game
    Matcha,
    /// Penalty: -5 score
    Toilet,
    /// Freeze: the bear naps for a second
    Bed,
    /// Threat: contact loses the game, and he pulls the bear in when close
    Man,
}

impl ItemKind {
    /// Resolution priority order
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Matcha,
        ItemKind::Toilet,
        ItemKind::Bed,
        ItemKind::Man,
    ];
}

/// Positions of the four items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Items {
    pub matcha: Cell,
    pub toilet: Cell,
    pub bed: Cell,
    pub man: Cell,
}

impl Default for Items {
    /// Title-screen layout, replaced by random placement when a game starts
    fn default() -> Self {
        Self {
            matcha: Cell::new(7, 3),
            toilet: Cell::new(10, 10),
            bed: Cell::new(2, 2),
            man: Cell::new(12, 2),
        }
    }
}

impl Items {
    pub fn get(&self, kind: ItemKind) -> Cell {
        match kind {
            ItemKind::Matcha => self.matcha,
            ItemKind::Toilet => self.toilet,
            ItemKind::Bed => self.bed,
            ItemKind::Man => self.man,
        }
    }

    pub fn set(&mut self, kind: ItemKind, cell: Cell) {
        match kind {
            ItemKind::Matcha => self.matcha = cell,
            ItemKind::Toilet => self.toilet = cell,
            ItemKind::Bed => self.bed = cell,
            ItemKind::Man => self.man = cell,
        }
    }

    pub fn cells(&self) -> [Cell; 4] {
        [self.matcha, self.toilet, self.bed, self.man]
    }

    /// Positions of every item except `kind`
    pub fn others(&self, kind: ItemKind) -> impl Iterator<Item = Cell> + '_ {
        ItemKind::ALL
            .into_iter()
            .filter(move |k| *k != kind)
            .map(|k| self.get(k))
    }

    /// Item standing on `cell`, first match in priority order
    pub fn at(&self, cell: Cell) -> Option<ItemKind> {
        ItemKind::ALL.into_iter().find(|k| self.get(*k) == cell)
    }
}

/// The bear's body, head first. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Default for Snake {
    /// Three cells standing upright in the middle of the board
    fn default() -> Self {
        Self::new(Cell::new(7, 7), [Cell::new(7, 8), Cell::new(7, 9)])
    }
}

impl Snake {
    pub fn new(head: Cell, rest: impl IntoIterator<Item = Cell>) -> Self {
        let mut body = VecDeque::from([head]);
        body.extend(rest);
        Self { body }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a live snake
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// True if moving the head onto `cell` would bite the body.
    ///
    /// The tail is left out since it moves away on the same tick.
    pub fn hits_body(&self, cell: Cell) -> bool {
        self.body.iter().take(self.body.len() - 1).any(|c| *c == cell)
    }

    pub(crate) fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    pub fn to_vec(&self) -> Vec<Cell> {
        self.body.iter().copied().collect()
    }
}

/// Things that happened during a tick or a lifecycle step.
///
/// Drained by the scheduler and forwarded to the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    MatchaCollected,
    ToiletHit,
    /// Bed reached, freeze begins
    FellAsleep,
    Crashed,
    Won,
    MusicStarted,
    MusicStopped,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub status: GameStatus,
    pub snake: Snake,
    /// Committed heading
    pub direction: Direction,
    /// Heading requested by input, applied on the next tick
    pub pending_direction: Option<Direction>,
    pub items: Items,
    /// Matcha collected
    pub score: u32,
    /// Current tick interval (ms)
    pub speed_ms: u32,
    /// Bed freeze in effect
    pub frozen: bool,
    /// Ticks resolved this session
    pub time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a title-screen state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            status: GameStatus::Start,
            snake: Snake::default(),
            direction: Direction::Up,
            pending_direction: None,
            items: Items::default(),
            score: 0,
            speed_ms: INITIAL_SPEED,
            frozen: false,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Put the board back to its title-screen layout. Keeps the RNG stream.
    pub(crate) fn reset_board(&mut self) {
        self.snake = Snake::default();
        self.direction = Direction::Up;
        self.pending_direction = None;
        self.items = Items::default();
        self.score = 0;
        self.speed_ms = INITIAL_SPEED;
        self.frozen = false;
        self.time_ticks = 0;
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Ask to turn on the next tick.
    ///
    /// A request for the reverse of the committed heading is ignored and
    /// `false` is returned.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if direction.is_opposite(self.direction) {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    /// Heading shown to the player
    pub fn facing(&self) -> Direction {
        self.pending_direction.unwrap_or(self.direction)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.speed_ms))
    }

    /// End the bed freeze
    pub fn wake_up(&mut self) {
        if self.frozen {
            log::debug!("Bear woke up");
        }
        self.frozen = false;
    }

    /// Cells a relocated `kind` must avoid: the bear plus the other three items
    pub fn occupied_except(&self, kind: ItemKind) -> Vec<Cell> {
        self.snake.iter().chain(self.items.others(kind)).collect()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
