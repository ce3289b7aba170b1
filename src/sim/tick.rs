//! Fixed timestep simulation tick
//!
//! One call moves the bear one cell and resolves what it walked into.

use thiserror::Error;

use super::grid::{PlacementError, random_unoccupied_cell};
use super::lifecycle::TransitionError;
use super::state::{GameEvent, GameState, GameStatus, ItemKind};
use super::steering::next_head;
use crate::consts::*;
use crate::{Cell, in_bounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TickError {
    /// Ticks only run while playing
    #[error("tick requested while the game is {0:?}")]
    NotPlaying(GameStatus),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Bed freeze in effect, nothing moved
    Frozen,
    /// The bear moved, possibly onto an item
    Moved(Option<ItemKind>),
    /// The game ended; carries the final status
    Ended(GameStatus),
}

/// Advance the game by one tick
pub fn advance_tick(state: &mut GameState) -> Result<TickOutcome, TickError> {
    if state.status != GameStatus::Playing {
        return Err(TickError::NotPlaying(state.status));
    }
    if state.frozen {
        return Ok(TickOutcome::Frozen);
    }

    state.time_ticks += 1;

    if let Some(direction) = state.pending_direction.take() {
        state.direction = direction;
    }
    let (head, direction) = next_head(state.snake.head(), state.direction, state.items.man);
    state.direction = direction;

    if !in_bounds(head) || state.snake.hits_body(head) {
        return end_game(state, GameStatus::LostWallOrSelf);
    }
    if head == state.items.man {
        return end_game(state, GameStatus::LostThreat);
    }

    let item = state.items.at(head);

    if item == Some(ItemKind::Matcha) && state.score + 1 >= HEART_GOAL {
        // Winning move is not applied to the board
        state.score += 1;
        state.emit(GameEvent::MatchaCollected);
        state.emit(GameEvent::Won);
        state.emit(GameEvent::MusicStopped);
        state.transition(GameStatus::Won)?;
        log::info!("Won after {} ticks", state.time_ticks);
        return Ok(TickOutcome::Ended(GameStatus::Won));
    }

    // Find the picked-up item a new cell first so a failed placement leaves
    // the board untouched
    let target = match item {
        Some(kind @ (ItemKind::Matcha | ItemKind::Toilet | ItemKind::Bed)) => {
            Some((kind, relocation_cell(state, kind, head)?))
        }
        Some(ItemKind::Man) | None => None,
    };

    state.snake.push_head(head);
    if let Some((kind, cell)) = target {
        state.items.set(kind, cell);
    }

    match item {
        Some(ItemKind::Matcha) => {
            state.emit(GameEvent::MatchaCollected);
            state.score += 1;
            state.speed_ms = state.speed_ms.saturating_sub(SPEED_INCREMENT).max(MIN_SPEED);
            log::debug!(
                "Matcha {}/{} at {:?}, interval now {}ms",
                state.score,
                HEART_GOAL,
                head,
                state.speed_ms
            );
        }
        Some(ItemKind::Toilet) => {
            state.emit(GameEvent::ToiletHit);
            state.score = state.score.saturating_sub(TOILET_PENALTY);
            state.snake.drop_tail();
            log::debug!("Toilet at {:?}, score now {}", head, state.score);
        }
        Some(ItemKind::Bed) => {
            state.frozen = true;
            state.emit(GameEvent::FellAsleep);
            state.snake.drop_tail();
            log::debug!("Bed at {:?}, freezing", head);
        }
        Some(ItemKind::Man) | None => state.snake.drop_tail(),
    }

    Ok(TickOutcome::Moved(item))
}

fn end_game(state: &mut GameState, status: GameStatus) -> Result<TickOutcome, TickError> {
    state.emit(GameEvent::Crashed);
    state.emit(GameEvent::MusicStopped);
    state.transition(status)?;
    log::info!(
        "Game over ({:?}) with {} matcha after {} ticks",
        status,
        state.score,
        state.time_ticks
    );
    Ok(TickOutcome::Ended(status))
}

/// Random cell for `kind` clear of the other items and of the bear as it
/// will be once its head is on `head`. Only the goal item grows the bear, so
/// otherwise the current tail is free.
fn relocation_cell(
    state: &mut GameState,
    kind: ItemKind,
    head: Cell,
) -> Result<Cell, PlacementError> {
    let keep = if kind == ItemKind::Matcha {
        state.snake.len()
    } else {
        state.snake.len() - 1
    };
    let exclude: Vec<Cell> = std::iter::once(head)
        .chain(state.snake.iter().take(keep))
        .chain(state.items.others(kind))
        .collect();
    random_unoccupied_cell(state.rng(), &exclude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lifecycle::start;
    use crate::sim::state::{Direction, Items, Snake};
    use proptest::prelude::*;

    /// Playing state with the seed snake and items parked in the far corners
    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        start(&mut state).unwrap();
        state.items = Items {
            matcha: Cell::new(0, 14),
            toilet: Cell::new(14, 14),
            bed: Cell::new(0, 0),
            man: Cell::new(14, 0),
        };
        state.drain_events();
        state
    }

    fn assert_all_distinct(state: &GameState) {
        let mut cells: Vec<Cell> = state.snake.to_vec();
        cells.extend(state.items.cells());
        let total = cells.len();
        cells.sort_by_key(|c| (c.x, c.y));
        cells.dedup();
        assert_eq!(cells.len(), total, "overlapping cells in {:?}", state);
    }

    #[test]
    fn test_matcha_pickup_grows_and_speeds_up() {
        let mut state = playing_state(1);
        state.items.matcha = Cell::new(7, 6);

        let outcome = advance_tick(&mut state).unwrap();
        assert_eq!(outcome, TickOutcome::Moved(Some(ItemKind::Matcha)));
        assert_eq!(state.snake.head(), Cell::new(7, 6));
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.score, 1);
        assert_ne!(state.items.matcha, Cell::new(7, 6));
        assert_eq!(state.speed_ms, 198);
        assert_eq!(state.drain_events(), vec![GameEvent::MatchaCollected]);
        assert_all_distinct(&state);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut state = playing_state(1);
        assert_eq!(advance_tick(&mut state).unwrap(), TickOutcome::Moved(None));
        assert_eq!(
            state.snake.to_vec(),
            vec![Cell::new(7, 6), Cell::new(7, 7), Cell::new(7, 8)]
        );
    }

    #[test]
    fn test_off_left_edge_loses() {
        let mut state = playing_state(1);
        state.snake = Snake::new(Cell::new(0, 5), [Cell::new(1, 5), Cell::new(2, 5)]);
        state.direction = Direction::Left;
        let before = state.snake.clone();

        let outcome = advance_tick(&mut state).unwrap();
        assert_eq!(outcome, TickOutcome::Ended(GameStatus::LostWallOrSelf));
        assert_eq!(state.status, GameStatus::LostWallOrSelf);
        assert_eq!(state.snake, before);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Crashed, GameEvent::MusicStopped]
        );
    }

    #[test]
    fn test_self_bite_loses_but_tail_chase_is_fine() {
        let mut state = playing_state(1);
        // Square loop: moving up from (5,5) lands on the tail at (5,4)
        state.snake = Snake::new(
            Cell::new(5, 5),
            [Cell::new(6, 5), Cell::new(6, 4), Cell::new(5, 4)],
        );
        state.direction = Direction::Up;
        assert_eq!(advance_tick(&mut state).unwrap(), TickOutcome::Moved(None));
        assert_eq!(state.snake.head(), Cell::new(5, 4));

        let mut state = playing_state(1);
        state.snake = Snake::new(
            Cell::new(5, 5),
            [Cell::new(6, 5), Cell::new(6, 4), Cell::new(5, 4), Cell::new(4, 4)],
        );
        state.direction = Direction::Up;
        assert_eq!(
            advance_tick(&mut state).unwrap(),
            TickOutcome::Ended(GameStatus::LostWallOrSelf)
        );
    }

    #[test]
    fn test_pull_into_man_loses() {
        let mut state = playing_state(1);
        state.items.man = Cell::new(7, 6);
        state.direction = Direction::Left;
        state.pending_direction = None;

        let outcome = advance_tick(&mut state).unwrap();
        assert_eq!(outcome, TickOutcome::Ended(GameStatus::LostThreat));
        assert_eq!(state.direction, Direction::Up);
        assert_eq!(state.snake.head(), Cell::new(7, 7));
    }

    #[test]
    fn test_pull_steers_toward_man() {
        let mut state = playing_state(1);
        // Man up and to the right, distance sqrt(2)
        state.items.man = Cell::new(8, 6);
        state.direction = Direction::Up;
        state.pending_direction = Some(Direction::Left);

        advance_tick(&mut state).unwrap();
        assert_eq!(state.snake.head(), Cell::new(7, 6));
        assert_eq!(state.direction, Direction::Up);
    }

    #[test]
    fn test_toilet_floors_score() {
        let mut state = playing_state(1);
        state.score = 3;
        state.items.toilet = Cell::new(7, 6);

        let outcome = advance_tick(&mut state).unwrap();
        assert_eq!(outcome, TickOutcome::Moved(Some(ItemKind::Toilet)));
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 3);
        assert_ne!(state.items.toilet, Cell::new(7, 6));
        assert_eq!(state.drain_events(), vec![GameEvent::ToiletHit]);
        assert_all_distinct(&state);
    }

    /// Bear with its head at (7, 7) covering every cell the items leave free
    fn packed_snake(items: &Items) -> Snake {
        let head = Cell::new(7, 7);
        let rest = crate::sim::grid::all_cells()
            .filter(|c| *c != head && items.at(*c).is_none());
        Snake::new(head, rest)
    }

    #[test]
    fn test_full_board_leaves_state_untouched() {
        let mut state = playing_state(1);
        state.items = Items {
            matcha: Cell::new(7, 6),
            toilet: Cell::new(0, 14),
            bed: Cell::new(14, 14),
            man: Cell::new(14, 0),
        };
        state.snake = packed_snake(&state.items);
        let snake = state.snake.clone();

        assert!(matches!(
            advance_tick(&mut state),
            Err(TickError::Placement(PlacementError::GridFull { .. }))
        ));
        assert_eq!(state.snake, snake);
        assert_eq!(state.score, 0);
        assert_eq!(state.items.matcha, Cell::new(7, 6));
        assert_eq!(state.speed_ms, INITIAL_SPEED);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_toilet_may_land_on_vacated_tail() {
        let mut state = playing_state(1);
        state.items = Items {
            matcha: Cell::new(0, 14),
            toilet: Cell::new(7, 6),
            bed: Cell::new(14, 14),
            man: Cell::new(14, 0),
        };
        state.snake = packed_snake(&state.items);
        let tail = state.snake.tail();

        assert_eq!(
            advance_tick(&mut state).unwrap(),
            TickOutcome::Moved(Some(ItemKind::Toilet))
        );
        assert_eq!(state.items.toilet, tail);
        assert_all_distinct(&state);
    }

    #[test]
    fn test_bed_freezes_until_woken() {
        let mut state = playing_state(1);
        state.items.bed = Cell::new(7, 6);

        advance_tick(&mut state).unwrap();
        assert!(state.frozen);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.drain_events(), vec![GameEvent::FellAsleep]);

        let snake = state.snake.clone();
        assert_eq!(advance_tick(&mut state).unwrap(), TickOutcome::Frozen);
        assert_eq!(state.snake, snake);

        state.items.bed = Cell::new(1, 1);
        state.wake_up();
        assert_eq!(advance_tick(&mut state).unwrap(), TickOutcome::Moved(None));
        assert_eq!(state.snake.head(), Cell::new(7, 5));
    }

    #[test]
    fn test_last_matcha_wins_once() {
        let mut state = playing_state(1);
        state.score = HEART_GOAL - 1;
        state.items.matcha = Cell::new(7, 6);
        let before = state.snake.clone();
        let speed = state.speed_ms;

        let outcome = advance_tick(&mut state).unwrap();
        assert_eq!(outcome, TickOutcome::Ended(GameStatus::Won));
        assert_eq!(state.status, GameStatus::Won);
        assert_eq!(state.score, HEART_GOAL);
        assert_eq!(state.snake, before);
        assert_eq!(state.speed_ms, speed);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::MatchaCollected, GameEvent::Won, GameEvent::MusicStopped]
        );

        assert_eq!(
            advance_tick(&mut state),
            Err(TickError::NotPlaying(GameStatus::Won))
        );
        assert_eq!(state.score, HEART_GOAL);
    }

    #[test]
    fn test_tick_before_start_rejected() {
        let mut state = GameState::new(3);
        assert_eq!(
            advance_tick(&mut state),
            Err(TickError::NotPlaying(GameStatus::Start))
        );
    }

    #[test]
    fn test_speed_floor() {
        let mut state = playing_state(1);
        state.speed_ms = MIN_SPEED + 1;
        state.items.matcha = Cell::new(7, 6);
        advance_tick(&mut state).unwrap();
        assert_eq!(state.speed_ms, MIN_SPEED);
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let mut state = GameState::new(seed);
            start(&mut state).unwrap();
            let turns = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];
            for i in 0..40 {
                state.request_direction(turns[(i / 3) % 4]);
                if advance_tick(&mut state).is_err() {
                    break;
                }
            }
            (state.snake.to_vec(), state.items, state.score, state.status)
        };
        assert_eq!(run(99999), run(99999));
    }

    proptest! {
        #[test]
        fn prop_tick_invariants(
            seed in any::<u64>(),
            turns in prop::collection::vec(0usize..4, 1..200),
        ) {
            let mut state = GameState::new(seed);
            start(&mut state).unwrap();
            let mut last_speed = state.speed_ms;

            for turn in turns {
                if state.status != GameStatus::Playing {
                    prop_assert!(advance_tick(&mut state).is_err());
                    break;
                }
                state.request_direction(Direction::ALL[turn]);
                state.wake_up();
                let len_before = state.snake.len();
                let outcome = advance_tick(&mut state).unwrap();
                let len_after = state.snake.len();

                if outcome == TickOutcome::Moved(Some(ItemKind::Matcha)) {
                    prop_assert_eq!(len_after, len_before + 1);
                } else {
                    prop_assert_eq!(len_after, len_before);
                }
                if state.status == GameStatus::Playing {
                    prop_assert!(state.score < HEART_GOAL);
                    assert_all_distinct(&state);
                }
                prop_assert!(state.speed_ms <= last_speed);
                prop_assert!(state.speed_ms >= MIN_SPEED);
                last_speed = state.speed_ms;
            }
        }

        #[test]
        fn prop_reverse_request_never_commits(seed in any::<u64>(), dir in 0usize..4) {
            let mut state = GameState::new(seed);
            start(&mut state).unwrap();
            state.direction = Direction::ALL[dir];
            let reverse = state.direction.opposite();
            prop_assert!(!state.request_direction(reverse));
            prop_assert_eq!(state.pending_direction, None);
            prop_assert_eq!(state.direction, Direction::ALL[dir]);
        }
    }
}
