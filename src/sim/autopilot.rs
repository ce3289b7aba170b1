//! Idle/demo mode: a greedy policy that plays the game on its own
//!
//! Each tick it looks at the three headings that are not a reversal, throws
//! out the ones that lose or walk into the man's pull, and takes the one
//! closest to the matcha. The toilet is only stepped on when nothing else is
//! safe.

use super::state::{Direction, GameState, GameStatus};
use super::steering::is_attracted;
use crate::{Cell, in_bounds};

/// Extra cost for a move onto the toilet
const TOILET_COST: i32 = 100;
/// Extra cost per blocked neighbour of the target cell
const CRAMPED_COST: i32 = 2;

/// Heading the demo player wants next, `None` if every move is lethal
pub fn choose_direction(state: &GameState) -> Option<Direction> {
    if state.status != GameStatus::Playing {
        return None;
    }

    let head = state.snake.head();
    Direction::ALL
        .into_iter()
        .filter(|d| !d.is_opposite(state.direction))
        .filter_map(|d| move_cost(state, head + d.delta()).map(|cost| (cost, d)))
        .min_by_key(|(cost, _)| *cost)
        .map(|(_, d)| d)
}

fn move_cost(state: &GameState, cell: Cell) -> Option<i32> {
    let man = state.items.man;
    if !in_bounds(cell) || state.snake.hits_body(cell) || cell == man || is_attracted(cell, man) {
        return None;
    }

    let target = state.items.matcha;
    let mut cost = (target - cell).abs().element_sum();
    if cell == state.items.toilet {
        cost += TOILET_COST;
    }
    let blocked = Direction::ALL
        .into_iter()
        .map(|d| cell + d.delta())
        .filter(|n| !in_bounds(*n) || state.snake.contains(*n))
        .count() as i32;
    Some(cost + blocked * CRAMPED_COST)
}
