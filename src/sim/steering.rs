//! Head movement and the man's pull
//!
//! Within [`ATTRACTION_RADIUS`] of the man the bear stops listening to the
//! player and walks toward him along the axis with the larger gap. The pull
//! replaces the committed heading, so it keeps working on the following ticks
//! until the bear is out of range.

use super::state::Direction;
use crate::consts::ATTRACTION_RADIUS;
use crate::{Cell, cell_distance};

/// Whether `head` is close enough to `threat` to be pulled in
#[inline]
pub fn is_attracted(head: Cell, threat: Cell) -> bool {
    cell_distance(head, threat) <= ATTRACTION_RADIUS
}

/// Candidate head cell for the next tick and the heading that produced it.
///
/// No bounds or collision checks happen here.
pub fn next_head(head: Cell, committed: Direction, threat: Cell) -> (Cell, Direction) {
    if !is_attracted(head, threat) {
        return (head + committed.delta(), committed);
    }

    let gap = threat - head;
    // Equal gaps resolve along y
    if gap.x.abs() > gap.y.abs() {
        let direction = if gap.x > 0 { Direction::Right } else { Direction::Left };
        (head + Cell::new(gap.x.signum(), 0), direction)
    } else {
        let direction = if gap.y > 0 { Direction::Down } else { Direction::Up };
        (head + Cell::new(0, gap.y.signum()), direction)
    }
}
