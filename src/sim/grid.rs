//! Board geometry and random placement
//!
//! Placement draws uniformly over the board and rejects occupied cells. The
//! number of draws is capped; past the cap a row-major scan takes the first
//! free cell so a crowded board still resolves, and a full board is reported
//! instead of spinning forever.

use rand::Rng;
use thiserror::Error;

use crate::Cell;
use crate::consts::{GRID_SIZE, MAX_PLACEMENT_ATTEMPTS};

/// Placement failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// Every cell of the board is excluded
    #[error("no free cell left on the {size}x{size} board")]
    GridFull { size: i32 },
}

/// Iterate every board cell in row-major order
pub fn all_cells() -> impl Iterator<Item = Cell> {
    (0..GRID_SIZE).flat_map(|y| (0..GRID_SIZE).map(move |x| Cell::new(x, y)))
}

/// Pick a random cell that is not in `exclude`
pub fn random_unoccupied_cell<R: Rng + ?Sized>(
    rng: &mut R,
    exclude: &[Cell],
) -> Result<Cell, PlacementError> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let cell = Cell::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
        if !exclude.contains(&cell) {
            return Ok(cell);
        }
    }

    log::debug!(
        "Placement gave up sampling after {} draws ({} cells excluded), scanning",
        MAX_PLACEMENT_ATTEMPTS,
        exclude.len()
    );
    all_cells()
        .find(|cell| !exclude.contains(cell))
        .ok_or(PlacementError::GridFull { size: GRID_SIZE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::in_bounds;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_all_cells_covers_board() {
        let cells: Vec<Cell> = all_cells().collect();
        assert_eq!(cells.len(), (GRID_SIZE * GRID_SIZE) as usize);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[1], Cell::new(1, 0));
        assert!(cells.iter().all(|c| in_bounds(*c)));
    }

    #[test]
    fn test_placement_avoids_excluded() {
        let mut rng = Pcg32::seed_from_u64(7);
        let exclude = vec![Cell::new(7, 7), Cell::new(7, 8), Cell::new(7, 9)];
        for _ in 0..500 {
            let cell = random_unoccupied_cell(&mut rng, &exclude).unwrap();
            assert!(in_bounds(cell));
            assert!(!exclude.contains(&cell));
        }
    }

    #[test]
    fn test_placement_finds_last_free_cell() {
        let mut rng = Pcg32::seed_from_u64(1);
        let hole = Cell::new(13, 4);
        let exclude: Vec<Cell> = all_cells().filter(|c| *c != hole).collect();
        assert_eq!(random_unoccupied_cell(&mut rng, &exclude), Ok(hole));
    }

    #[test]
    fn test_placement_full_grid_is_error() {
        let mut rng = Pcg32::seed_from_u64(1);
        let exclude: Vec<Cell> = all_cells().collect();
        assert_eq!(
            random_unoccupied_cell(&mut rng, &exclude),
            Err(PlacementError::GridFull { size: GRID_SIZE })
        );
    }

    #[test]
    fn test_placement_is_deterministic_per_seed() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..20 {
            assert_eq!(
                random_unoccupied_cell(&mut a, &[]),
                random_unoccupied_cell(&mut b, &[])
            );
        }
    }
}
