//! Status transitions outside of ticks: start, win confirmation, replay
//!
//! Legal moves between statuses:
//!
//! | from                         | to                              |
//! |------------------------------|---------------------------------|
//! | Start, LostWallOrSelf, LostThreat | Playing                    |
//! | Playing                      | LostWallOrSelf, LostThreat, Won |
//! | Won                          | Celebrating                     |
//! | Celebrating                  | Start                           |

use thiserror::Error;

use super::grid::{PlacementError, random_unoccupied_cell};
use super::state::{GameEvent, GameState, GameStatus, ItemKind};

/// A status change the table does not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot go from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: GameStatus,
    pub to: GameStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

impl GameStatus {
    pub fn can_transition_to(self, to: GameStatus) -> bool {
        use GameStatus::*;
        match to {
            Playing => self == Start || self.is_lost(),
            LostWallOrSelf | LostThreat | Won => self == Playing,
            Celebrating => self == Won,
            Start => self == Celebrating,
        }
    }
}

impl GameState {
    /// Move to `to` if the table allows it
    pub fn transition(&mut self, to: GameStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }
        log::debug!("Status {:?} -> {:?}", self.status, to);
        self.status = to;
        Ok(())
    }
}

/// Start (or restart) a game: fresh board, random items, music on
pub fn start(state: &mut GameState) -> Result<(), LifecycleError> {
    if !state.status.can_transition_to(GameStatus::Playing) {
        return Err(TransitionError {
            from: state.status,
            to: GameStatus::Playing,
        }
        .into());
    }

    state.reset_board();

    // Each item avoids the bear and the items placed before it
    let mut taken = state.snake.to_vec();
    for kind in ItemKind::ALL {
        let cell = random_unoccupied_cell(state.rng(), &taken)?;
        state.items.set(kind, cell);
        taken.push(cell);
    }

    state.transition(GameStatus::Playing)?;
    state.emit(GameEvent::MusicStarted);
    log::info!(
        "Game started (seed {}): matcha {:?}, toilet {:?}, bed {:?}, man {:?}",
        state.seed,
        state.items.matcha,
        state.items.toilet,
        state.items.bed,
        state.items.man
    );
    Ok(())
}

/// Player accepted the win screen
pub fn confirm_win(state: &mut GameState) -> Result<(), TransitionError> {
    state.transition(GameStatus::Celebrating)?;
    state.emit(GameEvent::Won);
    log::info!("Celebrating");
    Ok(())
}

/// Leave the celebration and go back to the title screen
pub fn play_again(state: &mut GameState) -> Result<(), TransitionError> {
    state.transition(GameStatus::Start)?;
    state.reset_board();
    log::info!("Back to the title screen");
    Ok(())
}
