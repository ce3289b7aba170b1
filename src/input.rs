//! Input mapping
//!
//! Key names follow the browser `KeyboardEvent.key` convention so any
//! front-end can forward them as-is. Capturing the events is the host's job.

use std::time::Duration;

use crate::scheduler::Scheduler;
use crate::sim::{Direction, GameStatus, LifecycleError};

/// Something the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Steer(Direction),
    /// The single button on whatever screen is showing
    Primary,
}

impl InputAction {
    pub fn from_key(key: &str) -> Option<Self> {
        let action = match key {
            "ArrowUp" | "w" | "W" => InputAction::Steer(Direction::Up),
            "ArrowDown" | "s" | "S" => InputAction::Steer(Direction::Down),
            "ArrowLeft" | "a" | "A" => InputAction::Steer(Direction::Left),
            "ArrowRight" | "d" | "D" => InputAction::Steer(Direction::Right),
            "Enter" | " " => InputAction::Primary,
            _ => return None,
        };
        Some(action)
    }
}

/// On-screen arrow pad for touch devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Up,
    Down,
    Left,
    Right,
}

impl From<TouchButton> for InputAction {
    fn from(button: TouchButton) -> Self {
        InputAction::Steer(match button {
            TouchButton::Up => Direction::Up,
            TouchButton::Down => Direction::Down,
            TouchButton::Left => Direction::Left,
            TouchButton::Right => Direction::Right,
        })
    }
}

/// Route an action to the scheduler.
///
/// `Primary` means "Start" on the title screen, "Restart" after a loss,
/// "Yes!" on the win screen and "Play again?" while celebrating; it does
/// nothing mid-game.
pub fn dispatch(
    scheduler: &mut Scheduler,
    action: InputAction,
    now: Duration,
) -> Result<(), LifecycleError> {
    match action {
        InputAction::Steer(direction) => {
            if !scheduler.request_direction(direction) {
                log::trace!("Ignored reversal to {:?}", direction);
            }
        }
        InputAction::Primary => match scheduler.state().status {
            GameStatus::Start | GameStatus::LostWallOrSelf | GameStatus::LostThreat => {
                scheduler.start(now)?
            }
            GameStatus::Won => scheduler.confirm_win()?,
            GameStatus::Celebrating => scheduler.play_again()?,
            GameStatus::Playing => {}
        },
    }
    Ok(())
}
