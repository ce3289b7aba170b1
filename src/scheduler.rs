//! Frame-driven fixed-timestep loop
//!
//! The host calls [`Scheduler::frame`] from its display refresh callback with
//! a monotonic clock reading. A tick runs only once more than the current
//! tick interval has passed since the previous one, so the simulation rate
//! is independent of the refresh rate and follows speed changes right away.
//!
//! The scheduler exclusively owns the [`GameState`], the signal sink and
//! every pending timer (bed freeze, background melody). Restarting or tearing
//! down cancels all timers first, so nothing from an old session can touch
//! the new one.

use std::time::Duration;

use crate::audio::{Signal, SignalSink};
use crate::consts::FREEZE_DURATION_MS;
use crate::sim::{
    self, Direction, GameEvent, GameState, GameStatus, LifecycleError, Snapshot, TickError,
    TickOutcome, TransitionError, advance_tick,
};
use crate::timer::{TimerId, Timers};

/// Payloads of scheduler timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// End of the bed freeze
    WakeUp,
    /// Next background note
    MelodyNote(usize),
}

pub struct Scheduler {
    state: GameState,
    sink: Box<dyn SignalSink>,
    timers: Timers<TimerKind>,
    freeze_timer: Option<TimerId>,
    melody_timer: Option<TimerId>,
    /// Clock reading of the last applied tick
    last_tick: Duration,
    /// Latest clock reading seen
    now: Duration,
}

impl Scheduler {
    pub fn new(seed: u64, sink: Box<dyn SignalSink>) -> Self {
        Self {
            state: GameState::new(seed),
            sink,
            timers: Timers::new(),
            freeze_timer: None,
            melody_timer: None,
            last_tick: Duration::ZERO,
            now: Duration::ZERO,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    /// The loop only advances the game while playing
    pub fn is_running(&self) -> bool {
        self.state.status == GameStatus::Playing
    }

    /// Input entry point, see [`GameState::request_direction`]
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        self.state.request_direction(direction)
    }

    /// Start or restart a game at clock reading `now`
    pub fn start(&mut self, now: Duration) -> Result<(), LifecycleError> {
        // A rejected start leaves the running session and its timers alone
        sim::start(&mut self.state)?;
        self.now = now;
        self.cancel_timers();
        self.last_tick = now;
        self.dispatch_events();
        Ok(())
    }

    /// Answer the win screen
    pub fn confirm_win(&mut self) -> Result<(), TransitionError> {
        sim::confirm_win(&mut self.state)?;
        self.dispatch_events();
        Ok(())
    }

    /// Leave the celebration for the title screen
    pub fn play_again(&mut self) -> Result<(), TransitionError> {
        sim::play_again(&mut self.state)?;
        self.cancel_timers();
        self.dispatch_events();
        Ok(())
    }

    /// Per-frame callback. Returns the tick outcome when a tick ran.
    pub fn frame(&mut self, now: Duration) -> Result<Option<TickOutcome>, TickError> {
        self.now = now;
        self.fire_timers();

        if !self.is_running() {
            return Ok(None);
        }
        if now.saturating_sub(self.last_tick) <= self.state.tick_interval() {
            return Ok(None);
        }

        self.last_tick = now;
        let outcome = advance_tick(&mut self.state)?;
        self.dispatch_events();
        Ok(Some(outcome))
    }

    /// Stop everything: pending timers are dropped and the music stops
    pub fn teardown(&mut self) {
        self.cancel_timers();
        self.sink.emit(Signal::BgmStop);
        log::debug!("Scheduler torn down");
    }

    fn cancel_timers(&mut self) {
        self.timers.cancel_all();
        self.freeze_timer = None;
        self.melody_timer = None;
    }

    fn fire_timers(&mut self) {
        for (id, kind) in self.timers.fire_due(self.now) {
            match kind {
                TimerKind::WakeUp => {
                    if self.freeze_timer == Some(id) {
                        self.freeze_timer = None;
                    }
                    self.state.wake_up();
                }
                TimerKind::MelodyNote(index) => {
                    self.melody_timer = None;
                    self.play_melody_note(index);
                }
            }
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(signal) = Signal::from_event(event) {
                self.sink.emit(signal);
            }
            match event {
                GameEvent::FellAsleep => self.arm_freeze(),
                GameEvent::MusicStarted => {
                    self.stop_melody();
                    self.play_melody_note(0);
                }
                GameEvent::MusicStopped => self.stop_melody(),
                _ => {}
            }
        }
    }

    fn arm_freeze(&mut self) {
        if let Some(id) = self.freeze_timer.take() {
            self.timers.cancel(id);
        }
        let delay = Duration::from_millis(FREEZE_DURATION_MS);
        self.freeze_timer = Some(self.timers.arm(self.now, delay, TimerKind::WakeUp));
    }

    fn play_melody_note(&mut self, index: usize) {
        let next = self.sink.melody_note(index);
        self.melody_timer =
            next.map(|delay| self.timers.arm(self.now, delay, TimerKind::MelodyNote(index + 1)));
    }

    fn stop_melody(&mut self) {
        if let Some(id) = self.melody_timer.take() {
            self.timers.cancel(id);
        }
    }
}
