//! Audio collaborator
//!
//! The simulation emits fire-and-forget [`Signal`]s. [`AudioManager`] turns
//! each one into procedural tone descriptions (no sample files) and hands
//! them to a [`ToneOutput`] backend. The native build ships [`LogOutput`],
//! which only logs what it would play.

use std::time::Duration;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound signal types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Matcha collected
    Pop,
    /// Stepped on the toilet
    Toilet,
    /// Wall, self or man
    Crash,
    /// Win fanfare
    Win,
    /// Background loop on
    BgmStart,
    /// Background loop off
    BgmStop,
}

impl Signal {
    /// Signal for a game event, if it makes a sound
    pub fn from_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::MatchaCollected => Some(Signal::Pop),
            GameEvent::ToiletHit => Some(Signal::Toilet),
            GameEvent::Crashed => Some(Signal::Crash),
            GameEvent::Won => Some(Signal::Win),
            GameEvent::MusicStarted => Some(Signal::BgmStart),
            GameEvent::MusicStopped => Some(Signal::BgmStop),
            GameEvent::FellAsleep => None,
        }
    }
}

/// Receiver of audio signals
pub trait SignalSink {
    /// Must return quickly; called from inside the frame loop
    fn emit(&mut self, signal: Signal);

    /// Play one note of the background loop. Returns the delay before the
    /// next note, or `None` when the loop should not continue.
    fn melody_note(&mut self, _index: usize) -> Option<Duration> {
        None
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// How a parameter moves from its start to its end value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// One synthesized note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Seconds after the signal
    pub offset: f32,
    pub duration: f32,
    pub waveform: Waveform,
    pub freq_start: f32,
    pub freq_end: f32,
    pub gain_start: f32,
    pub gain_end: f32,
    pub ramp: Ramp,
}

/// Backend that actually makes noise
pub trait ToneOutput {
    fn play_tone(&mut self, tone: &Tone);
}

/// Backend that logs tones instead of playing them
#[derive(Debug, Default)]
pub struct LogOutput;

impl ToneOutput for LogOutput {
    fn play_tone(&mut self, tone: &Tone) {
        log::debug!(
            "tone {:?} {:.0}->{:.0}Hz for {:.2}s at +{:.2}s (gain {:.3})",
            tone.waveform,
            tone.freq_start,
            tone.freq_end,
            tone.duration,
            tone.offset,
            tone.gain_start
        );
    }
}

/// Background loop: G4 A4 F4 C5
pub const MELODY: [f32; 4] = [392.00, 440.00, 349.23, 523.25];
/// Length of each background note (seconds)
pub const MELODY_NOTE_SECS: f32 = 0.5;

/// Win arpeggio: C5 E5 G5 C6
const FANFARE: [f32; 4] = [523.25, 659.25, 783.99, 1046.50];

/// Audio manager for the game
pub struct AudioManager {
    output: Box<dyn ToneOutput>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_enabled: bool,
    music_playing: bool,
}

impl AudioManager {
    pub fn new(output: Box<dyn ToneOutput>) -> Self {
        Self {
            output,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music_enabled: true,
            music_playing: false,
        }
    }

    pub fn from_settings(settings: &Settings, output: Box<dyn ToneOutput>) -> Self {
        let mut audio = Self::new(output);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.music_volume = settings.music_volume.clamp(0.0, 1.0);
        audio.muted = settings.muted;
        audio.music_enabled = settings.background_music;
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    fn play_scaled(&mut self, tones: &[Tone], vol: f32) {
        if vol <= 0.0 {
            return;
        }
        for tone in tones {
            let scaled = Tone {
                gain_start: tone.gain_start * vol,
                gain_end: tone.gain_end * vol,
                ..*tone
            };
            self.output.play_tone(&scaled);
        }
    }

    /// Unscaled tones for a one-shot signal
    pub fn tones_for(signal: Signal) -> Vec<Tone> {
        match signal {
            Signal::Pop => vec![Tone {
                offset: 0.0,
                duration: 0.1,
                waveform: Waveform::Sine,
                freq_start: 600.0,
                freq_end: 300.0,
                gain_start: 0.1,
                gain_end: 0.01,
                ramp: Ramp::Exponential,
            }],
            Signal::Toilet => vec![Tone {
                offset: 0.0,
                duration: 0.4,
                waveform: Waveform::Triangle,
                freq_start: 200.0,
                freq_end: 50.0,
                gain_start: 0.1,
                gain_end: 0.0,
                ramp: Ramp::Linear,
            }],
            Signal::Crash => vec![Tone {
                offset: 0.0,
                duration: 0.3,
                waveform: Waveform::Sawtooth,
                freq_start: 100.0,
                freq_end: 20.0,
                gain_start: 0.05,
                gain_end: 0.0,
                ramp: Ramp::Linear,
            }],
            Signal::Win => FANFARE
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone {
                    offset: i as f32 * 0.1,
                    duration: 0.5,
                    waveform: Waveform::Sine,
                    freq_start: freq,
                    freq_end: freq,
                    gain_start: 0.05,
                    gain_end: 0.01,
                    ramp: Ramp::Exponential,
                })
                .collect(),
            Signal::BgmStart | Signal::BgmStop => Vec::new(),
        }
    }

    /// Tone for one background note
    pub fn melody_tone(index: usize) -> Tone {
        let freq = MELODY[index % MELODY.len()];
        Tone {
            offset: 0.0,
            duration: MELODY_NOTE_SECS,
            waveform: Waveform::Sine,
            freq_start: freq,
            freq_end: freq,
            gain_start: 0.02,
            gain_end: 0.001,
            ramp: Ramp::Exponential,
        }
    }
}

impl SignalSink for AudioManager {
    fn emit(&mut self, signal: Signal) {
        match signal {
            Signal::BgmStart => {
                self.music_playing = self.music_enabled;
                log::debug!(
                    "Background loop {}",
                    if self.music_playing { "on" } else { "disabled" }
                );
            }
            Signal::BgmStop => {
                if self.music_playing {
                    log::debug!("Background loop off");
                }
                self.music_playing = false;
            }
            _ => {
                let vol = self.effective_volume(self.sfx_volume);
                self.play_scaled(&Self::tones_for(signal), vol);
            }
        }
    }

    fn melody_note(&mut self, index: usize) -> Option<Duration> {
        if !self.music_playing {
            return None;
        }
        let vol = self.effective_volume(self.music_volume);
        self.play_scaled(&[Self::melody_tone(index)], vol);
        Some(Duration::from_secs_f32(MELODY_NOTE_SECS))
    }
}
