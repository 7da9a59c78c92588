//! Audio cues via the Web Audio API
//!
//! Procedurally synthesized - no sample files needed. Every cue is
//! fire-and-forget: a missing or suspended context drops the cue and
//! gameplay continues unaffected.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::consts::MELODY_LEN;

/// Cue identifiers the game can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Melody note for a successful hit, indexed into [`MELODY_HZ`]
    Note(usize),
    /// One countdown beat
    CountdownBeep,
    /// Run ended without a new best
    GameOver,
    /// Run ended with a new best score
    NewBestScore,
}

/// Cyclic hit melody (Hz): a pentatonic phrase that rises and falls, so a
/// clean run sounds like a tune.
pub const MELODY_HZ: [f32; MELODY_LEN] = [
    329.63, 392.00, 440.00, 523.25, // E4 G4 A4 C5
    587.33, 659.25, 783.99, 880.00, // D5 E5 G5 A5
    1046.50, 880.00, 783.99, 659.25, // C6 A5 G5 E5
    587.33, 523.25, 440.00, 392.00, // D5 C5 A4 G4
];

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context; the game plays on silently
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            muted: false,
        }
    }

    /// Resume the audio context (required after a user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Mute/unmute all cues without touching game logic
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Play a cue. Never blocks; failures are dropped.
    pub fn play(&self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require a user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Note(tone) => self.play_note(ctx, vol, tone),
            Cue::CountdownBeep => self.play_countdown_beep(ctx, vol),
            Cue::GameOver => self.play_game_over(ctx, vol),
            Cue::NewBestScore => self.play_new_best(ctx, vol),
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Hit note - short triangle pluck from the melody table
    fn play_note(&self, ctx: &AudioContext, vol: f32, tone: usize) {
        let freq = MELODY_HZ[tone % MELODY_HZ.len()];
        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }

    /// Countdown beat - short square blip
    fn play_countdown_beep(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Game over - low descending sine
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 130.81, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.5)
            .ok();
        osc.frequency().set_value_at_time(130.81, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(65.41, t + 0.5)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.6).ok();
    }

    /// New best - rising C-major arpeggio
    fn play_new_best(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.50].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }
    }
}
