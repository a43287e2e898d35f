//! Audio glue using the Web Audio API
//!
//! Procedurally generated blips - no asset files. Deliberately thin: the
//! simulation raises events, the shell maps them to effects here.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types, mapped from game events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bullet leaves the barrel
    Fire,
    /// Asteroid shattered
    Explosion,
    /// Ship lost a life
    ShipHit,
    /// Field cleared
    LevelUp,
    /// Run ended
    GameOver,
}

/// Audio manager for the game
pub struct AudioEngine {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    muted: bool,
    /// Music pulse alternator
    beat: u32,
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("failed to create AudioContext - audio disabled");
        }
        Self { ctx, muted: false, beat: 0 }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self { muted: false, beat: 0 }
    }

    /// Resume the context (browsers require a user gesture first)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Play one effect now
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Fire => self.sweep(ctx, OscillatorType::Square, 1200.0, 100.0, 0.15, 0.3),
            SoundEffect::Explosion => {
                self.sweep(ctx, OscillatorType::Sawtooth, 220.0, 30.0, 0.35, 0.5)
            }
            SoundEffect::ShipHit => self.sweep(ctx, OscillatorType::Sawtooth, 110.0, 20.0, 0.5, 0.6),
            SoundEffect::LevelUp => self.sweep(ctx, OscillatorType::Triangle, 330.0, 880.0, 0.3, 0.4),
            SoundEffect::GameOver => self.sweep(ctx, OscillatorType::Square, 440.0, 55.0, 0.9, 0.4),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, _effect: SoundEffect) {}

    /// Low two-note background pulse; the shell calls this on a fixed tick
    /// cadence while a round is playing
    #[cfg(target_arch = "wasm32")]
    pub fn music_pulse(&mut self) {
        if self.muted {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.beat = self.beat.wrapping_add(1);
        let freq = if self.beat % 2 == 0 { 55.0 } else { 73.4 };
        self.sweep(ctx, OscillatorType::Sine, freq, freq, 0.25, 0.25);
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn music_pulse(&mut self) {
        self.beat = self.beat.wrapping_add(1);
    }

    /// One oscillator with an exponential pitch sweep and decay envelope
    #[cfg(target_arch = "wasm32")]
    fn sweep(
        &self,
        ctx: &AudioContext,
        osc_type: OscillatorType,
        from_hz: f32,
        to_hz: f32,
        duration: f32,
        volume: f32,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from_hz, osc_type) else {
            return;
        };
        let t = ctx.current_time();
        let end = t + duration as f64;

        let _ = gain.gain().set_value_at_time(volume, t);
        let _ = gain.gain().exponential_ramp_to_value_at_time(0.01, end);
        let _ = osc.frequency().set_value_at_time(from_hz, t);
        let _ = osc.frequency().exponential_ramp_to_value_at_time(to_hz.max(1.0), end);

        let _ = osc.start();
        let _ = osc.stop_with_when(end);
    }

    /// Oscillator wired through a gain node to the destination
    #[cfg(target_arch = "wasm32")]
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
}
