//! Audio signals
//!
//! The session notifies an [`AudioSink`] of hits, combo milestones and misses.
//! Notifications are fire-and-forget. In the browser the sink is a small Web
//! Audio synth; procedurally generated, no external files needed.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Tile hit in a lane: that lane's note
    Note(usize),
    /// Every 10th combo
    ComboMilestone,
    /// Tile missed, round over
    Miss,
}

/// Receiver of game audio cues
pub trait AudioSink {
    fn on_note_hit(&mut self, lane: usize);
    fn on_combo_milestone(&mut self);
    fn on_tile_missed(&mut self);
}

/// Silent sink (headless runs, no audio device)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn on_note_hit(&mut self, _lane: usize) {}
    fn on_combo_milestone(&mut self) {}
    fn on_tile_missed(&mut self) {}
}

/// Sink that logs every cue at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn on_note_hit(&mut self, lane: usize) {
        log::debug!("audio: {:?}", SoundEffect::Note(lane));
    }

    fn on_combo_milestone(&mut self) {
        log::debug!("audio: {:?}", SoundEffect::ComboMilestone);
    }

    fn on_tile_missed(&mut self) {
        log::debug!("audio: {:?}", SoundEffect::Miss);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};
    use crate::lanes::LANES;
    use crate::settings::Settings;

    /// Web Audio synth
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        pub fn from_settings(settings: &Settings) -> Self {
            let mut audio = Self::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);
            audio
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Note(lane) => {
                    if let Some(lane) = LANES.get(lane) {
                        self.play_note(ctx, lane.note_hz, vol);
                    }
                }
                SoundEffect::ComboMilestone => self.play_success(ctx, vol),
                SoundEffect::Miss => self.play_fail(ctx, vol),
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

        /// Lane note - short eighth-note pluck
        fn play_note(&self, ctx: &AudioContext, freq: f32, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        /// Combo milestone - rising gong-like chime
        fn play_success(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [523.25, 659.25, 783.99, 1046.5].iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.7).ok();
                }
            }
        }

        /// Miss - short low tom
        fn play_fail(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 180.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.2)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }
    }

    impl AudioSink for AudioManager {
        fn on_note_hit(&mut self, lane: usize) {
            self.play(SoundEffect::Note(lane));
        }

        fn on_combo_milestone(&mut self) {
            self.play(SoundEffect::ComboMilestone);
        }

        fn on_tile_missed(&mut self) {
            self.play(SoundEffect::Miss);
        }
    }
}
