//! Audio system
//!
//! Sound effects are procedurally generated with Web Audio oscillators, no
//! files needed. Background music streams from an `<audio>` element; starting
//! it is asynchronous and may be rejected by the browser's autoplay policy, so
//! each start attempt is tracked by a `MusicRequest`.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Air jump
    DoubleJump,
    /// Bug eaten
    BugEaten,
    /// Hit an obstacle
    Crash,
    /// Run ended with a new high score
    HighScore,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::DoubleJumped => Some(SoundEffect::DoubleJump),
            GameEvent::BugEaten { .. } => Some(SoundEffect::BugEaten),
            GameEvent::Crashed => Some(SoundEffect::Crash),
            GameEvent::GameOver(outcome) if outcome.new_high => Some(SoundEffect::HighScore),
            _ => None,
        }
    }
}

/// Background music lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Idle,
    /// `play()` issued, promise not settled yet
    Pending,
    Playing,
    /// Last attempt was rejected; retried on the next user input
    Failed,
}

/// What happened to an async start result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicResolution {
    Applied,
    /// The request was superseded (stopped or restarted) before it settled
    Stale,
}

/// Music start request with a generation counter so late promise
/// resolutions from superseded attempts are ignored.
#[derive(Debug, Clone, Default)]
pub struct MusicRequest {
    state: MusicState,
    generation: u32,
}

impl MusicRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MusicState {
        self.state
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Start an attempt from `Idle` or `Failed`. Returns the generation token
    /// to hand back to `resolve`, or `None` when already pending/playing.
    pub fn begin(&mut self) -> Option<u32> {
        match self.state {
            MusicState::Idle | MusicState::Failed => {
                self.generation = self.generation.wrapping_add(1);
                self.state = MusicState::Pending;
                Some(self.generation)
            }
            MusicState::Pending | MusicState::Playing => None,
        }
    }

    /// Settle the attempt identified by `generation`
    pub fn resolve(&mut self, generation: u32, started: bool) -> MusicResolution {
        if generation != self.generation || self.state != MusicState::Pending {
            return MusicResolution::Stale;
        }
        self.state = if started {
            MusicState::Playing
        } else {
            MusicState::Failed
        };
        MusicResolution::Applied
    }

    /// Cancel any attempt and go idle. Returns true if music may be audible
    /// (so the element needs pausing).
    pub fn stop(&mut self) -> bool {
        match self.state {
            MusicState::Idle => false,
            MusicState::Failed => {
                self.state = MusicState::Idle;
                false
            }
            MusicState::Pending | MusicState::Playing => {
                self.generation = self.generation.wrapping_add(1);
                self.state = MusicState::Idle;
                true
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        self.state == MusicState::Failed
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

    use super::{MusicRequest, MusicResolution, SoundEffect};
    use crate::Settings;
    use crate::sim::{GameEvent, GamePhase};

    /// Looping background track
    const MUSIC_SRC: &str = "assets/music.mp3";

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        music: Option<HtmlAudioElement>,
        music_request: Rc<RefCell<MusicRequest>>,
        sfx_gain: f32,
        music_gain: f32,
        mute_on_blur: bool,
        hidden: bool,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - sound effects disabled");
            }

            let music = match HtmlAudioElement::new_with_src(MUSIC_SRC) {
                Ok(el) => {
                    el.set_loop(true);
                    el.set_volume(settings.music_gain() as f64);
                    Some(el)
                }
                Err(e) => {
                    log::warn!("Failed to create music element: {:?}", e);
                    None
                }
            };

            Self {
                ctx,
                music,
                music_request: Rc::new(RefCell::new(MusicRequest::new())),
                sfx_gain: settings.sfx_gain(),
                music_gain: settings.music_gain(),
                mute_on_blur: settings.mute_on_blur,
                hidden: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn unlock(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Page visibility changed
        pub fn set_hidden(&mut self, hidden: bool) {
            self.hidden = hidden && self.mute_on_blur;
            if let Some(music) = &self.music {
                music.set_muted(self.hidden);
            }
        }

        fn effective_volume(&self) -> f32 {
            if self.hidden { 0.0 } else { self.sfx_gain }
        }

        /// React to a simulation event
        pub fn handle_event(&self, event: &GameEvent) {
            if matches!(event, GameEvent::MusicRequested) {
                self.unlock();
            }
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect);
            }
        }

        /// Keep music in step with the phase: on while playing, off otherwise.
        /// A rejected start is not retried here.
        pub fn sync_music(&self, phase: GamePhase) {
            if phase == GamePhase::Playing {
                if self.music_request.borrow().state() == super::MusicState::Idle {
                    self.start_music();
                }
            } else {
                self.stop_music();
            }
        }

        /// A user gesture arrived: retry a rejected start
        pub fn on_user_input(&self, phase: GamePhase) {
            self.unlock();
            if phase == GamePhase::Playing && self.music_request.borrow().is_failed() {
                log::debug!("Retrying music start");
                self.start_music();
            }
        }

        fn start_music(&self) {
            let Some(music) = self.music.clone() else {
                return;
            };
            if self.music_gain <= 0.0 {
                return;
            }
            let Some(generation) = self.music_request.borrow_mut().begin() else {
                return;
            };

            music.set_current_time(0.0);
            let promise = match music.play() {
                Ok(promise) => promise,
                Err(e) => {
                    log::warn!("Music play() threw: {:?}", e);
                    self.music_request.borrow_mut().resolve(generation, false);
                    return;
                }
            };

            let request = Rc::clone(&self.music_request);
            wasm_bindgen_futures::spawn_local(async move {
                let result = JsFuture::from(promise).await;
                if let Err(e) = &result {
                    log::warn!("Music start rejected: {:?}", e);
                }
                let started = result.is_ok();
                let resolution = request.borrow_mut().resolve(generation, started);
                if resolution == MusicResolution::Stale && started {
                    // Stopped while pending: silence the late start
                    let _ = music.pause();
                }
            });
        }

        fn stop_music(&self) {
            if self.music_request.borrow_mut().stop() {
                if let Some(music) = &self.music {
                    let _ = music.pause();
                }
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
                SoundEffect::Jump => self.play_jump(ctx, vol, 300.0, 700.0),
                SoundEffect::DoubleJump => self.play_jump(ctx, vol, 500.0, 1000.0),
                SoundEffect::BugEaten => self.play_peck(ctx, vol),
                SoundEffect::Crash => self.play_crash(ctx, vol),
                SoundEffect::HighScore => self.play_high_score(ctx, vol),
            }
        }

        // === Sound generators ===

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

        /// Jump - quick upward chirp
        fn play_jump(&self, ctx: &AudioContext, vol: f32, from: f32, to: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, from, OscillatorType::Square) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(from, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, t + 0.12)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.18).ok();
        }

        /// Bug eaten - two short pecks
        fn play_peck(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [900.0, 1200.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.05)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.07).ok();
                }
            }
        }

        /// Crash - thump then sad descending notes
        fn play_crash(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.frequency().set_value_at_time(120.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(40.0, t + 0.2)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.25).ok();
            }

            for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                let delay = 0.15 + i as f64 * 0.2;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = t + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.4).ok();
                }
            }
        }

        /// High score - celebratory
        fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
                let delay = 1.0 + i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }
    }
}
