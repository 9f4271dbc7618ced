//! Audio notification boundary
//!
//! The simulation never plays sound itself. It raises [`GameEvent`]s; a shell
//! forwards them to whatever implements [`AudioSink`] (Web Audio, a native
//! mixer, or the logging sink used by the headless runner).

use crate::sim::GameEvent;

/// Sound cues the game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Pickup collected
    PickupCollect,
    /// Player touched a hazard
    PlayerDefeated,
    /// Looping background music, started once per session
    BackgroundLoop,
}

impl SoundEffect {
    /// Cue for an event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PickupCollected { .. } => Some(SoundEffect::PickupCollect),
            GameEvent::PlayerDefeated { .. } => Some(SoundEffect::PlayerDefeated),
            GameEvent::BackgroundLoopStarted => Some(SoundEffect::BackgroundLoop),
            GameEvent::HazardSpawned { .. } | GameEvent::Restarted { .. } => None,
        }
    }
}

/// Fire-and-forget sound playback
pub trait AudioSink {
    fn on_pickup_collected(&mut self) {}
    fn on_player_defeated(&mut self) {}
    fn on_background_loop_start(&mut self) {}
}

/// Forward a tick's events to the audio collaborator
pub fn dispatch<S: AudioSink + ?Sized>(events: &[GameEvent], sink: &mut S) {
    for event in events {
        match SoundEffect::for_event(event) {
            Some(SoundEffect::PickupCollect) => sink.on_pickup_collected(),
            Some(SoundEffect::PlayerDefeated) => sink.on_player_defeated(),
            Some(SoundEffect::BackgroundLoop) => sink.on_background_loop_start(),
            None => {}
        }
    }
}

/// Sink that writes cues to the log instead of a speaker
#[derive(Debug, Default)]
pub struct LogAudio {
    muted: bool,
    played: usize,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of cues played so far
    pub fn played(&self) -> usize {
        self.played
    }

    fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        self.played += 1;
        log::debug!("audio: {:?}", effect);
    }
}

impl AudioSink for LogAudio {
    fn on_pickup_collected(&mut self) {
        self.play(SoundEffect::PickupCollect);
    }

    fn on_player_defeated(&mut self) {
        self.play(SoundEffect::PlayerDefeated);
    }

    fn on_background_loop_start(&mut self) {
        self.play(SoundEffect::BackgroundLoop);
    }
}
