//! Audio and haptic cue collaborators
//!
//! Cues are fire-and-forget: implementations swallow their own failures so a
//! broken speaker can never block timer logic.

use fittrack_shared::UserSettings;
use std::sync::Mutex;

/// Sound clips the engine can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundClip {
    RestFinished,
}

/// Audio/haptic output collaborator
pub trait CuePlayer: Send + Sync {
    fn play_sound(&self, clip: SoundClip);
    fn vibrate(&self, pattern: &[u64]);
}

/// Fire the rest-completion cues, gated by the user's settings
pub fn fire_rest_cues(settings: &UserSettings, cues: &dyn CuePlayer, pattern: &[u64]) {
    if settings.sound_enabled {
        cues.play_sound(SoundClip::RestFinished);
    }
    if settings.vibration_enabled {
        cues.vibrate(pattern);
    }
}

/// No-op player for hosts without audio/haptic output
pub struct NullCuePlayer;

impl CuePlayer for NullCuePlayer {
    fn play_sound(&self, _clip: SoundClip) {}
    fn vibrate(&self, _pattern: &[u64]) {}
}

/// Records every cue, for assertions in tests and the demo binary
#[derive(Default)]
pub struct RecordingCuePlayer {
    sounds: Mutex<Vec<SoundClip>>,
    vibrations: Mutex<Vec<Vec<u64>>>,
}

impl RecordingCuePlayer {
    pub fn sounds(&self) -> Vec<SoundClip> {
        self.sounds.lock().unwrap().clone()
    }

    pub fn vibration_count(&self) -> usize {
        self.vibrations.lock().unwrap().len()
    }
}

impl CuePlayer for RecordingCuePlayer {
    fn play_sound(&self, clip: SoundClip) {
        self.sounds.lock().unwrap().push(clip);
    }

    fn vibrate(&self, pattern: &[u64]) {
        self.vibrations.lock().unwrap().push(pattern.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_respect_settings_flags() {
        let player = RecordingCuePlayer::default();
        let muted = UserSettings {
            sound_enabled: false,
            vibration_enabled: false,
            auto_brightness: false,
        };
        fire_rest_cues(&muted, &player, &[0, 300]);
        assert!(player.sounds().is_empty());
        assert_eq!(player.vibration_count(), 0);

        fire_rest_cues(&UserSettings::default(), &player, &[0, 300]);
        assert_eq!(player.sounds(), vec![SoundClip::RestFinished]);
        assert_eq!(player.vibration_count(), 1);
    }
}
