//! Bell collaborator.
//!
//! Playback is best effort: [`Chime`] honours the user's sound preference
//! and swallows every failure after logging it, so the timer never sees an
//! audio error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AudioError;

/// Something that can sound the round bell.
pub trait Bell: Send + Sync {
    fn ring(&self) -> Result<(), AudioError>;
}

/// Logs each ring instead of producing sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogBell;

impl Bell for LogBell {
    fn ring(&self) -> Result<(), AudioError> {
        tracing::info!("bell");
        Ok(())
    }
}

/// Never makes a sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentBell;

impl Bell for SilentBell {
    fn ring(&self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// A bell gated by the user's sound preference.
pub struct Chime {
    bell: Arc<dyn Bell>,
    sound_enabled: AtomicBool,
}

impl Chime {
    pub fn new(bell: Arc<dyn Bell>, sound_enabled: bool) -> Self {
        Self {
            bell,
            sound_enabled: AtomicBool::new(sound_enabled),
        }
    }

    pub fn set_sound_enabled(&self, enabled: bool) {
        self.sound_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled.load(Ordering::Relaxed)
    }

    /// Fire and forget.
    pub fn play(&self) {
        if !self.sound_enabled() {
            return;
        }
        if let Err(e) = self.bell.ring() {
            tracing::warn!(error = %e, "bell playback failed");
        }
    }
}

impl std::fmt::Debug for Chime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chime")
            .field("sound_enabled", &self.sound_enabled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    struct CountingBell {
        rings: AtomicU32,
        fail: bool,
    }

    impl Bell for CountingBell {
        fn ring(&self) -> Result<(), AudioError> {
            self.rings.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AudioError::Playback("speaker unplugged".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn disabled_sound_is_a_noop() {
        let bell = Arc::new(CountingBell { rings: AtomicU32::new(0), fail: false });
        let chime = Chime::new(bell.clone(), false);
        chime.play();
        assert_eq!(bell.rings.load(Ordering::SeqCst), 0);

        chime.set_sound_enabled(true);
        chime.play();
        assert_eq!(bell.rings.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_swallowed() {
        let bell = Arc::new(CountingBell { rings: AtomicU32::new(0), fail: true });
        let chime = Chime::new(bell.clone(), true);
        chime.play();
        chime.play();
        assert_eq!(bell.rings.load(Ordering::SeqCst), 2);
    }
}
