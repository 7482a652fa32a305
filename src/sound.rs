use std::time::Duration;

use rodio::{
    source::{SineWave, Source},
    OutputStream, OutputStreamHandle,
};

use crate::config::SoundConfig;

const POP_HZ: f32 = 660.0;
const POP_LENGTH: Duration = Duration::from_millis(70);
const POP_ATTACK: Duration = Duration::from_millis(4);

/// Fire-and-forget sound effects.
///
/// Implementations must return immediately and must not report failures: a missing or broken
/// audio device never affects painting.
pub trait SoundEffect {
    /// Acknowledges that a color was picked.
    fn play_selection(&mut self);
}

pub fn from_config(config: &SoundConfig) -> Box<dyn SoundEffect> {
    if config.enabled {
        Box::new(BubblePop::new(config.volume))
    } else {
        log::debug!("sound effects disabled");
        Box::new(Silent)
    }
}

pub struct Silent;

impl SoundEffect for Silent {
    fn play_selection(&mut self) {}
}

enum Output {
    // The stream has to stay alive for as long as sounds should play.
    Open(OutputStream, OutputStreamHandle),
    /// No device, or playback failed. Not retried.
    Unavailable,
}

/// A short synthesized tone played on the default audio device.
pub struct BubblePop {
    volume: f32,
    output: Output,
}

impl BubblePop {
    /// Opens the default audio device up front, away from pointer handling.
    pub fn new(volume: f32) -> Self {
        let output = match OutputStream::try_default() {
            Ok((stream, handle)) => Output::Open(stream, handle),
            Err(e) => {
                log::warn!("no audio output, color selection will be silent: {e}");
                Output::Unavailable
            }
        };
        Self { volume, output }
    }
}

impl SoundEffect for BubblePop {
    fn play_selection(&mut self) {
        let Output::Open(_, handle) = &self.output else {
            return;
        };

        let pop = SineWave::new(POP_HZ)
            .take_duration(POP_LENGTH)
            .fade_in(POP_ATTACK)
            .amplify(self.volume);
        if let Err(e) = handle.play_raw(pop) {
            log::warn!("failed to play selection sound, disabling sound effects: {e}");
            self.output = Output::Unavailable;
        }
    }
}
