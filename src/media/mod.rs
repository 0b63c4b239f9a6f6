/// Media playback and image loading
///
/// This module handles:
/// - The two audio channels (background loop, foreground playlist track)
/// - Resilient remote image state and decoding (images.rs)

pub mod images;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::io::Cursor;
use thiserror::Error;

/// Resting volume of the background loop; muted while a playlist track plays
pub const BACKGROUND_VOLUME: f32 = 0.6;

#[derive(Debug, Error)]
pub enum AudioError {
    /// No output device could be opened; playback degrades to silence
    #[error("no audio output device available")]
    NoDevice,
    /// The fetched bytes are not playable audio
    #[error("could not decode audio: {0}")]
    Decode(String),
}

/// The two audio channels. Background is an always-looping ambient track;
/// foreground is the user-selected playlist track. Their only coupling is
/// the mute command the playlist controller issues.
pub struct AudioEngine {
    stream: Option<OutputStream>,
    background: Option<Sink>,
    foreground: Option<Sink>,
    background_muted: bool,
}

impl AudioEngine {
    /// Open the default output device. A machine with no audio output
    /// still gets a working show, just a silent one.
    pub fn new() -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => Some(stream),
            Err(e) => {
                eprintln!("⚠️  No audio output: {}. The show plays silently.", e);
                None
            }
        };

        AudioEngine {
            stream,
            background: None,
            foreground: None,
            background_muted: false,
        }
    }

    /// Start the looping background soundtrack at resting volume
    pub fn start_background(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
        let Some(stream) = &self.stream else {
            return Err(AudioError::NoDevice);
        };

        let source = Decoder::new(Cursor::new(bytes))
            .map_err(|e| AudioError::Decode(e.to_string()))?
            .repeat_infinite();

        if let Some(old) = self.background.take() {
            old.stop();
        }

        let sink = Sink::connect_new(stream.mixer());
        sink.append(source);
        sink.set_volume(if self.background_muted {
            0.0
        } else {
            BACKGROUND_VOLUME
        });
        sink.play();
        self.background = Some(sink);
        Ok(())
    }

    /// The one cross-channel command: a playing foreground track silences
    /// the background; stopping it restores the resting volume.
    pub fn set_background_muted(&mut self, muted: bool) {
        self.background_muted = muted;
        if let Some(sink) = &self.background {
            sink.set_volume(if muted { 0.0 } else { BACKGROUND_VOLUME });
        }
    }

    pub fn is_background_muted(&self) -> bool {
        self.background_muted
    }

    /// Start a foreground track. Replacing the sink implicitly stops
    /// whatever was playing; the foreground channel is exclusive.
    pub fn play_foreground(&mut self, bytes: Vec<u8>) -> Result<(), AudioError> {
        let Some(stream) = &self.stream else {
            return Err(AudioError::NoDevice);
        };

        let source = Decoder::new(Cursor::new(bytes))
            .map_err(|e| AudioError::Decode(e.to_string()))?;

        if let Some(old) = self.foreground.take() {
            old.stop();
        }

        let sink = Sink::connect_new(stream.mixer());
        sink.append(source);
        sink.play();
        self.foreground = Some(sink);
        Ok(())
    }

    pub fn stop_foreground(&mut self) {
        if let Some(sink) = self.foreground.take() {
            sink.stop();
        }
    }

    /// True once the current foreground track has drained. Polled on a
    /// timer to drive the playlist's auto-advance.
    pub fn foreground_finished(&self) -> bool {
        self.foreground
            .as_ref()
            .map(|sink| sink.empty())
            .unwrap_or(false)
    }

    pub fn has_foreground(&self) -> bool {
        self.foreground.is_some()
    }
}

impl std::fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioEngine")
            .field("device", &self.stream.is_some())
            .field("background", &self.background.is_some())
            .field("foreground", &self.foreground.is_some())
            .field("background_muted", &self.background_muted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These run with or without an audio device: every path must degrade,
    // never panic.

    #[test]
    fn test_engine_survives_missing_device() {
        let mut engine = AudioEngine::new();
        engine.set_background_muted(true);
        engine.set_background_muted(false);
        engine.stop_foreground();
        assert!(!engine.foreground_finished());
        assert!(!engine.has_foreground());
    }

    #[test]
    fn test_garbage_audio_is_an_error() {
        let mut engine = AudioEngine::new();
        // Either NoDevice (headless) or Decode (real device, junk bytes)
        assert!(engine.play_foreground(vec![1, 2, 3, 4]).is_err());
        assert!(engine.start_background(vec![9, 9, 9]).is_err());
    }

    #[test]
    fn test_mute_state_is_remembered() {
        let mut engine = AudioEngine::new();
        engine.set_background_muted(true);
        assert!(engine.is_background_muted());
        engine.set_background_muted(false);
        assert!(!engine.is_background_muted());
    }
}
