//! Audio cues. Games decide *when* a cue fires; sinks decide how it sounds.

use std::io::{stdout, Write};
use tracing::{debug, warn};

use crate::core::config::SoundConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Click,
    Win,
    Lose,
}

impl Cue {
    pub fn file_name(self) -> &'static str {
        match self {
            Cue::Click => "click.wav",
            Cue::Win => "win.wav",
            Cue::Lose => "lose.wav",
        }
    }
}

pub trait AudioSink {
    /// Fire-and-forget; playback problems are logged, never returned.
    fn play(&mut self, cue: Cue);
}

impl AudioSink for Box<dyn AudioSink> {
    fn play(&mut self, cue: Cue) {
        (**self).play(cue)
    }
}

/// Drops every cue.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, cue: Cue) {
        debug!("Muted cue: {:?}", cue);
    }
}

/// Rings the terminal bell for every cue.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioSink for TerminalBell {
    fn play(&mut self, cue: Cue) {
        let mut out = stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            warn!("Failed to ring bell for {:?}: {}", cue, e);
        }
    }
}

/// Keeps every cue it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    cues: Vec<Cue>,
}

impl RecordingSink {
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }
}

#[cfg(feature = "sound")]
pub use rodio_sink::RodioSink;

#[cfg(feature = "sound")]
mod rodio_sink {
    use super::{AudioSink, Cue};
    use anyhow::Result;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::PathBuf;
    use tracing::{debug, warn};

    /// Plays `click.wav`, `win.wav` and `lose.wav` from a sounds directory
    pub struct RodioSink {
        _stream: OutputStream,
        stream_handle: OutputStreamHandle,
        dir: PathBuf,
        volume: f32,
    }

    impl RodioSink {
        pub fn new(dir: PathBuf, volume: f32) -> Result<Self> {
            let (stream, stream_handle) = OutputStream::try_default()?;
            Ok(Self {
                _stream: stream,
                stream_handle,
                dir,
                volume: volume.clamp(0.0, 1.0),
            })
        }

        fn try_play(&self, cue: Cue) -> Result<()> {
            let path = self.dir.join(cue.file_name());
            let file = File::open(&path)?;
            let source = Decoder::new(BufReader::new(file))?;

            let sink = Sink::try_new(&self.stream_handle)?;
            sink.set_volume(self.volume);
            sink.append(source);
            sink.detach();

            debug!("Playing sound: {:?} at volume {}", path, self.volume);
            Ok(())
        }
    }

    impl AudioSink for RodioSink {
        fn play(&mut self, cue: Cue) {
            if let Err(e) = self.try_play(cue) {
                warn!("Failed to play {:?} from {:?}: {}", cue, self.dir, e);
            }
        }
    }
}

/// Pick a sink from the sound settings. Falls back to quieter sinks when
/// the audio device is unavailable.
pub fn sink_from_config(config: &SoundConfig) -> Box<dyn AudioSink> {
    if !config.enabled {
        return Box::new(Silent);
    }

    #[cfg(feature = "sound")]
    {
        if !config.bell {
            match RodioSink::new(config.dir.clone(), config.volume) {
                Ok(sink) => return Box::new(sink),
                Err(e) => warn!("Audio output unavailable, falling back: {}", e),
            }
        }
    }

    if config.bell {
        Box::new(TerminalBell)
    } else {
        debug!("No audio backend selected, cues are muted");
        Box::new(Silent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        sink.play(Cue::Click);
        sink.play(Cue::Lose);
        assert_eq!(sink.cues(), &[Cue::Click, Cue::Lose]);
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut sink: Box<dyn AudioSink> = Box::new(Silent);
        sink.play(Cue::Win);
    }

    #[test]
    fn test_cue_files() {
        assert_eq!(Cue::Click.file_name(), "click.wav");
        assert_eq!(Cue::Win.file_name(), "win.wav");
        assert_eq!(Cue::Lose.file_name(), "lose.wav");
    }
}
