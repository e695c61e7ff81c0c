//! Local MP3 playback for the synthesized story audio.
//!
//! Thin wrapper over rodio: one output stream opened at startup, one sink
//! per play request. Playback is non-blocking — the sink plays in the
//! background and the UI polls [`AudioPlayer::is_playing`] to render the
//! button state.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

/// Plays the audio artifact through the default output device.
///
/// Construction fails when no output device is available; the app then
/// simply renders the results without a play button.
pub struct AudioPlayer {
    // Must stay alive for the lifetime of any sink.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    current: Option<Sink>,
}

impl AudioPlayer {
    /// Open the default output device.
    pub fn try_default() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no audio output device available")?;

        Ok(Self {
            _stream: stream,
            handle,
            current: None,
        })
    }

    /// Start playing the MP3 file at `path`, replacing any playback in
    /// progress.
    pub fn play_file(&mut self, path: &Path) -> Result<()> {
        self.stop();

        let file = File::open(path)
            .with_context(|| format!("failed to open audio file {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file)).context("failed to decode audio file")?;

        let sink = Sink::try_new(&self.handle).context("failed to create audio sink")?;
        sink.append(source);
        self.current = Some(sink);

        log::info!("playing {}", path.display());
        Ok(())
    }

    /// Stop any playback in progress.
    pub fn stop(&mut self) {
        if let Some(sink) = self.current.take() {
            sink.stop();
        }
    }

    /// `true` while a clip is still playing.
    pub fn is_playing(&self) -> bool {
        self.current.as_ref().is_some_and(|s| !s.empty())
    }
}
