//! `rodio`-backed audio engine.
//!
//! Each track gets a fresh `Sink` on the shared output stream; decoding runs on
//! rodio's mixer thread so none of the calls here block the frame loop.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::engine::{AudioEngine, AudioError, StartOffset};

pub struct RodioEngine {
    stream: Option<OutputStream>,
    loaded: Option<(PathBuf, Decoder<BufReader<File>>)>,
    sink: Option<Sink>,
}

impl RodioEngine {
    /// Open the default output device. Without one, every `load` fails and the
    /// controller treats tracks as unplayable.
    pub fn open_default() -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when the stream is dropped, which would land on
                // the display's terminal.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!("no audio output device: {e}");
                None
            }
        };

        Self {
            stream,
            loaded: None,
            sink: None,
        }
    }
}

/// Open and decode `path` without attaching it to an output yet.
fn open_source(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<(), AudioError> {
        if self.stream.is_none() {
            return Err(AudioError::NoOutputDevice);
        }
        self.stop();
        let source = open_source(path)?;
        self.loaded = Some((path.to_path_buf(), source));
        Ok(())
    }

    fn play(&mut self, start: Duration) -> Result<StartOffset, AudioError> {
        let stream = self.stream.as_ref().ok_or(AudioError::NoOutputDevice)?;
        let (path, source) = self.loaded.take().ok_or(AudioError::NothingLoaded)?;

        let sink = Sink::connect_new(stream.mixer());
        sink.append(source);
        sink.play();

        let mut offset = StartOffset::Requested;
        if !start.is_zero() {
            if let Err(e) = sink.try_seek(start) {
                warn!(path = %path.display(), ?start, "seek unsupported, starting from the top: {e}");
                offset = StartOffset::Beginning;
            }
        }

        debug!(path = %path.display(), ?start, ?offset, "playing");
        self.sink = Some(sink);
        Ok(offset)
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
    }

    fn unpause(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }

    fn position(&self) -> Option<Duration> {
        self.sink.as_ref().map(Sink::get_pos)
    }
}
