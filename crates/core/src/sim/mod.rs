//! Deterministic in-memory media backend.
//!
//! Drives the unit tests and the replay tool. Seeks land immediately on the
//! play head but their completions are queued on the shared
//! [`SimulatedBackend`] until the caller drains them, which mirrors how a
//! browser reports `seeked` asynchronously.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    media::{MediaSource, PreviewSurface, SeekCompletion, SeekRequest},
    MultiViewError, Result,
};

type CompletionQueue = Arc<Mutex<VecDeque<SeekCompletion>>>;

/// Factory for simulated sources that share one completion queue.
#[derive(Debug, Default, Clone)]
pub struct SimulatedBackend {
    completions: CompletionQueue,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a paused, muted source of the given length.
    pub fn open(&self, name: impl Into<String>, duration: f64) -> SimulatedSource {
        SimulatedSource {
            name: name.into(),
            current_time: 0.0,
            duration,
            paused: true,
            volume: 0.0,
            capture_supported: true,
            reject_seeks: false,
            fail_seeks: false,
            reject_play: false,
            completions: self.completions.clone(),
        }
    }

    /// Removes and returns every completion reported so far, oldest first.
    pub fn take_completions(&self) -> Result<Vec<SeekCompletion>> {
        let mut queue = lock_queue(&self.completions)?;
        Ok(queue.drain(..).collect())
    }

    pub fn pending_completions(&self) -> Result<usize> {
        Ok(lock_queue(&self.completions)?.len())
    }
}

fn lock_queue(queue: &CompletionQueue) -> Result<MutexGuard<'_, VecDeque<SeekCompletion>>> {
    queue
        .lock()
        .map_err(|_| MultiViewError::msg("seek completion queue has been poisoned"))
}

/// Stream handle produced by [`SimulatedSource::capture_stream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedStream {
    pub source: String,
}

#[derive(Debug)]
pub struct SimulatedSource {
    pub name: String,
    pub current_time: f64,
    pub duration: f64,
    pub paused: bool,
    pub volume: f64,
    /// When false, capturing a stream fails like an unsupported browser.
    pub capture_supported: bool,
    /// Refuse seek requests outright.
    pub reject_seeks: bool,
    /// Accept seek requests but report them as failed.
    pub fail_seeks: bool,
    pub reject_play: bool,
    completions: CompletionQueue,
}

impl SimulatedSource {
    /// Advances the play head while playing, stopping at the end.
    pub fn advance(&mut self, delta: f64) {
        if self.paused {
            return;
        }
        let end = if self.duration.is_finite() {
            self.duration
        } else {
            f64::INFINITY
        };
        self.current_time = (self.current_time + delta).max(0.0).min(end);
    }

    pub fn is_audible(&self) -> bool {
        self.volume > 0.0
    }
}

impl MediaSource for SimulatedSource {
    type Stream = SimulatedStream;

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<()> {
        if self.reject_play {
            return Err(MultiViewError::msg(format!(
                "`{}` refused to start playback",
                self.name
            )));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, level: f64) {
        self.volume = level;
    }

    fn request_seek(&mut self, request: SeekRequest) -> Result<()> {
        if self.reject_seeks {
            return Err(MultiViewError::media(request.entry, "seek rejected"));
        }
        self.current_time = request.target_seconds;
        let completion = if self.fail_seeks {
            request.failed(format!("`{}` could not decode the target frame", self.name))
        } else {
            request.settled()
        };
        lock_queue(&self.completions)?.push_back(completion);
        Ok(())
    }

    fn capture_stream(&mut self) -> Result<SimulatedStream> {
        if !self.capture_supported {
            return Err(MultiViewError::msg(format!(
                "stream capture is not supported for `{}`",
                self.name
            )));
        }
        Ok(SimulatedStream {
            source: self.name.clone(),
        })
    }
}

#[derive(Debug)]
pub struct SimulatedPreview {
    pub bound: Option<SimulatedStream>,
    pub current_time: f64,
    pub paused: bool,
    pub muted: bool,
    pub scale: f64,
}

impl Default for SimulatedPreview {
    fn default() -> Self {
        Self {
            bound: None,
            current_time: 0.0,
            paused: true,
            muted: false,
            scale: 1.0,
        }
    }
}

impl SimulatedPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the source whose frames are currently mirrored.
    pub fn mirrored_source(&self) -> Option<&str> {
        self.bound.as_ref().map(|stream| stream.source.as_str())
    }
}

impl PreviewSurface for SimulatedPreview {
    type Stream = SimulatedStream;

    fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    fn bind(&mut self, stream: SimulatedStream) {
        self.bound = Some(stream);
    }

    fn unbind(&mut self) {
        self.bound = None;
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn play(&mut self) -> Result<()> {
        if self.bound.is_none() {
            return Err(MultiViewError::msg("preview has no stream to play"));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{timeline::SeekToken, EntryId};

    fn request(target_seconds: f64) -> SeekRequest {
        SeekRequest {
            entry: EntryId::FIRST,
            token: SeekToken::new(7),
            target_seconds,
        }
    }

    #[test]
    fn seeks_queue_completions_on_the_backend() {
        let backend = SimulatedBackend::new();
        let mut source = backend.open("a.mp4", 30.0);

        source.request_seek(request(12.0)).unwrap();

        assert_eq!(source.current_time, 12.0);
        let completions = backend.take_completions().unwrap();
        assert_eq!(completions, vec![request(12.0).settled()]);
        assert_eq!(backend.pending_completions().unwrap(), 0);
    }

    #[test]
    fn failing_seeks_still_report_completion() {
        let backend = SimulatedBackend::new();
        let mut source = backend.open("a.mp4", 30.0);
        source.fail_seeks = true;

        source.request_seek(request(3.0)).unwrap();

        let completions = backend.take_completions().unwrap();
        assert!(completions[0].error.is_some());
    }

    #[test]
    fn advance_stops_at_the_end() {
        let backend = SimulatedBackend::new();
        let mut source = backend.open("a.mp4", 5.0);
        source.advance(3.0);
        assert_eq!(source.current_time, 0.0);

        source.play().unwrap();
        source.advance(3.0);
        source.advance(3.0);
        assert_eq!(source.current_time, 5.0);
    }

    #[test]
    fn unsupported_capture_is_an_error() {
        let backend = SimulatedBackend::new();
        let mut source = backend.open("a.mp4", 5.0);
        source.capture_supported = false;
        assert!(source.capture_stream().is_err());
    }

    #[test]
    fn preview_cannot_play_without_a_stream() {
        let mut preview = SimulatedPreview::new();
        assert!(preview.play().is_err());

        preview.bind(SimulatedStream {
            source: "a.mp4".to_string(),
        });
        preview.play().unwrap();
        assert!(!preview.paused);
        assert_eq!(preview.mirrored_source(), Some("a.mp4"));
    }
}
