//! Seams between the coordinator and the media subsystem it drives.
//!
//! The coordinator never decodes anything itself. A backend supplies one
//! [`MediaSource`] per imported recording and a single [`PreviewSurface`] that
//! mirrors whichever source is selected. Seeks are asynchronous: the backend
//! accepts a [`SeekRequest`] and later reports a [`SeekCompletion`] through
//! [`MediaEvent::SeekSettled`].

use serde::{Deserialize, Serialize};

use crate::{timeline::SeekToken, EntryId, Result};

/// A playable recording as seen by the coordinator.
pub trait MediaSource {
    /// Live stream handle that can be bound to the preview surface.
    type Stream;

    fn current_time(&self) -> f64;

    /// Moves the play head without waiting for the seek to settle.
    fn set_current_time(&mut self, seconds: f64);

    /// Total length in seconds. NaN while metadata is not loaded yet.
    fn duration(&self) -> f64;

    fn is_paused(&self) -> bool;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn volume(&self) -> f64;

    fn set_volume(&mut self, level: f64);

    /// Starts a seek whose completion is reported later with the same token.
    fn request_seek(&mut self, request: SeekRequest) -> Result<()>;

    /// Captures the live frames of this source.
    fn capture_stream(&mut self) -> Result<Self::Stream>;
}

/// The single shared element that mirrors the selected source.
pub trait PreviewSurface {
    type Stream;

    fn is_bound(&self) -> bool;

    fn bind(&mut self, stream: Self::Stream);

    fn unbind(&mut self);

    fn set_current_time(&mut self, seconds: f64);

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn set_muted(&mut self, muted: bool);

    fn set_scale(&mut self, scale: f64);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekRequest {
    pub entry: EntryId,
    pub token: SeekToken,
    pub target_seconds: f64,
}

impl SeekRequest {
    /// Successful completion for this request.
    pub fn settled(&self) -> SeekCompletion {
        SeekCompletion {
            entry: self.entry,
            token: self.token,
            error: None,
        }
    }

    pub fn failed(&self, reason: impl Into<String>) -> SeekCompletion {
        SeekCompletion {
            entry: self.entry,
            token: self.token,
            error: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekCompletion {
    pub entry: EntryId,
    pub token: SeekToken,
    /// Backend reason when the seek did not land.
    pub error: Option<String>,
}

/// Callbacks from the media subsystem, fed back into the coordinator by the
/// event loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    LoadStarted(EntryId),
    CanPlay(EntryId),
    SeekSettled(SeekCompletion),
}
