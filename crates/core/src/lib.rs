//! Core library for reviewing several recordings of the same event side by
//! side.
//!
//! The [`PlaybackCoordinator`] keeps the recordings frame-aligned, decides
//! which one is audible and mirrored into the preview, and applies transport
//! commands. Media backends plug in through the traits in [`media`]; the
//! [`sim`] module provides a deterministic backend for tests and replays.

pub mod command;
pub mod config;
pub mod coordinator;
pub mod entry;
pub mod error;
pub mod media;
pub mod sim;
pub mod timeline;

pub use command::{key_bindings, Command};
pub use config::{AppConfig, PlayerConfig};
pub use coordinator::{CoordinatorSnapshot, EntrySnapshot, PlaybackCoordinator, SelectOutcome};
pub use entry::{EntryId, VideoEntry};
pub use error::{MultiViewError, Result};
pub use media::{MediaEvent, MediaSource, PreviewSurface, SeekCompletion, SeekRequest};
pub use timeline::{ResumePolicy, SeekBatch, SeekToken};
