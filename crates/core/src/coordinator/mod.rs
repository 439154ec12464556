//! Multi-angle playback coordination.
//!
//! [`PlaybackCoordinator`] owns every imported recording, keeps exactly one
//! of them selected and audible, and mirrors the selected one into the shared
//! preview surface. Transport commands either fan out to every entry (play,
//! pause, relative seeks) or target the selected entry alone (volume,
//! timeline scrubbing).
//!
//! All mutation happens through `&mut self` on the event-loop thread; media
//! callbacks come back in through [`PlaybackCoordinator::handle_event`].

mod snapshot;

pub use snapshot::{CoordinatorSnapshot, EntrySnapshot};

use crate::{
    media::{MediaEvent, MediaSource, PreviewSurface, SeekCompletion, SeekRequest},
    timeline::{self, ResumePolicy, SeekBatch, SeekToken},
    Command, EntryId, MultiViewError, PlayerConfig, Result, VideoEntry,
};

/// Result of [`PlaybackCoordinator::select_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    /// No entry has that ordinal. Nothing changed.
    NotFound,
    /// The target's stream could not be captured. The previous selection is
    /// still in place.
    MediaUnavailable,
}

pub struct PlaybackCoordinator<S, P> {
    config: PlayerConfig,
    entries: Vec<VideoEntry<S>>,
    next_id: EntryId,
    selected: Option<EntryId>,
    preview: P,
    preview_volume: f64,
    zoomed: bool,
    sync_mode: bool,
    loading: bool,
    last_token: SeekToken,
    pending_seek: Option<SeekBatch>,
}

impl<S, P> PlaybackCoordinator<S, P>
where
    S: MediaSource,
    P: PreviewSurface<Stream = S::Stream>,
{
    pub fn new(preview: P) -> Self {
        Self::with_config(preview, PlayerConfig::default())
    }

    pub fn with_config(preview: P, config: PlayerConfig) -> Self {
        Self {
            preview_volume: config.initial_volume,
            config,
            entries: Vec::new(),
            next_id: EntryId::FIRST,
            selected: None,
            preview,
            zoomed: false,
            sync_mode: false,
            loading: false,
            last_token: SeekToken::default(),
            pending_seek: None,
        }
    }

    /// Adds a recording. It starts muted unless it is the one that claims the
    /// preview, in which case it also becomes the selected entry.
    pub fn import_source(&mut self, mut source: S, label: impl Into<String>) -> EntryId {
        let id = self.next_id;
        self.next_id = id.next();

        source.set_volume(0.0);
        let mut entry = VideoEntry::new(id, label, source);
        if !self.preview.is_bound() {
            self.claim_preview(&mut entry);
        }

        tracing::debug!(entry = %id, label = %entry.label, "imported source");
        self.entries.push(entry);
        id
    }

    fn claim_preview(&mut self, entry: &mut VideoEntry<S>) {
        let stream = match entry.source.capture_stream() {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(entry = %entry.id, error = %err, "could not mirror source into the preview");
                return;
            }
        };

        self.preview.bind(stream);
        self.preview.set_muted(true);
        if let Err(err) = self.preview.play() {
            tracing::warn!(error = %err, "preview refused to start");
        }

        entry.source.set_volume(self.config.initial_volume);
        self.preview_volume = self.config.initial_volume;
        self.selected = Some(entry.id);
    }

    /// Makes `id` the reference entry: its stream feeds the preview and it
    /// inherits the loudness of the previous selection.
    pub fn select_entry(&mut self, id: EntryId) -> SelectOutcome {
        let Some(index) = self.index_of(id) else {
            tracing::debug!(entry = %id, "selection ignored, no such entry");
            return SelectOutcome::NotFound;
        };

        let target = &mut self.entries[index].source;
        let stream = match target.capture_stream() {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(entry = %id, error = %err, "could not capture stream, keeping previous selection");
                return SelectOutcome::MediaUnavailable;
            }
        };
        let position = target.current_time();
        let paused = target.is_paused();

        self.reset_zoom();
        self.preview.bind(stream);
        self.preview.set_current_time(position);
        if paused {
            self.preview.pause();
        } else if let Err(err) = self.preview.play() {
            tracing::warn!(entry = %id, error = %err, "preview refused to follow playback");
        }

        let volume = self
            .selected_entry()
            .map(|entry| entry.source.volume())
            .unwrap_or(self.config.initial_volume);
        for entry in &mut self.entries {
            entry.source.set_volume(0.0);
        }
        self.entries[index].source.set_volume(volume);
        self.preview_volume = volume;
        self.selected = Some(id);

        tracing::debug!(entry = %id, volume, "selected entry");
        SelectOutcome::Selected
    }

    /// Plays everything if everything is paused, otherwise pauses everything.
    pub fn toggle_playback(&mut self) {
        // An explicit transport command overrides a pending resume.
        if let Some(batch) = self.pending_seek.as_mut() {
            batch.resume = false;
        }

        if self.all_paused() {
            self.play_all();
        } else {
            self.pause_all();
        }
    }

    pub fn all_paused(&self) -> bool {
        self.entries.iter().all(|entry| entry.source.is_paused())
    }

    pub fn play_all(&mut self) {
        for entry in &mut self.entries {
            if let Err(err) = entry.source.play() {
                tracing::warn!(entry = %entry.id, error = %err, "playback refused");
            }
        }
        if let Err(err) = self.preview.play() {
            tracing::warn!(error = %err, "preview refused to start");
        }
    }

    pub fn pause_all(&mut self) {
        for entry in &mut self.entries {
            entry.source.pause();
        }
        self.preview.pause();
    }

    /// Moves every entry by `seconds`, each clamped to its own duration.
    ///
    /// Everything is paused first. The returned token identifies the batch;
    /// completions for older batches are ignored. Once every entry of the
    /// batch has settled, playback resumes according to the configured
    /// [`ResumePolicy`].
    pub fn seek_relative(&mut self, forward: bool, seconds: f64) -> Result<SeekToken> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(MultiViewError::InvalidSeek(seconds));
        }

        let superseded_resume = self.pending_seek.take().is_some_and(|batch| batch.resume);
        let was_playing = !self.all_paused() || superseded_resume;
        self.pause_all();

        let token = self.last_token.next();
        self.last_token = token;
        let resume = was_playing && self.config.resume_policy == ResumePolicy::ResumeIfPlaying;
        let mut batch = SeekBatch::new(token, resume);

        let delta = if forward { seconds } else { -seconds };
        for entry in &mut self.entries {
            let source = &mut entry.source;
            let target = timeline::clamp_position(source.current_time() + delta, source.duration());
            let request = SeekRequest {
                entry: entry.id,
                token,
                target_seconds: target,
            };
            match source.request_seek(request) {
                Ok(()) => batch.track(entry.id),
                Err(err) => {
                    tracing::warn!(entry = %entry.id, error = %err, "seek request rejected");
                }
            }
        }

        tracing::debug!(token = token.value(), delta, resume, "issued seek batch");
        self.pending_seek = Some(batch);
        self.finish_seek_if_complete();
        Ok(token)
    }

    /// Sets the selected entry's loudness.
    pub fn set_volume(&mut self, level: f64) {
        if !level.is_finite() {
            tracing::warn!(level, "ignoring non-finite volume");
            return;
        }
        let level = level.clamp(0.0, 1.0);
        let Some(entry) = self.selected_entry_mut() else {
            return;
        };
        entry.source.set_volume(level);
        self.preview_volume = level;
    }

    /// Aligns every other entry to the selected one, shifted by its delay.
    pub fn synchronize_to_selected(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        let Some(reference) = self.entry(selected).map(|entry| entry.source.current_time()) else {
            return;
        };

        for entry in self.entries.iter_mut().filter(|entry| entry.id != selected) {
            let duration = entry.source.duration();
            entry
                .source
                .set_current_time(timeline::clamp_position(reference + entry.delay_seconds, duration));
        }
    }

    /// Stores a delay for `id` and re-aligns right away.
    pub fn set_entry_delay(&mut self, id: EntryId, seconds: f64) {
        if !seconds.is_finite() {
            tracing::warn!(entry = %id, seconds, "ignoring non-finite delay");
            return;
        }
        let Some(entry) = self.entry_mut(id) else {
            return;
        };
        entry.delay_seconds = seconds;
        self.synchronize_to_selected();
    }

    pub fn toggle_zoom(&mut self) {
        self.zoomed = !self.zoomed;
        let scale = if self.zoomed {
            self.config.zoom_factor
        } else {
            1.0
        };
        self.preview.set_scale(scale);
    }

    fn reset_zoom(&mut self) {
        self.zoomed = false;
        self.preview.set_scale(1.0);
    }

    /// Flips whether per-entry delay editing is offered.
    pub fn toggle_sync_mode(&mut self) -> bool {
        self.sync_mode = !self.sync_mode;
        self.sync_mode
    }

    /// Moves the selected entry to `percent` of its length, then re-aligns
    /// the others.
    pub fn scrub_timeline(&mut self, percent: f64) {
        let Some(entry) = self.selected_entry_mut() else {
            return;
        };
        let Some(position) = timeline::position_from_percent(percent, entry.source.duration())
        else {
            tracing::debug!(percent, "cannot scrub before duration is known");
            return;
        };
        entry.source.set_current_time(position);
        self.synchronize_to_selected();
    }

    /// Timeline value for the selected entry, in percent.
    pub fn timeline_progress(&self) -> Option<f64> {
        let source = &self.selected_entry()?.source;
        timeline::progress_percent(source.current_time(), source.duration())
    }

    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::LoadStarted(id) => {
                self.loading = true;
                for entry in self.entries.iter_mut().filter(|entry| entry.id != id) {
                    entry.source.pause();
                }
            }
            MediaEvent::CanPlay(_) => self.loading = false,
            MediaEvent::SeekSettled(completion) => self.on_seek_settled(completion),
        }
    }

    fn on_seek_settled(&mut self, completion: SeekCompletion) {
        if let Some(reason) = &completion.error {
            tracing::warn!(entry = %completion.entry, token = completion.token.value(), reason = %reason, "seek failed");
        }

        let Some(batch) = self.pending_seek.as_mut() else {
            tracing::debug!(token = completion.token.value(), "no seek batch in flight");
            return;
        };
        if batch.token != completion.token {
            tracing::debug!(
                token = completion.token.value(),
                current = batch.token.value(),
                "discarding stale seek completion"
            );
            return;
        }
        if batch.settle(completion.entry) {
            self.finish_seek_if_complete();
        }
    }

    fn finish_seek_if_complete(&mut self) {
        if !self.pending_seek.as_ref().is_some_and(SeekBatch::is_complete) {
            return;
        }
        let Some(batch) = self.pending_seek.take() else {
            return;
        };
        tracing::debug!(token = batch.token.value(), resume = batch.resume, "seek batch settled");
        if batch.resume {
            self.play_all();
        }
    }

    /// Drops an entry. Removing the selected entry clears the selection and
    /// releases the preview so the next import claims it.
    pub fn remove_entry(&mut self, id: EntryId) -> Option<S> {
        let index = self.index_of(id)?;
        let entry = self.entries.remove(index);

        if let Some(batch) = self.pending_seek.as_mut() {
            batch.settle(id);
        }
        self.finish_seek_if_complete();

        if self.selected == Some(id) {
            self.selected = None;
            self.preview.pause();
            self.preview.unbind();
            self.reset_zoom();
        }

        tracing::debug!(entry = %id, "removed entry");
        Some(entry.source)
    }

    /// Applies a transport command. Only invalid seek amounts are reported;
    /// everything else degrades to a logged no-op.
    pub fn execute(&mut self, command: &Command) -> Result<()> {
        match command {
            Command::TogglePlayback => self.toggle_playback(),
            Command::SeekForward { seconds } => {
                self.seek_relative(true, *seconds)?;
            }
            Command::SeekBackward { seconds } => {
                self.seek_relative(false, *seconds)?;
            }
            Command::Select { ordinal } => {
                self.select_entry(EntryId::new(*ordinal));
            }
            Command::ToggleZoom => self.toggle_zoom(),
            Command::Synchronize => self.synchronize_to_selected(),
            Command::ToggleSyncMode => {
                self.toggle_sync_mode();
            }
            Command::SetVolume { level } => self.set_volume(*level),
            Command::SetDelay { ordinal, seconds } => {
                self.set_entry_delay(EntryId::new(*ordinal), *seconds)
            }
            Command::Scrub { percent } => self.scrub_timeline(*percent),
        }
        Ok(())
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn entries(&self) -> &[VideoEntry<S>] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&VideoEntry<S>> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn entry_mut(&mut self, id: EntryId) -> Option<&mut VideoEntry<S>> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    /// Direct access to a source for the event loop driving the backend
    /// (advancing clocks, feeding decoded frames).
    pub fn source_mut(&mut self, id: EntryId) -> Option<&mut S> {
        self.entry_mut(id).map(|entry| &mut entry.source)
    }

    fn index_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn selected(&self) -> Option<EntryId> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&VideoEntry<S>> {
        self.entry(self.selected?)
    }

    fn selected_entry_mut(&mut self) -> Option<&mut VideoEntry<S>> {
        let selected = self.selected?;
        self.entry_mut(selected)
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    pub fn preview_volume(&self) -> f64 {
        self.preview_volume
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    pub fn sync_mode(&self) -> bool {
        self.sync_mode
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pending_seek(&self) -> Option<&SeekBatch> {
        self.pending_seek.as_ref()
    }
}

impl<S, P> std::fmt::Debug for PlaybackCoordinator<S, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackCoordinator")
            .field("entries", &self.entries.len())
            .field("selected", &self.selected)
            .field("zoomed", &self.zoomed)
            .field("pending_seek", &self.pending_seek)
            .finish()
    }
}
