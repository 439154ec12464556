use serde::Serialize;

use super::PlaybackCoordinator;
use crate::{
    media::{MediaSource, PreviewSurface},
    timeline::SeekToken,
    EntryId,
};

/// Serialisable view of the coordinator, used by the UI layer to re-render
/// and by the replay tool to report the final state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinatorSnapshot {
    pub selected: Option<EntryId>,
    pub preview_volume: f64,
    pub zoomed: bool,
    pub sync_mode: bool,
    pub loading: bool,
    pub timeline_progress: Option<f64>,
    pub pending_seek: Option<SeekToken>,
    pub entries: Vec<EntrySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySnapshot {
    pub id: EntryId,
    pub label: String,
    pub current_time: f64,
    pub duration: f64,
    pub paused: bool,
    pub volume: f64,
    pub delay_seconds: f64,
    pub selected: bool,
}

impl<S, P> PlaybackCoordinator<S, P>
where
    S: MediaSource,
    P: PreviewSurface<Stream = S::Stream>,
{
    pub fn snapshot(&self) -> CoordinatorSnapshot {
        let entries = self
            .entries()
            .iter()
            .map(|entry| EntrySnapshot {
                id: entry.id,
                label: entry.label.clone(),
                current_time: entry.source.current_time(),
                duration: entry.source.duration(),
                paused: entry.source.is_paused(),
                volume: entry.source.volume(),
                delay_seconds: entry.delay_seconds,
                selected: self.selected() == Some(entry.id),
            })
            .collect();

        CoordinatorSnapshot {
            selected: self.selected(),
            preview_volume: self.preview_volume(),
            zoomed: self.is_zoomed(),
            sync_mode: self.sync_mode(),
            loading: self.is_loading(),
            timeline_progress: self.timeline_progress(),
            pending_seek: self.pending_seek().map(|batch| batch.token),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::{SimulatedBackend, SimulatedPreview, SimulatedSource};
    use crate::{EntryId, PlaybackCoordinator};

    #[test]
    fn snapshot_marks_the_selected_entry() {
        let backend = SimulatedBackend::new();
        let mut coordinator: PlaybackCoordinator<SimulatedSource, SimulatedPreview> =
            PlaybackCoordinator::new(SimulatedPreview::new());
        coordinator.import_source(backend.open("left.mp4", 20.0), "left.mp4");
        coordinator.import_source(backend.open("right.mp4", 20.0), "right.mp4");
        coordinator.select_entry(EntryId::new(2));

        let snapshot = coordinator.snapshot();

        assert_eq!(snapshot.entries.len(), 2);
        assert!(!snapshot.entries[0].selected);
        assert!(snapshot.entries[1].selected);
        assert_eq!(snapshot.entries[1].volume, 0.5);
        assert_eq!(snapshot.timeline_progress, Some(0.0));
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let backend = SimulatedBackend::new();
        let mut coordinator: PlaybackCoordinator<SimulatedSource, SimulatedPreview> =
            PlaybackCoordinator::new(SimulatedPreview::new());
        coordinator.import_source(backend.open("left.mp4", 20.0), "left.mp4");
        coordinator.seek_relative(true, 5.0).unwrap();

        let value = serde_json::to_value(coordinator.snapshot()).unwrap();

        assert_eq!(value["selected"], 1);
        assert_eq!(value["pending_seek"], 1);
        assert_eq!(value["entries"][0]["current_time"], 5.0);
        assert_eq!(value["entries"][0]["label"], "left.mp4");
    }
}
