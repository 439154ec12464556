use std::path::Path;

use multiview_core::{
    sim::{SimulatedBackend, SimulatedPreview, SimulatedSource},
    Command, CoordinatorSnapshot, EntryId, MediaEvent, PlaybackCoordinator, PlayerConfig, Result,
};
use serde::Deserialize;

/// A scripted review session: which recordings to open and what to do with
/// them.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionScript {
    pub sources: Vec<SourceSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    /// Length in seconds. Omit to simulate a source whose metadata has not
    /// loaded yet.
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Command(Command),
    /// Let wall-clock time pass for every playing recording.
    Advance { advance: f64 },
    Key { code: String, key: String },
}

impl SessionScript {
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Replays `script` against the simulated backend and returns the final state.
pub fn replay(script: &SessionScript, config: PlayerConfig) -> Result<CoordinatorSnapshot> {
    let backend = SimulatedBackend::new();
    let mut coordinator: PlaybackCoordinator<SimulatedSource, SimulatedPreview> =
        PlaybackCoordinator::with_config(SimulatedPreview::new(), config);

    for spec in &script.sources {
        let source = backend.open(spec.name.clone(), spec.duration.unwrap_or(f64::NAN));
        let id = coordinator.import_source(source, spec.name.clone());
        coordinator.handle_event(MediaEvent::LoadStarted(id));
        coordinator.handle_event(MediaEvent::CanPlay(id));
    }

    for (index, step) in script.steps.iter().enumerate() {
        match step {
            Step::Command(command) => coordinator.execute(command)?,
            Step::Key { code, key } => {
                match Command::from_key(code, key, coordinator.config()) {
                    Some(command) => coordinator.execute(&command)?,
                    None => tracing::debug!(step = index, code = %code, "key is not bound"),
                }
            }
            Step::Advance { advance } => {
                let ids: Vec<EntryId> = coordinator.entries().iter().map(|entry| entry.id).collect();
                for id in ids {
                    if let Some(source) = coordinator.source_mut(id) {
                        source.advance(*advance);
                    }
                }
            }
        }

        for completion in backend.take_completions()? {
            coordinator.handle_event(MediaEvent::SeekSettled(completion));
        }
        tracing::debug!(step = index, state = ?coordinator, "applied step");
    }

    Ok(coordinator.snapshot())
}
