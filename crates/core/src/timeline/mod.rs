use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::EntryId;

/// What happens to playback once every seek of a batch has settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumePolicy {
    /// Resume everything if anything was playing when the batch started.
    #[default]
    ResumeIfPlaying,
    /// Leave everything paused.
    StayPaused,
}

/// Identifies one bulk seek. Tokens grow monotonically; completions carrying
/// anything but the latest token are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeekToken(u64);

impl SeekToken {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Book-keeping for the seek batch currently in flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeekBatch {
    pub token: SeekToken,
    outstanding: BTreeSet<EntryId>,
    /// Whether playback should restart once the batch completes.
    pub resume: bool,
}

impl SeekBatch {
    pub fn new(token: SeekToken, resume: bool) -> Self {
        Self {
            token,
            outstanding: BTreeSet::new(),
            resume,
        }
    }

    pub fn track(&mut self, entry: EntryId) {
        self.outstanding.insert(entry);
    }

    /// Marks `entry` as settled. Returns `false` if the entry was not part of
    /// the batch (or already settled).
    pub fn settle(&mut self, entry: EntryId) -> bool {
        self.outstanding.remove(&entry)
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding.is_empty()
    }

    pub fn outstanding(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.outstanding.iter().copied()
    }
}

/// Clamps a seek target into `[0, duration]`. Durations that are not yet known
/// (NaN, infinite, negative) only clamp at zero.
pub fn clamp_position(target: f64, duration: f64) -> f64 {
    let lower_bounded = target.max(0.0);
    if duration.is_finite() && duration >= 0.0 {
        lower_bounded.min(duration)
    } else {
        lower_bounded
    }
}

/// Percentage of `duration` reached at `position`, as shown on the timeline
/// control.
pub fn progress_percent(position: f64, duration: f64) -> Option<f64> {
    if !duration.is_finite() || duration <= 0.0 || !position.is_finite() {
        return None;
    }
    Some((position / duration * 100.0).clamp(0.0, 100.0))
}

/// Position inside `duration` addressed by a timeline value in percent.
pub fn position_from_percent(percent: f64, duration: f64) -> Option<f64> {
    if !percent.is_finite() || !duration.is_finite() || duration < 0.0 {
        return None;
    }
    Some(percent.clamp(0.0, 100.0) / 100.0 * duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_into_duration() {
        assert_eq!(clamp_position(10.0, 30.0), 10.0);
        assert_eq!(clamp_position(10.0, 5.0), 5.0);
        assert_eq!(clamp_position(-3.0, 5.0), 0.0);
    }

    #[test]
    fn unknown_duration_only_clamps_at_zero() {
        assert_eq!(clamp_position(42.0, f64::NAN), 42.0);
        assert_eq!(clamp_position(-1.0, f64::INFINITY), 0.0);
    }

    #[test]
    fn batch_completes_when_every_entry_settles() {
        let mut batch = SeekBatch::new(SeekToken::new(1), true);
        batch.track(EntryId::new(1));
        batch.track(EntryId::new(2));

        assert!(batch.settle(EntryId::new(2)));
        assert!(!batch.is_complete());
        assert!(!batch.settle(EntryId::new(2)));
        assert!(batch.settle(EntryId::new(1)));
        assert!(batch.is_complete());
    }

    #[test]
    fn tokens_increase() {
        let first = SeekToken::default();
        assert!(first.next() > first);
        assert_eq!(first.next().value(), 1);
    }

    #[test]
    fn progress_handles_missing_metadata() {
        assert_eq!(progress_percent(15.0, 60.0), Some(25.0));
        assert_eq!(progress_percent(15.0, 0.0), None);
        assert_eq!(progress_percent(15.0, f64::NAN), None);
    }

    #[test]
    fn percent_maps_back_to_position() {
        assert_eq!(position_from_percent(50.0, 30.0), Some(15.0));
        assert_eq!(position_from_percent(150.0, 30.0), Some(30.0));
        assert_eq!(position_from_percent(f64::NAN, 30.0), None);
    }
}
