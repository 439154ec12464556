use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal of an imported entry. Assigned at import time starting at 1 and
/// never reused, so it doubles as the handle the UI uses to address an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u32);

impl EntryId {
    pub const FIRST: Self = Self(1);

    pub fn new(ordinal: u32) -> Self {
        Self(ordinal)
    }

    pub fn ordinal(self) -> u32 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for EntryId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One imported, independently playable source.
#[derive(Debug)]
pub struct VideoEntry<S> {
    pub id: EntryId,
    pub label: String,
    /// Time shift applied when the entry is aligned to the selected one.
    pub delay_seconds: f64,
    pub source: S,
}

impl<S> VideoEntry<S> {
    pub fn new(id: EntryId, label: impl Into<String>, source: S) -> Self {
        Self {
            id,
            label: label.into(),
            delay_seconds: 0.0,
            source,
        }
    }
}
