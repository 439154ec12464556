use serde::{Deserialize, Serialize};

use crate::PlayerConfig;

/// Transport command issued by a key press, a toolbar button, or a replay
/// script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    TogglePlayback,
    SeekForward { seconds: f64 },
    SeekBackward { seconds: f64 },
    Select { ordinal: u32 },
    ToggleZoom,
    Synchronize,
    ToggleSyncMode,
    SetVolume { level: f64 },
    SetDelay { ordinal: u32, seconds: f64 },
    Scrub { percent: f64 },
}

impl Command {
    /// Maps a keyboard event (`KeyboardEvent.code` and `.key` values) onto a
    /// command.
    pub fn from_key(code: &str, key: &str, config: &PlayerConfig) -> Option<Self> {
        match code {
            "Space" => Some(Self::TogglePlayback),
            "ArrowRight" => Some(Self::SeekForward {
                seconds: config.short_seek_seconds,
            }),
            "ArrowLeft" => Some(Self::SeekBackward {
                seconds: config.short_seek_seconds,
            }),
            "KeyZ" => Some(Self::ToggleZoom),
            "KeyS" => Some(Self::Synchronize),
            _ if code.starts_with("Digit") || code.starts_with("Numpad") => {
                let digit = key.parse::<u32>().ok().filter(|digit| *digit <= 9)?;
                Some(Self::Select { ordinal: digit })
            }
            _ => None,
        }
    }

    /// The toolbar transport row, left to right.
    pub fn transport_row(config: &PlayerConfig) -> [Self; 6] {
        [
            Self::Synchronize,
            Self::SeekBackward {
                seconds: config.long_seek_seconds,
            },
            Self::SeekBackward {
                seconds: config.short_seek_seconds,
            },
            Self::TogglePlayback,
            Self::SeekForward {
                seconds: config.short_seek_seconds,
            },
            Self::SeekForward {
                seconds: config.long_seek_seconds,
            },
        ]
    }
}

/// Human readable key bindings, in the order they are documented.
pub fn key_bindings() -> &'static [(&'static str, &'static str)] {
    &[
        ("Space", "play / pause every recording"),
        ("ArrowRight", "seek forward by the short step"),
        ("ArrowLeft", "seek backward by the short step"),
        ("0-9", "select the recording with that number"),
        ("Z", "toggle preview zoom"),
        ("S", "align every recording to the selected one"),
    ]
}
