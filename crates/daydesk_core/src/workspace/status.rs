//! Save status indicator.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved { at: Instant },
    Failed,
}

impl SaveStatus {
    /// Text for the transient status line.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Saving => "Saving...",
            Self::Saved { .. } => "Saved",
            Self::Failed => "Save failed",
        }
    }

    /// "Saved" clears itself after `linger`; other states persist.
    pub fn expire(self, now: Instant, linger: Duration) -> Self {
        match self {
            Self::Saved { at } if now.duration_since(at) >= linger => Self::Idle,
            other => other,
        }
    }
}
