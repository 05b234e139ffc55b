use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

mod board;
pub use board::*;
mod drag;
pub use drag::*;
mod queue;
pub use queue::*;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: ShotStatus, to: ShotStatus },
}

/// Stable shot identifier, assigned once at creation and never reused.
///
/// Derived from a millisecond clock, bumped past the previously issued id so
/// two shots created within the same millisecond still get distinct,
/// strictly increasing ids.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ShotId(pub u64);

static LAST_SHOT_ID: AtomicU64 = AtomicU64::new(0);

impl ShotId {
    pub fn new() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        let mut prev = LAST_SHOT_ID.load(Ordering::Relaxed);
        loop {
            let next = now.max(prev + 1);
            match LAST_SHOT_ID.compare_exchange_weak(
                prev,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(next),
                Err(actual) => prev = actual,
            }
        }
    }
}

impl Default for ShotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShotStatus {
    Pending,
    Generating,
    Completed,
}

impl ShotStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ShotStatus::Pending => "pending",
            ShotStatus::Generating => "generating",
            ShotStatus::Completed => "completed",
        }
    }

    /// Forward-only: pending -> generating -> completed. Timers live outside
    /// the board and call back in through `set_status`.
    pub fn can_transition_to(self, next: ShotStatus) -> bool {
        matches!(
            (self, next),
            (ShotStatus::Pending, ShotStatus::Generating)
                | (ShotStatus::Generating, ShotStatus::Completed)
        )
    }
}

impl fmt::Display for ShotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub id: ShotId,
    /// 1-based position in the board; recomputed on every insert/delete/move.
    pub number: usize,
    pub description: String,
    pub status: ShotStatus,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub prompt: String,
    pub scene: String,
}

impl Shot {
    pub fn new(
        description: impl Into<String>,
        prompt: impl Into<String>,
        scene: impl Into<String>,
    ) -> Self {
        Self {
            id: ShotId::new(),
            number: 0,
            description: description.into(),
            status: ShotStatus::Pending,
            thumbnail: None,
            prompt: prompt.into(),
            scene: scene.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shot_ids_are_unique_and_increasing() {
        let a = ShotId::new();
        let b = ShotId::new();
        let c = ShotId::new();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn status_transitions_are_forward_only() {
        assert!(ShotStatus::Pending.can_transition_to(ShotStatus::Generating));
        assert!(ShotStatus::Generating.can_transition_to(ShotStatus::Completed));
        assert!(!ShotStatus::Completed.can_transition_to(ShotStatus::Generating));
        assert!(!ShotStatus::Pending.can_transition_to(ShotStatus::Completed));
        assert!(!ShotStatus::Generating.can_transition_to(ShotStatus::Pending));
    }
}
