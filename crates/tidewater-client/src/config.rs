//! Client configuration

use serde::{Deserialize, Serialize};
use tidewater_protocol::EventKind;

/// Client behavior configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Frame rate used to convert wall-clock deadlines to frame counts
    pub frames_per_second: u32,
    /// Whether the match uses card-based combat
    pub card_combat_enabled: bool,
    /// Alliance wait settings
    pub alliance: AllianceWaitConfig,
    /// Event playback durations
    pub playback: PlaybackConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 60,
            card_combat_enabled: true,
            alliance: AllianceWaitConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

/// Alliance wait settings.
///
/// The server enforces the real vote ceiling; the client tracks its own copy
/// plus a grace period so a lost resolution can never wedge the waiting
/// indicator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AllianceWaitConfig {
    /// Server-side vote ceiling in seconds
    pub ceiling_secs: u32,
    /// Extra frames past the ceiling before the client gives up locally
    pub grace_frames: u32,
}

impl Default for AllianceWaitConfig {
    fn default() -> Self {
        Self {
            ceiling_secs: 60,
            grace_frames: 120,
        }
    }
}

impl AllianceWaitConfig {
    /// Local deadline in frames, ceiling plus grace.
    pub fn deadline_frames(&self, frames_per_second: u32) -> u32 {
        self.ceiling_secs
            .saturating_mul(frames_per_second)
            .saturating_add(self.grace_frames)
    }
}

/// Playback durations per event kind, in frames.
///
/// Durations are presentation tuning, not protocol correctness; any finite
/// deterministic value works. PhaseSkip is a blocking prompt the user must
/// dismiss, so it has no duration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub combat_frames: u32,
    pub production_frames: u32,
    pub capture_frames: u32,
    pub reveal_frames: u32,
    /// Upper bound applied to every animated kind
    pub max_frames: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            combat_frames: 180,
            production_frames: 90,
            capture_frames: 60,
            reveal_frames: 120,
            max_frames: 300,
        }
    }
}

impl PlaybackConfig {
    /// Playback duration for an event kind. `None` means the event blocks on
    /// an explicit dismissal instead of a timed animation.
    pub fn duration_frames(&self, kind: EventKind) -> Option<u32> {
        let frames = match kind {
            EventKind::Combat => self.combat_frames,
            EventKind::Production => self.production_frames,
            EventKind::StockpileCapture => self.capture_frames,
            EventKind::CardReveal => self.reveal_frames,
            EventKind::PhaseSkip => return None,
        };
        Some(frames.min(self.max_frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alliance_deadline_frames() {
        let config = AllianceWaitConfig::default();
        // 60 s at 60 fps plus 120 grace frames
        assert_eq!(config.deadline_frames(60), 3600 + 120);
        assert_eq!(config.deadline_frames(30), 1800 + 120);
    }

    #[test]
    fn playback_durations_capped() {
        let config = PlaybackConfig {
            combat_frames: 500,
            ..PlaybackConfig::default()
        };
        assert_eq!(config.duration_frames(EventKind::Combat), Some(300));
        assert_eq!(config.duration_frames(EventKind::Production), Some(90));
        assert_eq!(config.duration_frames(EventKind::PhaseSkip), None);
    }
}
