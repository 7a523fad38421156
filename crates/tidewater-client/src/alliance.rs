//! Client-side view of the server-run alliance vote.
//!
//! The client only observes: waiting, resolved, or timed out. Vote
//! collection and tallying live on the server.

use tidewater_protocol::PlanId;
use tracing::debug;

/// An in-progress alliance wait for a submitted attack plan.
#[derive(Clone, Debug)]
pub struct AllianceWait {
    pub plan: PlanId,
    pub deadline_frames: u32,
    pub elapsed_frames: u32,
}

/// Tracks at most one alliance wait at a time.
#[derive(Debug, Default)]
pub struct AllianceWaitTracker {
    wait: Option<AllianceWait>,
}

impl AllianceWaitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting on the vote for a plan.
    pub fn begin(&mut self, plan: PlanId, deadline_frames: u32) {
        self.wait = Some(AllianceWait {
            plan,
            deadline_frames,
            elapsed_frames: 0,
        });
    }

    /// The wait currently shown by the UI, if any.
    pub fn current(&self) -> Option<&AllianceWait> {
        self.wait.as_ref()
    }

    /// Advance the wait clock. Returns the plan id if the local deadline
    /// passed without a resolution; the wait is destroyed in that case.
    pub fn tick(&mut self, frames: u32) -> Option<PlanId> {
        let wait = self.wait.as_mut()?;
        wait.elapsed_frames = wait.elapsed_frames.saturating_add(frames);
        if wait.elapsed_frames >= wait.deadline_frames {
            let plan = wait.plan;
            debug!(?plan, "alliance wait passed local deadline");
            self.wait = None;
            Some(plan)
        } else {
            None
        }
    }

    /// The server resolved the vote. Returns true if it matched the wait,
    /// which is destroyed; a mismatched plan id leaves the wait untouched.
    pub fn resolve(&mut self, plan: PlanId) -> bool {
        match &self.wait {
            Some(wait) if wait.plan == plan => {
                self.wait = None;
                true
            }
            _ => false,
        }
    }

    /// Destroy the wait without resolution (local cancel or resync).
    pub fn clear(&mut self) {
        self.wait = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_matches_plan_id() {
        let mut tracker = AllianceWaitTracker::new();
        tracker.begin(PlanId(5), 100);

        assert!(!tracker.resolve(PlanId(4)));
        assert!(tracker.current().is_some());

        assert!(tracker.resolve(PlanId(5)));
        assert!(tracker.current().is_none());
        // Double resolve is a no-op
        assert!(!tracker.resolve(PlanId(5)));
    }

    #[test]
    fn deadline_expiry() {
        let mut tracker = AllianceWaitTracker::new();
        tracker.begin(PlanId(2), 100);

        assert_eq!(tracker.tick(60), None);
        assert_eq!(tracker.current().unwrap().elapsed_frames, 60);
        assert_eq!(tracker.tick(40), Some(PlanId(2)));
        assert!(tracker.current().is_none());
        // Ticking with no wait is a no-op
        assert_eq!(tracker.tick(100), None);
    }
}
