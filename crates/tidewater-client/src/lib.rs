//! Tidewater client core.
//!
//! The client-side half of a turn-based multiplayer strategy game: the
//! attack-resolution protocol and the event-acknowledgment synchronization
//! that keep every client's local progression consistent with the server's
//! serially-ordered event stream. Rendering and raw transport are external
//! collaborators.

pub mod ack;
pub mod alliance;
pub mod attack;
pub mod cards;
pub mod client;
pub mod config;
pub mod intent;
pub mod outbox;
pub mod turn;

pub use ack::{EventAckQueue, LiveEvent};
pub use alliance::{AllianceWait, AllianceWaitTracker};
pub use attack::{AttackError, AttackPlan, AttackResolutionCoordinator, PlanStatus};
pub use cards::{AutoCommit, CardCombatNegotiator, CardSelectionWindow, WindowMode};
pub use client::{GameClient, PendingAllianceRequest};
pub use config::{AllianceWaitConfig, ClientConfig, PlaybackConfig};
pub use intent::Intent;
pub use outbox::Outbox;
pub use turn::{TurnPhaseController, TurnState};
