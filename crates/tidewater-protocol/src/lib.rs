//! Wire protocol for Tidewater multiplayer games.
//!
//! Pure data: typed IDs, game enums, client/server messages, and the
//! server-pushed event stream. Serialization is MessagePack via rmp-serde,
//! with JSON helpers for debugging and UI embedding.

pub mod event;
pub mod ids;
pub mod message;
pub mod types;
pub mod wire;

pub use event::{EventKind, EventPayload, GameEvent};
pub use ids::{BattleId, CardId, EventId, PlanId, PlayerId, TerritoryId, WaterBodyId};
pub use message::{ClientMessage, ServerMessage};
pub use types::{
    AllianceSide, AllyBreakdown, CardKind, CardRarity, CardReveal, CombatCard, CombatResult,
    Phase, PhaseSkipReason, ProductionResults, Reinforcement, ReinforcementError, TerritoryYield,
    UnitKind,
};
pub use wire::WireError;
