//! Error types for the ECS registry and tick loop.

/// Errors raised by [`Ecs`](crate::Ecs) and [`TickLoop`](crate::TickLoop).
///
/// Operations on missing entities, absent components, or unregistered
/// systems are not errors: they are silent no-ops that report through their
/// `bool`/`Option` return values.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// A system declared no target component types.
    #[error("system '{system}' declares no target component types")]
    EmptyTargetTypes {
        /// Name of the rejected system.
        system: String,
    },

    /// A system's `update` returned an error. The rest of that tick's
    /// systems were skipped; the destruction queue was still drained.
    #[error("system '{system}' failed on tick {tick_id}: {source}")]
    SystemFailed {
        /// Name of the failing system.
        system: String,
        /// Tick on which it failed.
        tick_id: u64,
        /// The error returned by the system.
        #[source]
        source: anyhow::Error,
    },

    /// The tick rate is not a positive, finite number.
    #[error("invalid tick rate: {0} (must be finite and > 0)")]
    InvalidTickRate(f64),
}
