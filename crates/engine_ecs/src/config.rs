//! System configuration.

use engine_component::SystemQuery;

/// Static description of a system: its name and its query.
#[derive(Debug, Clone)]
pub struct SystemConfig {
    /// Human-readable system name (e.g. `"movement"`).
    pub name: String,
    /// Target component types and match policy.
    pub query: SystemQuery,
}

impl SystemConfig {
    /// Create a new system config with the given name and query.
    #[must_use]
    pub fn new(name: impl Into<String>, query: SystemQuery) -> Self {
        Self {
            name: name.into(),
            query,
        }
    }
}
