//! System registry. Owns registered systems in registration order.
//!
//! Each registration receives a fresh [`SystemId`]. IDs are never reused, so
//! a stale ID of an unregistered system can never address a newer one.

use crate::system::System;

/// Handle to a registered system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub u64);

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "System({})", self.0)
    }
}

/// A system together with its handle and the name it registered under.
pub struct RegisteredSystem {
    /// The handle returned at registration.
    pub id: SystemId,
    /// The system's name, captured at registration.
    pub name: String,
    /// The system itself.
    pub system: Box<dyn System>,
}

impl std::fmt::Debug for RegisteredSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSystem")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of all systems known to the ECS, in registration order.
#[derive(Debug)]
pub struct SystemRegistry {
    /// Next ID to hand out. Starts at 1.
    next_id: u64,
    /// Systems in the order they were registered.
    systems: Vec<RegisteredSystem>,
}

impl SystemRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            systems: Vec::new(),
        }
    }

    /// Append a system and return its new ID.
    pub fn register(&mut self, system: Box<dyn System>) -> SystemId {
        let id = SystemId(self.next_id);
        self.next_id += 1;
        self.systems.push(RegisteredSystem {
            id,
            name: system.name().to_string(),
            system,
        });
        id
    }

    /// Remove a system, keeping the relative order of the others.
    ///
    /// Returns the system if it was registered.
    pub fn unregister(&mut self, id: SystemId) -> Option<Box<dyn System>> {
        let pos = self.systems.iter().position(|s| s.id == id)?;
        Some(self.systems.remove(pos).system)
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: SystemId) -> bool {
        self.systems.iter().any(|s| s.id == id)
    }

    /// Returns a registered system by ID.
    #[must_use]
    pub fn get(&self, id: SystemId) -> Option<&RegisteredSystem> {
        self.systems.iter().find(|s| s.id == id)
    }

    /// Returns an iterator over all registered systems in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSystem> {
        self.systems.iter()
    }

    /// Mutable iteration in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RegisteredSystem> {
        self.systems.iter_mut()
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no systems are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}
