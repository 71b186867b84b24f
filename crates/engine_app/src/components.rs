//! Component definitions used by the demo scene.

use engine_component::Component;
use glam::Vec2;

/// World-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec2);

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// A single character drawn at the entity's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// The glyph to draw.
    pub glyph: char,
}

impl Component for Sprite {
    fn type_name() -> &'static str {
        "Sprite"
    }
}

/// Remaining time before the entity is destroyed, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    /// Seconds left.
    pub remaining: f64,
}

impl Lifetime {
    /// A lifetime of `seconds`.
    #[must_use]
    pub fn new(seconds: f64) -> Self {
        Self { remaining: seconds }
    }

    /// Count down by `dt` and report whether the lifetime ran out.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

impl Component for Lifetime {
    fn type_name() -> &'static str {
        "Lifetime"
    }
}

/// Marks an entity as driven by an [`Actor`](crate::scene::Actor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorTag;

impl Component for ActorTag {
    fn type_name() -> &'static str {
        "ActorTag"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_expires() {
        let mut life = Lifetime::new(0.25);
        assert!(!life.tick(0.1));
        assert!(!life.tick(0.1));
        assert!(life.tick(0.1));
    }

    #[test]
    fn test_component_names_are_distinct() {
        let ids = [
            Position::component_type_id(),
            Velocity::component_type_id(),
            Sprite::component_type_id(),
            Lifetime::component_type_id(),
            ActorTag::component_type_id(),
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
