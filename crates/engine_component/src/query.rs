//! System queries: which component types a system targets, and how.
//!
//! A [`SystemQuery`] pairs a non-empty list of target component types with a
//! [`MatchPolicy`]. The world evaluates it against an entity's
//! [`ComponentContainer`] whenever that entity's component set changes, and
//! once for every existing entity when the system is registered.

use crate::component::{Component, ComponentTypeId};
use crate::container::ComponentContainer;

/// How a system's target types are matched against an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchPolicy {
    /// The entity holds at least one of the target types.
    #[default]
    Any,
    /// The entity holds every target type.
    All,
}

/// The component types a system runs over, plus its [`MatchPolicy`].
///
/// Targets keep their declaration order, which is also the order they are
/// tested in. Adding a type twice has no effect.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemQuery {
    targets: Vec<ComponentTypeId>,
    policy: MatchPolicy,
}

impl SystemQuery {
    /// Create an empty query with the given policy.
    #[must_use]
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            targets: Vec::new(),
            policy,
        }
    }

    /// An empty query that matches entities holding any of its targets.
    #[must_use]
    pub fn any() -> Self {
        Self::new(MatchPolicy::Any)
    }

    /// An empty query that matches entities holding all of its targets.
    #[must_use]
    pub fn all() -> Self {
        Self::new(MatchPolicy::All)
    }

    /// Add component type `T` as a target.
    #[must_use]
    pub fn with<T: Component>(self) -> Self {
        self.with_id(T::component_type_id())
    }

    /// Add a target by identifier.
    #[must_use]
    pub fn with_id(mut self, type_id: ComponentTypeId) -> Self {
        if !self.targets.contains(&type_id) {
            self.targets.push(type_id);
        }
        self
    }

    /// Replace the match policy.
    #[must_use]
    pub fn policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The target component types, in declaration order.
    #[must_use]
    pub fn targets(&self) -> &[ComponentTypeId] {
        &self.targets
    }

    /// The match policy.
    #[must_use]
    pub fn match_policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Returns `true` if every target type is required.
    #[must_use]
    pub fn requires_all(&self) -> bool {
        self.policy == MatchPolicy::All
    }

    /// Returns `true` if no target types were declared. Such a query cannot
    /// be registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Evaluate this query against an entity's components.
    ///
    /// Cost is `O(targets)` with short-circuiting: `All` stops at the first
    /// missing type, `Any` at the first present one. An empty query never
    /// matches.
    #[must_use]
    pub fn matches(&self, container: &ComponentContainer) -> bool {
        if self.targets.is_empty() {
            return false;
        }
        match self.policy {
            MatchPolicy::All => container.has_all(&self.targets),
            MatchPolicy::Any => container.has_any(&self.targets),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    impl Component for A {
        fn type_name() -> &'static str {
            "A"
        }
    }

    struct B;
    impl Component for B {
        fn type_name() -> &'static str {
            "B"
        }
    }

    struct C;
    impl Component for C {
        fn type_name() -> &'static str {
            "C"
        }
    }

    #[test]
    fn test_default_policy_is_any() {
        assert_eq!(MatchPolicy::default(), MatchPolicy::Any);
        assert!(!SystemQuery::default().requires_all());
        assert!(SystemQuery::all().requires_all());
    }

    #[test]
    fn test_duplicate_targets_ignored() {
        let q = SystemQuery::any().with::<A>().with::<B>().with::<A>();
        assert_eq!(
            q.targets(),
            &[A::component_type_id(), B::component_type_id()]
        );
    }

    #[test]
    fn test_any_vs_all_divergence() {
        let any = SystemQuery::any().with::<A>().with::<B>();
        let all = SystemQuery::all().with::<A>().with::<B>();

        let mut c = ComponentContainer::new();
        assert!(!any.matches(&c));
        assert!(!all.matches(&c));

        c.add(A);
        assert!(any.matches(&c));
        assert!(!all.matches(&c));

        c.add(B);
        assert!(any.matches(&c));
        assert!(all.matches(&c));

        c.add(C);
        assert!(all.matches(&c), "extra components do not break ALL");
    }

    #[test]
    fn test_empty_query_never_matches() {
        let mut c = ComponentContainer::new();
        c.add(A);
        assert!(SystemQuery::any().is_empty());
        assert!(!SystemQuery::any().matches(&c));
        assert!(!SystemQuery::all().matches(&c));
    }

    #[test]
    fn test_policy_builder() {
        let q = SystemQuery::any().with::<C>().policy(MatchPolicy::All);
        assert_eq!(q.match_policy(), MatchPolicy::All);
        assert!(!q.is_empty());
    }
}
