//! Static mapping from push events to cache invalidations.

use std::collections::HashMap;

use super::PushEvent;

/// What an event invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invalidation {
    /// Mark the aggregate statistics dirty.
    pub stats: bool,
    /// Re-synchronize the visible page.
    pub refetch: bool,
}

impl Invalidation {
    pub fn everything() -> Self {
        Self {
            stats: true,
            refetch: true,
        }
    }

    pub fn stats_only() -> Self {
        Self {
            stats: true,
            refetch: false,
        }
    }

    pub fn refetch_only() -> Self {
        Self {
            stats: false,
            refetch: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.stats && !self.refetch
    }

    /// Union of two invalidations.
    pub fn merge(self, other: Invalidation) -> Self {
        Self {
            stats: self.stats || other.stats,
            refetch: self.refetch || other.refetch,
        }
    }
}

/// Which resource a subscription cares about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every event matching a rule applies.
    #[default]
    Any,
    /// Scoped rules only apply when `payload[key] == value`.
    Keyed { key: String, value: String },
}

impl Scope {
    /// Scope to one resource, e.g. `Scope::resource("product_slug", "serum-b")`.
    pub fn resource(key: impl Into<String>, value: impl Into<String>) -> Self {
        Scope::Keyed {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rule {
    invalidation: Invalidation,
    scoped: bool,
}

/// Event name → invalidation table of one screen.
///
/// Unscoped rules apply to every event of that name. Scoped rules apply only
/// when the event's payload names the subscription's resource; other events
/// are ignored, not queued.
///
/// ## Example
///
/// ```
/// use resource_browser::bus::{Invalidation, InvalidationRules, PushEvent, Scope};
/// use serde_json::json;
///
/// let rules = InvalidationRules::new()
///     .on("order:created", Invalidation::everything())
///     .on_scoped("review:created", Invalidation::refetch_only());
///
/// let scope = Scope::resource("product_slug", "serum-b");
/// let other = PushEvent::new("e1", "review:created", json!({ "product_slug": "serum-a" }));
/// assert_eq!(rules.resolve(&other, &scope), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationRules {
    rules: HashMap<String, Rule>,
}

impl InvalidationRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules of the admin console: order and generic resource lifecycle
    /// events refresh everything; review events are scoped to the mounted
    /// resource.
    pub fn admin_defaults() -> Self {
        Self::new()
            .on("order:created", Invalidation::everything())
            .on("order:status:updated", Invalidation::everything())
            .on("resource:created", Invalidation::everything())
            .on("resource:status:updated", Invalidation::everything())
            .on("dashboard:refresh", Invalidation::everything())
            .on_scoped("review:created", Invalidation::everything())
            .on_scoped("review:reply:added", Invalidation::refetch_only())
    }

    pub fn on(mut self, event: &str, invalidation: Invalidation) -> Self {
        self.rules.insert(
            event.to_string(),
            Rule {
                invalidation,
                scoped: false,
            },
        );
        self
    }

    pub fn on_scoped(mut self, event: &str, invalidation: Invalidation) -> Self {
        self.rules.insert(
            event.to_string(),
            Rule {
                invalidation,
                scoped: true,
            },
        );
        self
    }

    /// The invalidation `event` causes for a subscription with `scope`, if any.
    pub fn resolve(&self, event: &PushEvent, scope: &Scope) -> Option<Invalidation> {
        let rule = self.rules.get(&event.name)?;
        if rule.invalidation.is_empty() {
            return None;
        }
        if rule.scoped {
            if let Scope::Keyed { key, value } = scope {
                if event.payload_field(key).as_deref() != Some(value.as_str()) {
                    return None;
                }
            }
        }
        Some(rule.invalidation)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
