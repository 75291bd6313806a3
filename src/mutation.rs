//! Mutation bookkeeping: in-flight tracking and delete confirmation.
//!
//! Mutations are never applied optimistically. The browser waits for the
//! server to confirm, then re-synchronizes the page from the server.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::BrowserError;
use crate::resource::ResourceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation for the duration of its request.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation {
    pub kind: MutationKind,
    pub target: Option<ResourceId>,
    pub payload: Option<Value>,
}

impl PendingMutation {
    pub fn create(payload: Value) -> Self {
        Self {
            kind: MutationKind::Create,
            target: None,
            payload: Some(payload),
        }
    }

    pub fn update(id: ResourceId, payload: Value) -> Self {
        Self {
            kind: MutationKind::Update,
            target: Some(id),
            payload: Some(payload),
        }
    }

    pub fn delete(id: ResourceId) -> Self {
        Self {
            kind: MutationKind::Delete,
            target: Some(id),
            payload: None,
        }
    }

    /// Identity of the logical resource this mutation touches.
    ///
    /// Creates have no id yet, so two creates collide when their payloads
    /// are identical (a double-submitted form).
    fn logical_key(&self) -> String {
        match (&self.target, &self.payload) {
            (Some(id), _) => format!("id:{}", id),
            (None, Some(payload)) => format!("new:{}", payload),
            (None, None) => "new:".to_string(),
        }
    }

    fn describe_target(&self) -> String {
        match &self.target {
            Some(id) => id.to_string(),
            None => "new resource".to_string(),
        }
    }
}

/// Handle of a registered in-flight mutation.
#[derive(Debug, PartialEq, Eq)]
pub struct MutationTicket(u64);

/// The set of mutations currently in flight for one browser.
#[derive(Debug, Default)]
pub struct MutationTracker {
    next: u64,
    in_flight: BTreeMap<u64, PendingMutation>,
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mutation, rejecting it if one for the same logical
    /// resource is already in flight.
    pub fn begin(&mut self, mutation: PendingMutation) -> Result<MutationTicket, BrowserError> {
        let key = mutation.logical_key();
        if self.in_flight.values().any(|m| m.logical_key() == key) {
            return Err(BrowserError::DuplicateMutation {
                kind: mutation.kind.to_string(),
                target: mutation.describe_target(),
            });
        }
        self.next += 1;
        self.in_flight.insert(self.next, mutation);
        Ok(MutationTicket(self.next))
    }

    /// Discard a finished mutation, whatever its outcome.
    pub fn finish(&mut self, ticket: MutationTicket) -> Option<PendingMutation> {
        self.in_flight.remove(&ticket.0)
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn is_busy(&self, id: &ResourceId) -> bool {
        self.in_flight
            .values()
            .any(|m| m.target.as_ref() == Some(id))
    }

    pub fn clear(&mut self) {
        self.in_flight.clear();
    }
}

/// A delete the user has asked for but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a delete only runs once confirmed"]
pub struct DeleteIntent {
    id: ResourceId,
}

impl DeleteIntent {
    pub fn new(id: impl Into<ResourceId>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// The user accepted the confirmation dialog.
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// Proof that the user confirmed a delete. Only obtainable from [`DeleteIntent::confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: ResourceId,
}

impl ConfirmedDelete {
    pub fn id(&self) -> &ResourceId {
        &self.id
    }
}
