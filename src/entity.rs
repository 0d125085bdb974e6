//! Entity types with identity and lifecycle
//!
//! Entities carry a phantom-typed ID so that Report, Task, Zone, and User
//! identifiers cannot be mixed up at compile time. Timestamps are always
//! supplied by the caller (ultimately by a [`Clock`](crate::Clock)
//! implementation) so that every `*_at` field is deterministic under test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A generic entity with a typed ID and creation/update timestamps
///
/// The embedded timestamps come from the injected clock, never from the
/// ambient system time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Entity<T> {
    /// The unique identifier for this entity
    pub id: EntityId<T>,
    /// When this entity was created
    pub created_at: DateTime<Utc>,
    /// When this entity was last updated
    pub updated_at: DateTime<Utc>,
}

impl<T> Entity<T> {
    /// Create an entity with a specific ID at the given instant
    pub fn with_id(id: EntityId<T>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create an entity with a generated ID at the given instant
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_id(EntityId::new(), now)
    }

    /// Record a mutation time on the entity
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// A typed entity ID using phantom types for type safety
///
/// IDs are globally unique and persistent. The phantom type parameter keeps
/// IDs for different entity kinds apart at compile time:
///
/// ```rust
/// use cleanops_domain::{ReportId, TaskId};
///
/// let report_id = ReportId::new();
/// let task_id = TaskId::new();
/// // let _: ReportId = task_id; // does not compile
/// # let _ = (report_id, task_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create an entity ID from an existing UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

impl<T> From<&EntityId<T>> for Uuid {
    fn from(id: &EntityId<T>) -> Self {
        id.id
    }
}

/// Marker trait for aggregate roots
///
/// All status mutations go through the root's methods, and every mutation
/// bumps the version counter the stores use for their optimistic
/// concurrency check.
pub trait AggregateRoot {
    /// The identifier type for this aggregate
    type Id;

    /// Get the aggregate's unique identifier
    fn id(&self) -> Self::Id;

    /// Get the current version, incremented on every mutation
    fn version(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Widget;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_entity_creation_and_touch() {
        let mut entity = Entity::<Widget>::new(t0());
        assert_eq!(entity.created_at, entity.updated_at);

        let later = t0() + chrono::Duration::minutes(5);
        entity.touch(later);
        assert_eq!(entity.created_at, t0());
        assert_eq!(entity.updated_at, later);
    }

    #[test]
    fn test_entity_id_uniqueness_and_roundtrip() {
        let a = EntityId::<Widget>::new();
        let b = EntityId::<Widget>::new();
        assert_ne!(a, b);

        let uuid = *a.as_uuid();
        let restored = EntityId::<Widget>::from_uuid(uuid);
        assert_eq!(a, restored);
        assert_eq!(a.to_string(), uuid.to_string());
    }

    #[test]
    fn test_entity_id_serde() {
        let id = EntityId::<Widget>::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: EntityId<Widget> = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
