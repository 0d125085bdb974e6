//! Zone directory seam
//!
//! Backs the "zone must match an existing Zone" invariant at report
//! submission and the zone-match check at assignment.

use crate::entity::AggregateRoot;
use crate::errors::{DomainError, DomainResult};
use crate::zone::{Zone, ZoneId};
use indexmap::IndexMap;
use std::sync::RwLock;

/// Looks up zones by id
pub trait ZoneDirectory: Send + Sync {
    /// Fetch a zone by id
    fn get(&self, id: ZoneId) -> DomainResult<Zone>;

    /// All zones, in insertion order
    fn list(&self) -> Vec<Zone>;
}

/// In-memory zone directory for tests
#[derive(Default)]
pub struct InMemoryZoneDirectory {
    zones: RwLock<IndexMap<ZoneId, Zone>>,
}

impl InMemoryZoneDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone
    pub fn insert(&self, zone: Zone) {
        self.zones
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(zone.id(), zone);
    }
}

impl ZoneDirectory for InMemoryZoneDirectory {
    fn get(&self, id: ZoneId) -> DomainResult<Zone> {
        self.zones
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound {
                entity: "Zone",
                id: id.to_string(),
            })
    }

    fn list(&self) -> Vec<Zone> {
        self.zones
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect()
    }
}
