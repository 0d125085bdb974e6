//! Zones: geographic catchment areas with one responsible supervisor
//!
//! Zone boundaries are opaque display data. The core checks vertex count at
//! construction and nothing else; point-in-polygon and other geometry are
//! explicitly out of scope.

use crate::entity::{AggregateRoot, Entity, EntityId};
use crate::errors::{DomainError, DomainResult};
use crate::types::GeoPoint;
use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker type for zone entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneMarker;

/// Typed identifier for zones
pub type ZoneId = EntityId<ZoneMarker>;

/// A named geographic catchment with one assigned supervisor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    entity: Entity<ZoneMarker>,
    name: String,
    supervisor_id: UserId,
    supervisor_name: String,
    boundaries: Vec<GeoPoint>,
}

impl Zone {
    /// Create a zone, requiring a closed boundary of at least 3 vertices
    pub fn new(
        id: ZoneId,
        name: impl Into<String>,
        supervisor_id: UserId,
        supervisor_name: impl Into<String>,
        boundaries: Vec<GeoPoint>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if boundaries.len() < 3 {
            return Err(DomainError::ValidationError(format!(
                "zone boundary needs at least 3 vertices, got {}",
                boundaries.len()
            )));
        }

        Ok(Self {
            entity: Entity::with_id(id, now),
            name: name.into(),
            supervisor_id,
            supervisor_name: supervisor_name.into(),
            boundaries,
        })
    }

    /// Display name, e.g. "Zona Centro"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The supervisor responsible for this zone
    pub fn supervisor_id(&self) -> UserId {
        self.supervisor_id
    }

    /// Supervisor display name snapshot
    pub fn supervisor_name(&self) -> &str {
        &self.supervisor_name
    }

    /// Boundary polygon vertices, for display only
    pub fn boundaries(&self) -> &[GeoPoint] {
        &self.boundaries
    }
}

impl AggregateRoot for Zone {
    type Id = ZoneId;

    fn id(&self) -> Self::Id {
        self.entity.id
    }

    fn version(&self) -> u64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()
    }

    fn square() -> Vec<GeoPoint> {
        vec![
            GeoPoint {
                latitude: 4.6097,
                longitude: -74.0817,
            },
            GeoPoint {
                latitude: 4.6120,
                longitude: -74.0790,
            },
            GeoPoint {
                latitude: 4.6100,
                longitude: -74.0750,
            },
            GeoPoint {
                latitude: 4.6070,
                longitude: -74.0780,
            },
        ]
    }

    #[test]
    fn test_zone_creation() {
        let zone = Zone::new(
            ZoneId::new(),
            "Zona Centro",
            UserId::new(),
            "Carlos Rodríguez",
            square(),
            t0(),
        )
        .unwrap();

        assert_eq!(zone.name(), "Zona Centro");
        assert_eq!(zone.boundaries().len(), 4);
    }

    #[test]
    fn test_boundary_needs_three_vertices() {
        let err = Zone::new(
            ZoneId::new(),
            "Degenerate",
            UserId::new(),
            "Ana López",
            square().into_iter().take(2).collect(),
            t0(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
