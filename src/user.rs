//! Users and roles
//!
//! A user holds exactly one of three mutually exclusive roles. The role is
//! immutable once the user is constructed; supervisors and workers must
//! carry a zone affiliation, citizens must not.

use crate::entity::{AggregateRoot, Entity, EntityId};
use crate::errors::{DomainError, DomainResult};
use crate::types::ProblemType;
use crate::zone::ZoneId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker type for user entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserMarker;

/// Typed identifier for users
pub type UserId = EntityId<UserMarker>;

/// The three mutually exclusive actor roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Files reports about public-cleanliness issues
    Citizen,
    /// Triages reports in their zone and assigns tasks to workers
    Supervisor,
    /// Executes assigned tasks and supplies completion evidence
    Worker,
}

impl UserRole {
    /// Canonical lower-snake literal for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Supervisor => "supervisor",
            Self::Worker => "worker",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    entity: Entity<UserMarker>,
    name: String,
    email: String,
    phone: Option<String>,
    role: UserRole,
    zone_id: Option<ZoneId>,
    active: bool,
}

impl User {
    /// Create a user, validating the role/zone pairing
    ///
    /// Supervisors and workers require a zone; citizens are not zone-bound.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
        role: UserRole,
        zone_id: Option<ZoneId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        match (role, zone_id) {
            (UserRole::Supervisor | UserRole::Worker, None) => {
                return Err(DomainError::ValidationError(format!(
                    "{role} users require a zone affiliation"
                )));
            }
            (UserRole::Citizen, Some(_)) => {
                return Err(DomainError::ValidationError(
                    "citizen users do not carry a zone affiliation".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            entity: Entity::with_id(id, now),
            name: name.into(),
            email: email.into(),
            phone,
            role,
            zone_id,
            active: true,
        })
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact email
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Optional contact phone
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// The user's immutable role
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Zone affiliation, present for supervisors and workers
    pub fn zone_id(&self) -> Option<ZoneId> {
        self.zone_id
    }

    /// Whether the user can currently act on the platform
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Deactivate the user, e.g. when a worker leaves the crew
    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.active = false;
        self.entity.touch(now);
    }
}

impl AggregateRoot for User {
    type Id = UserId;

    fn id(&self) -> Self::Id {
        self.entity.id
    }

    fn version(&self) -> u64 {
        0
    }
}

/// Advisory profile of a worker, used to rank assignment candidates
///
/// The counts and rating are read-model data maintained by outer layers;
/// the resolver itself never enforces the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerProfile {
    /// The worker this profile describes
    pub worker_id: UserId,
    /// Display name
    pub name: String,
    /// Zone the worker operates in
    pub zone_id: ZoneId,
    /// Problem types the worker specializes in
    pub specialties: Vec<ProblemType>,
    /// Number of currently active (not completed) tasks
    pub active_tasks: usize,
    /// Historical rating, 0.0 to 5.0
    pub rating: f32,
}

impl WorkerProfile {
    /// Whether the worker specializes in the given problem type
    pub fn has_specialty(&self, problem_type: ProblemType) -> bool {
        self.specialties.contains(&problem_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_citizen_has_no_zone() {
        let user = User::new(
            UserId::new(),
            "María García",
            "maria@example.com",
            Some("+57 300 123 4567".to_string()),
            UserRole::Citizen,
            None,
            t0(),
        )
        .unwrap();

        assert_eq!(user.role(), UserRole::Citizen);
        assert!(user.zone_id().is_none());
        assert!(user.is_active());
    }

    #[test]
    fn test_staff_requires_zone() {
        let err = User::new(
            UserId::new(),
            "Juan Pérez",
            "juan@example.com",
            None,
            UserRole::Worker,
            None,
            t0(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));

        let err = User::new(
            UserId::new(),
            "María García",
            "maria@example.com",
            None,
            UserRole::Citizen,
            Some(ZoneId::new()),
            t0(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[test]
    fn test_deactivate() {
        let mut worker = User::new(
            UserId::new(),
            "Juan Pérez",
            "juan@example.com",
            None,
            UserRole::Worker,
            Some(ZoneId::new()),
            t0(),
        )
        .unwrap();

        worker.deactivate(t0() + chrono::Duration::days(1));
        assert!(!worker.is_active());
    }

    #[test]
    fn test_worker_profile_specialty() {
        let profile = WorkerProfile {
            worker_id: UserId::new(),
            name: "Juan Pérez".to_string(),
            zone_id: ZoneId::new(),
            specialties: vec![ProblemType::Sweeping, ProblemType::SolidWaste],
            active_tasks: 2,
            rating: 4.8,
        };

        assert!(profile.has_specialty(ProblemType::Sweeping));
        assert!(!profile.has_specialty(ProblemType::Weeds));
    }
}
