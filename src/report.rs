//! The Report aggregate
//!
//! A report is filed by a citizen and owned by that citizen until a
//! supervisor assigns it; from then on status-mutating authority shifts to
//! the lifecycle engine acting for the assigned worker. Reports are never
//! deleted in normal flow, they are soft-retained for audit once resolved.

use crate::entity::{AggregateRoot, Entity, EntityId};
use crate::errors::{DomainError, DomainResult};
use crate::state_machine::{ensure_transition, ReportStatus};
use crate::types::{GeoLocation, PhotoRef, Priority, ProblemType};
use crate::user::UserId;
use crate::zone::ZoneId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker type for report entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportMarker;

/// Typed identifier for reports
pub type ReportId = EntityId<ReportMarker>;

/// Contact snapshot of the citizen who filed the report
///
/// Denormalized onto the report so a supervisor can reach the reporter
/// without a user lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reporter {
    /// The filing citizen's user id
    pub citizen_id: UserId,
    /// Citizen display name at filing time
    pub name: String,
    /// Citizen email at filing time
    pub email: String,
    /// Citizen phone at filing time, if provided
    pub phone: Option<String>,
}

/// Assignment metadata, set as one unit when a task is created
///
/// Modeling the three fields as a single struct makes the all-or-nothing
/// invariant unrepresentable to violate: either the report carries a full
/// assignment or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// The worker the report was assigned to
    pub assigned_to: UserId,
    /// The supervisor who made the assignment
    pub assigned_by: UserId,
    /// When the assignment happened
    pub assigned_at: DateTime<Utc>,
}

/// A citizen-filed complaint about a public-cleanliness issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    entity: Entity<ReportMarker>,
    version: u64,
    reporter: Reporter,
    problem_type: ProblemType,
    description: String,
    location: GeoLocation,
    photos: Vec<PhotoRef>,
    status: ReportStatus,
    priority: Priority,
    zone_id: ZoneId,
    assignment: Option<Assignment>,
    completed_at: Option<DateTime<Utc>>,
    evidence: Vec<PhotoRef>,
}

impl Report {
    /// Create a new pending report
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ReportId,
        reporter: Reporter,
        problem_type: ProblemType,
        description: impl Into<String>,
        location: GeoLocation,
        photos: Vec<PhotoRef>,
        priority: Priority,
        zone_id: ZoneId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "report description must not be empty".to_string(),
            ));
        }

        Ok(Self {
            entity: Entity::with_id(id, now),
            version: 0,
            reporter,
            problem_type,
            description,
            location,
            photos,
            status: ReportStatus::Pending,
            priority,
            zone_id,
            assignment: None,
            completed_at: None,
            evidence: Vec::new(),
        })
    }

    /// The citizen contact snapshot
    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    /// The filing citizen's id
    pub fn citizen_id(&self) -> UserId {
        self.reporter.citizen_id
    }

    /// Problem category
    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// Free-text description of the issue
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Where the issue is located
    pub fn location(&self) -> &GeoLocation {
        &self.location
    }

    /// Photos supplied by the citizen at filing time
    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    /// Current lifecycle status
    pub fn status(&self) -> ReportStatus {
        self.status
    }

    /// Current priority
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The zone this report falls in
    pub fn zone_id(&self) -> ZoneId {
        self.zone_id
    }

    /// Assignment metadata, present once a task exists
    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// When the backing task was completed, set on resolution
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Worker evidence photos copied over on resolution
    pub fn evidence(&self) -> &[PhotoRef] {
        &self.evidence
    }

    /// When the report was filed
    pub fn created_at(&self) -> DateTime<Utc> {
        self.entity.created_at
    }

    /// When the report was last updated
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.entity.updated_at
    }

    /// Record an assignment, driving the report to `in_progress`
    ///
    /// Fails with `AlreadyAssigned` when assignment metadata is already
    /// present, and with `InvalidTransition` when the report is not
    /// `pending`. The priority override from the assignment request
    /// replaces the citizen-suggested priority.
    pub(crate) fn assign(
        &mut self,
        assignment: Assignment,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.assignment.is_some() {
            return Err(DomainError::AlreadyAssigned {
                report_id: self.id().to_string(),
            });
        }
        ensure_transition("Report", self.status, ReportStatus::InProgress)?;

        self.assignment = Some(assignment);
        self.priority = priority;
        self.status = ReportStatus::InProgress;
        self.entity.touch(now);
        self.version += 1;
        Ok(())
    }

    /// Record resolution, copying the task's evidence onto the report
    ///
    /// Only the lifecycle engine calls this, transitively from task
    /// completion; `resolved` requires a completion timestamp by invariant.
    pub(crate) fn resolve(
        &mut self,
        evidence: Vec<PhotoRef>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        ensure_transition("Report", self.status, ReportStatus::Resolved)?;

        self.status = ReportStatus::Resolved;
        self.completed_at = Some(now);
        self.evidence = evidence;
        self.entity.touch(now);
        self.version += 1;
        Ok(())
    }
}

impl AggregateRoot for Report {
    type Id = ReportId;

    fn id(&self) -> Self::Id {
        self.entity.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
