//! The Task aggregate
//!
//! A task is the work order created when a supervisor assigns a report to a
//! worker. It is only ever created by the assignment resolver, never
//! directly by a worker or citizen, and snapshots the report's type,
//! description, and location at assignment time. Status is monotonic:
//! `completed` is terminal.

use crate::entity::{AggregateRoot, Entity, EntityId};
use crate::errors::{DomainError, DomainResult};
use crate::report::{Report, ReportId};
use crate::state_machine::{ensure_transition, TaskStatus};
use crate::types::{GeoLocation, PhotoRef, Priority, ProblemType};
use crate::user::{User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker type for task entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskMarker;

/// Typed identifier for tasks
pub type TaskId = EntityId<TaskMarker>;

/// A work order derived from a report and assigned to a worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    entity: Entity<TaskMarker>,
    version: u64,
    report_id: ReportId,
    worker_id: UserId,
    worker_name: String,
    supervisor_id: UserId,
    supervisor_name: String,
    title: String,
    description: String,
    problem_type: ProblemType,
    location: GeoLocation,
    status: TaskStatus,
    priority: Priority,
    assigned_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    evidence: Vec<PhotoRef>,
    completion_notes: Option<String>,
    instructions: Option<String>,
}

impl Task {
    /// Create a task from a report at assignment time
    ///
    /// Snapshots the report's type, description, and location as of this
    /// instant; later edits to the report do not flow through.
    pub(crate) fn from_report(
        id: TaskId,
        report: &Report,
        worker: &User,
        supervisor: &User,
        priority: Priority,
        instructions: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let location = report.location().clone();
        let title = format!("{} at {}", report.problem_type().label(), location.address);

        Self {
            entity: Entity::with_id(id, now),
            version: 0,
            report_id: report.id(),
            worker_id: worker.id(),
            worker_name: worker.name().to_string(),
            supervisor_id: supervisor.id(),
            supervisor_name: supervisor.name().to_string(),
            title,
            description: report.description().to_string(),
            problem_type: report.problem_type(),
            location,
            status: TaskStatus::Pending,
            priority,
            assigned_at: now,
            started_at: None,
            completed_at: None,
            evidence: Vec::new(),
            completion_notes: None,
            instructions,
        }
    }

    /// The report this task was created from
    pub fn report_id(&self) -> ReportId {
        self.report_id
    }

    /// The assigned worker
    pub fn worker_id(&self) -> UserId {
        self.worker_id
    }

    /// Worker display name snapshot
    pub fn worker_name(&self) -> &str {
        &self.worker_name
    }

    /// The supervisor who created the task
    pub fn supervisor_id(&self) -> UserId {
        self.supervisor_id
    }

    /// Supervisor display name snapshot
    pub fn supervisor_name(&self) -> &str {
        &self.supervisor_name
    }

    /// Short title derived from the report
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Description snapshot from the report
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Problem category snapshot from the report
    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// Location snapshot from the report
    pub fn location(&self) -> &GeoLocation {
        &self.location
    }

    /// Current lifecycle status
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Task priority as set by the supervisor
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// When the task was assigned
    pub fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// When the worker started, if they have
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the task was completed, if it has been
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Evidence photos supplied at completion
    pub fn evidence(&self) -> &[PhotoRef] {
        &self.evidence
    }

    /// Worker's free-text completion notes
    pub fn completion_notes(&self) -> Option<&str> {
        self.completion_notes.as_deref()
    }

    /// Supervisor instructions attached at assignment time
    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    /// Mark the task started
    ///
    /// Requires the task to be `pending`; sets `started_at`.
    pub(crate) fn start(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        ensure_transition("Task", self.status, TaskStatus::InProgress)?;

        self.status = TaskStatus::InProgress;
        self.started_at = Some(now);
        self.entity.touch(now);
        self.version += 1;
        Ok(())
    }

    /// Mark the task completed with evidence
    ///
    /// An already-completed task fails with `AlreadyCompleted`; any other
    /// state but `in_progress` fails with `InvalidTransition`. The ≥1
    /// evidence photo invariant holds here too, independent of whatever
    /// policy vetted the submission upstream.
    pub(crate) fn complete(
        &mut self,
        evidence: Vec<PhotoRef>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.status == TaskStatus::Completed {
            return Err(DomainError::AlreadyCompleted {
                task_id: self.id().to_string(),
            });
        }
        ensure_transition("Task", self.status, TaskStatus::Completed)?;
        if evidence.is_empty() {
            return Err(DomainError::InsufficientEvidence {
                required: 1,
                supplied: 0,
            });
        }

        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        self.evidence = evidence;
        self.completion_notes = notes;
        self.entity.touch(now);
        self.version += 1;
        Ok(())
    }
}

impl AggregateRoot for Task {
    type Id = TaskId;

    fn id(&self) -> Self::Id {
        self.entity.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
