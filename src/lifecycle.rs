//! Lifecycle engine: submission, start, and completion
//!
//! The engine owns every status-mutating operation except assignment,
//! which lives in [`crate::assignment`]. Completion is the one dual-entity
//! write in the core: the task completes and the originating report
//! resolves as a single unit of work, with the task write rolled back when
//! the report write fails. Two workers racing the same completion are
//! serialized by the store's version check; the loser re-reads and gets
//! `AlreadyCompleted` when the winner got there first.

use crate::errors::{DomainError, DomainResult};
use crate::events::{
    EventPublisher, ReportResolved, ReportSubmitted, TaskCompleted, TaskStarted,
};
use crate::evidence::{EvidencePolicy, EvidenceSubmission};
use crate::infrastructure::{Clock, ReportStore, TaskStore, UserDirectory, ZoneDirectory};
use crate::report::{Report, ReportId, Reporter};
use crate::state_machine::TaskStatus;
use crate::task::{Task, TaskId};
use crate::types::{GeoLocation, PhotoRef, Priority, ProblemType};
use crate::user::UserRole;
use crate::visibility::Identity;
use crate::zone::ZoneId;
use crate::entity::AggregateRoot;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for filing a new report
#[derive(Debug, Clone)]
pub struct NewReport {
    /// Problem category
    pub problem_type: ProblemType,
    /// Free-text description, must not be blank
    pub description: String,
    /// Where the issue is
    pub location: GeoLocation,
    /// Photos supplied by the citizen, may be empty
    pub photos: Vec<PhotoRef>,
    /// Citizen-suggested priority
    pub priority: Priority,
    /// Zone the issue falls in, must reference an existing zone
    pub zone_id: ZoneId,
}

/// The pair of aggregates committed by a successful completion
#[derive(Debug, Clone)]
pub struct TaskCompletion {
    /// The completed task
    pub task: Task,
    /// The originating report, now resolved with the task's evidence
    pub report: Report,
}

/// Drives reports and tasks through their lifecycles
pub struct LifecycleEngine {
    reports: Arc<dyn ReportStore>,
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserDirectory>,
    zones: Arc<dyn ZoneDirectory>,
    clock: Arc<dyn Clock>,
    publisher: Arc<dyn EventPublisher>,
    evidence_policy: Arc<dyn EvidencePolicy>,
}

impl LifecycleEngine {
    /// Wire an engine over its collaborators
    pub fn new(
        reports: Arc<dyn ReportStore>,
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn UserDirectory>,
        zones: Arc<dyn ZoneDirectory>,
        clock: Arc<dyn Clock>,
        publisher: Arc<dyn EventPublisher>,
        evidence_policy: Arc<dyn EvidencePolicy>,
    ) -> Self {
        Self {
            reports,
            tasks,
            users,
            zones,
            clock,
            publisher,
            evidence_policy,
        }
    }

    /// File a new report on behalf of the acting citizen
    ///
    /// The reporter contact snapshot is taken from the user directory at
    /// filing time; the referenced zone must exist.
    pub fn submit_report(&self, identity: &Identity, input: NewReport) -> DomainResult<Report> {
        if identity.role != UserRole::Citizen {
            return Err(DomainError::Unauthorized(format!(
                "only citizens may file reports, acting role is {}",
                identity.role
            )));
        }
        self.zones.get(input.zone_id)?;
        let citizen = self.users.get(identity.user_id)?;

        let now = self.clock.now();
        let report = Report::new(
            ReportId::new(),
            Reporter {
                citizen_id: citizen.id(),
                name: citizen.name().to_string(),
                email: citizen.email().to_string(),
                phone: citizen.phone().map(str::to_string),
            },
            input.problem_type,
            input.description,
            input.location,
            input.photos,
            input.priority,
            input.zone_id,
            now,
        )?;
        let report = self.reports.create(report)?;

        info!(report_id = %report.id(), zone_id = %report.zone_id(), "report submitted");
        self.publish(vec![Box::new(ReportSubmitted {
            report_id: report.id(),
            citizen_id: report.citizen_id(),
            zone_id: report.zone_id(),
            occurred_at: now,
        })]);

        Ok(report)
    }

    /// Mark a task started by its assigned worker
    pub fn start_task(&self, identity: &Identity, task_id: TaskId) -> DomainResult<Task> {
        let mut task = self.tasks.get(task_id)?;
        self.ensure_assigned_worker(identity, &task)?;

        let now = self.clock.now();
        task.start(now)?;
        let task = self.tasks.update(task)?;

        info!(task_id = %task.id(), worker_id = %task.worker_id(), "task started");
        self.publish(vec![Box::new(TaskStarted {
            task_id: task.id(),
            worker_id: task.worker_id(),
            occurred_at: now,
        })]);

        Ok(task)
    }

    /// Complete a task and resolve its report, as one unit of work
    ///
    /// The evidence policy gates the submission before any state changes.
    /// When the task write loses a concurrent race, the task is re-read:
    /// if the winner already completed it the caller gets
    /// `AlreadyCompleted`, otherwise the version conflict propagates.
    /// When the report write fails after the task write committed, the
    /// task is restored to its prior snapshot so no completed task points
    /// at an unresolved report.
    pub fn complete_task(
        &self,
        identity: &Identity,
        task_id: TaskId,
        submission: EvidenceSubmission,
    ) -> DomainResult<TaskCompletion> {
        let mut task = self.tasks.get(task_id)?;
        self.ensure_assigned_worker(identity, &task)?;
        self.evidence_policy.validate(&submission, &task)?;

        let snapshot = task.clone();
        let now = self.clock.now();
        task.complete(submission.photos.clone(), submission.notes.clone(), now)?;

        let task = match self.tasks.update(task) {
            Ok(task) => task,
            Err(err) if err.is_conflict() => {
                let current = self.tasks.get(task_id)?;
                if current.status() == TaskStatus::Completed {
                    return Err(DomainError::AlreadyCompleted {
                        task_id: task_id.to_string(),
                    });
                }
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let mut report = self.reports.get(task.report_id())?;
        let resolved = report
            .resolve(task.evidence().to_vec(), now)
            .and_then(|()| self.reports.update(report.clone()));

        let report = match resolved {
            Ok(report) => report,
            Err(err) => {
                // the completed task must not outlive a failed report write
                if let Err(rollback) = self.tasks.restore(snapshot) {
                    warn!(task_id = %task.id(), %rollback, "failed to roll back task completion");
                }
                return Err(err);
            }
        };

        info!(
            task_id = %task.id(),
            report_id = %report.id(),
            evidence = task.evidence().len(),
            "task completed, report resolved"
        );
        self.publish(vec![
            Box::new(TaskCompleted {
                task_id: task.id(),
                report_id: report.id(),
                evidence_count: task.evidence().len(),
                occurred_at: now,
            }),
            Box::new(ReportResolved {
                report_id: report.id(),
                task_id: task.id(),
                occurred_at: now,
            }),
        ]);

        Ok(TaskCompletion { task, report })
    }

    fn ensure_assigned_worker(&self, identity: &Identity, task: &Task) -> DomainResult<()> {
        if identity.role != UserRole::Worker || identity.user_id != task.worker_id() {
            return Err(DomainError::Unauthorized(format!(
                "task {} is assigned to worker {}",
                task.id(),
                task.worker_id()
            )));
        }
        Ok(())
    }

    // publication happens after the state writes; a failing publisher
    // never rolls a transition back
    fn publish(&self, events: Vec<Box<dyn crate::events::DomainEvent>>) {
        if let Err(err) = self.publisher.publish(events) {
            warn!(%err, "event publication failed");
        }
    }
}
