//! Assignment: converting a pending report into a task
//!
//! The resolver checks the assignment preconditions, creates exactly one
//! task per report, and drives the report to `in_progress` as one unit of
//! work, compensated on partial failure. Reassignment of an already
//! assigned report is deliberately rejected to prevent duplicate tasks;
//! undoing an assignment is an administrative action outside this core.

use crate::entity::AggregateRoot;
use crate::errors::{DomainError, DomainResult};
use crate::events::{EventPublisher, TaskAssigned};
use crate::infrastructure::{Clock, ReportStore, TaskStore, UserDirectory};
use crate::report::{Assignment, Report, ReportId};
use crate::task::{Task, TaskId};
use crate::types::{Priority, ProblemType};
use crate::user::{UserId, UserRole, WorkerProfile};
use crate::visibility::Identity;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A supervisor's request to assign a report to a worker
#[derive(Debug, Clone)]
pub struct AssignmentRequest {
    /// The pending report to assign
    pub report_id: ReportId,
    /// The worker to assign it to
    pub worker_id: UserId,
    /// Priority override for the task (and the report)
    pub priority: Priority,
    /// Optional instructions for the worker
    pub instructions: Option<String>,
}

/// The result of a successful assignment
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    /// The report, now `in_progress` with assignment metadata set
    pub report: Report,
    /// The newly created task
    pub task: Task,
}

/// Matches pending reports to workers, producing tasks
pub struct AssignmentResolver {
    reports: Arc<dyn ReportStore>,
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
    publisher: Arc<dyn EventPublisher>,
}

impl AssignmentResolver {
    /// Wire a resolver over its collaborators
    pub fn new(
        reports: Arc<dyn ReportStore>,
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            reports,
            tasks,
            users,
            clock,
            publisher,
        }
    }

    /// Assign a pending report to a worker, creating its task
    ///
    /// Preconditions, checked in order: the acting identity is a
    /// supervisor; the report exists, is `pending`, and carries no
    /// assignment (`AlreadyAssigned` otherwise, existing task untouched);
    /// the worker exists, holds the `worker` role, and is active
    /// (`InvalidWorker`); the worker's zone matches the report's zone
    /// (`ZoneMismatch`). On success the task creation, the report's
    /// assignment metadata, and its `in_progress` status land as one unit
    /// of work.
    pub fn assign(
        &self,
        identity: &Identity,
        request: AssignmentRequest,
    ) -> DomainResult<AssignmentOutcome> {
        if identity.role != UserRole::Supervisor {
            return Err(DomainError::Unauthorized(format!(
                "only supervisors may assign reports, acting role is {}",
                identity.role
            )));
        }

        let report = self.reports.get(request.report_id)?;
        if report.assignment().is_some() || self.tasks.find_by_report(report.id()).is_some() {
            debug!(report_id = %report.id(), "rejecting duplicate assignment");
            return Err(DomainError::AlreadyAssigned {
                report_id: report.id().to_string(),
            });
        }

        let worker = self.users.get(request.worker_id).map_err(|err| {
            if err.is_not_found() {
                DomainError::InvalidWorker {
                    reason: format!("no such user: {}", request.worker_id),
                }
            } else {
                err
            }
        })?;
        if worker.role() != UserRole::Worker {
            return Err(DomainError::InvalidWorker {
                reason: format!("user {} has role {}", worker.id(), worker.role()),
            });
        }
        if !worker.is_active() {
            return Err(DomainError::InvalidWorker {
                reason: format!("worker {} is inactive", worker.id()),
            });
        }
        if worker.zone_id() != Some(report.zone_id()) {
            return Err(DomainError::ZoneMismatch {
                report_zone: report.zone_id().to_string(),
                worker_zone: worker
                    .zone_id()
                    .map_or_else(|| "none".to_string(), |z| z.to_string()),
            });
        }

        let supervisor = self.users.get(identity.user_id)?;
        let now = self.clock.now();

        let task = Task::from_report(
            TaskId::new(),
            &report,
            &worker,
            &supervisor,
            request.priority,
            request.instructions,
            now,
        );
        let task = self.tasks.create(task)?;

        let mut report = report;
        let assigned = report
            .assign(
                Assignment {
                    assigned_to: worker.id(),
                    assigned_by: supervisor.id(),
                    assigned_at: now,
                },
                request.priority,
                now,
            )
            .and_then(|()| self.reports.update(report.clone()));

        let report = match assigned {
            Ok(report) => report,
            Err(err) => {
                // the task must not outlive a failed report write
                if let Err(cleanup) = self.tasks.delete(task.id()) {
                    warn!(task_id = %task.id(), %cleanup, "failed to compensate task creation");
                }
                return Err(err);
            }
        };

        info!(
            report_id = %report.id(),
            task_id = %task.id(),
            worker_id = %worker.id(),
            "report assigned"
        );
        if let Err(err) = self.publisher.publish(vec![Box::new(TaskAssigned {
            task_id: task.id(),
            report_id: report.id(),
            worker_id: worker.id(),
            supervisor_id: supervisor.id(),
            occurred_at: now,
        })]) {
            warn!(%err, "event publication failed");
        }

        Ok(AssignmentOutcome { report, task })
    }
}

/// Rank assignment candidates for the triage UI
///
/// Advisory only — the resolver accepts any valid worker regardless of
/// ranking. Order: specialty match with the report's problem type first,
/// then fewer currently active tasks, then higher historical rating.
pub fn rank_candidates(
    problem_type: ProblemType,
    candidates: &[WorkerProfile],
) -> Vec<&WorkerProfile> {
    let mut ranked: Vec<&WorkerProfile> = candidates.iter().collect();
    ranked.sort_by_key(|profile| {
        (
            Reverse(profile.has_specialty(problem_type)),
            profile.active_tasks,
            Reverse(ordered::OrderedRating(profile.rating)),
        )
    });
    ranked
}

// total order over f32 ratings so they can key a sort
mod ordered {
    #[derive(PartialEq)]
    pub struct OrderedRating(pub f32);

    impl Eq for OrderedRating {}

    impl PartialOrd for OrderedRating {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for OrderedRating {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.total_cmp(&other.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserId;
    use crate::zone::ZoneId;

    fn profile(
        name: &str,
        specialties: Vec<ProblemType>,
        active_tasks: usize,
        rating: f32,
    ) -> WorkerProfile {
        WorkerProfile {
            worker_id: UserId::new(),
            name: name.to_string(),
            zone_id: ZoneId::new(),
            specialties,
            active_tasks,
            rating,
        }
    }

    #[test]
    fn test_specialists_rank_first() {
        let candidates = vec![
            profile("generalist", vec![ProblemType::Weeds], 0, 5.0),
            profile("specialist", vec![ProblemType::Sweeping], 3, 4.0),
        ];

        let ranked = rank_candidates(ProblemType::Sweeping, &candidates);
        assert_eq!(ranked[0].name, "specialist");
        assert_eq!(ranked[1].name, "generalist");
    }

    #[test]
    fn test_fewer_active_tasks_break_specialty_ties() {
        let candidates = vec![
            profile("busy", vec![ProblemType::SolidWaste], 3, 4.9),
            profile("free", vec![ProblemType::SolidWaste], 1, 4.6),
        ];

        let ranked = rank_candidates(ProblemType::SolidWaste, &candidates);
        assert_eq!(ranked[0].name, "free");
    }

    #[test]
    fn test_rating_breaks_remaining_ties() {
        let candidates = vec![
            profile("good", vec![], 2, 4.6),
            profile("better", vec![], 2, 4.9),
        ];

        let ranked = rank_candidates(ProblemType::Weeds, &candidates);
        assert_eq!(ranked[0].name, "better");
    }

    // resolver behavior is covered end-to-end in tests/lifecycle_flow.rs
}
