//! Role-scoped visibility
//!
//! Projects the full report/task collections down to what an authenticated
//! identity may see. The identity is an explicit parameter on every call,
//! never ambient session state. Statistics are computed from the
//! already-filtered set so global counts can never leak through a
//! dashboard counter.

use crate::report::Report;
use crate::state_machine::{ReportStatus, TaskStatus};
use crate::task::Task;
use crate::user::{User, UserId, UserRole};
use crate::zone::ZoneId;
use serde::{Deserialize, Serialize};

/// The authenticated actor: id, role, and zone affiliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The actor's user id
    pub user_id: UserId,
    /// The actor's role
    pub role: UserRole,
    /// Zone affiliation, present for supervisors and workers
    pub zone_id: Option<ZoneId>,
}

impl Identity {
    /// Build an identity from a user record
    pub fn from_user(user: &User) -> Self {
        use crate::entity::AggregateRoot;
        Self {
            user_id: user.id(),
            role: user.role(),
            zone_id: user.zone_id(),
        }
    }
}

/// What slice of the report collection an identity may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    /// Only reports filed by this citizen
    Own(UserId),
    /// All reports in this zone
    Zone(ZoneId),
    /// No report visibility (workers have no direct report surface)
    Nothing,
}

impl ReportScope {
    /// Whether the scope admits this report
    pub fn permits(&self, report: &Report) -> bool {
        match self {
            Self::Own(citizen_id) => report.citizen_id() == *citizen_id,
            Self::Zone(zone_id) => report.zone_id() == *zone_id,
            Self::Nothing => false,
        }
    }
}

/// What slice of the task collection an identity may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Only tasks assigned to this worker
    AssignedTo(UserId),
    /// Only tasks created by this supervisor
    SupervisedBy(UserId),
    /// No task visibility (citizens never see task entities)
    Nothing,
}

impl TaskScope {
    /// Whether the scope admits this task
    pub fn permits(&self, task: &Task) -> bool {
        match self {
            Self::AssignedTo(worker_id) => task.worker_id() == *worker_id,
            Self::SupervisedBy(supervisor_id) => task.supervisor_id() == *supervisor_id,
            Self::Nothing => false,
        }
    }
}

/// The report scope for an identity
///
/// Citizens see their own reports; supervisors see their zone; workers
/// have no direct report surface, they work from tasks.
pub fn report_scope(identity: &Identity) -> ReportScope {
    match identity.role {
        UserRole::Citizen => ReportScope::Own(identity.user_id),
        UserRole::Supervisor => identity
            .zone_id
            .map_or(ReportScope::Nothing, ReportScope::Zone),
        UserRole::Worker => ReportScope::Nothing,
    }
}

/// The task scope for an identity
///
/// Workers see tasks assigned to them, supervisors tasks they created,
/// citizens none.
pub fn task_scope(identity: &Identity) -> TaskScope {
    match identity.role {
        UserRole::Citizen => TaskScope::Nothing,
        UserRole::Supervisor => TaskScope::SupervisedBy(identity.user_id),
        UserRole::Worker => TaskScope::AssignedTo(identity.user_id),
    }
}

/// Filter reports down to what the identity may see
pub fn visible_reports<'a>(
    identity: &Identity,
    reports: impl IntoIterator<Item = &'a Report>,
) -> Vec<&'a Report> {
    let scope = report_scope(identity);
    reports.into_iter().filter(|r| scope.permits(r)).collect()
}

/// Filter tasks down to what the identity may see
pub fn visible_tasks<'a>(
    identity: &Identity,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> Vec<&'a Task> {
    let scope = task_scope(identity);
    tasks.into_iter().filter(|t| scope.permits(t)).collect()
}

/// Per-status report counters for a dashboard
///
/// Always construct from an already-filtered slice; the summarize call
/// itself applies no scoping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatistics {
    /// Reports awaiting triage
    pub pending: usize,
    /// Reports with an active task
    pub in_progress: usize,
    /// Reports resolved with evidence
    pub resolved: usize,
}

impl ReportStatistics {
    /// Count reports per status
    pub fn summarize<'a>(reports: impl IntoIterator<Item = &'a Report>) -> Self {
        let mut stats = Self::default();
        for report in reports {
            match report.status() {
                ReportStatus::Pending => stats.pending += 1,
                ReportStatus::InProgress => stats.in_progress += 1,
                ReportStatus::Resolved => stats.resolved += 1,
            }
        }
        stats
    }

    /// Total reports counted
    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.resolved
    }
}

/// Per-status task counters for a worker or supervisor dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatistics {
    /// Tasks assigned but not started
    pub pending: usize,
    /// Tasks being worked
    pub in_progress: usize,
    /// Tasks completed with evidence
    pub completed: usize,
}

impl TaskStatistics {
    /// Count tasks per status
    pub fn summarize<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            match task.status() {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
        }
        stats
    }

    /// Total tasks counted
    pub fn total(&self) -> usize {
        self.pending + self.in_progress + self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportId, Reporter};
    use crate::types::{GeoLocation, Priority, ProblemType};
    use chrono::{TimeZone, Utc};

    fn report_for(citizen_id: UserId, zone_id: ZoneId) -> Report {
        Report::new(
            ReportId::new(),
            Reporter {
                citizen_id,
                name: "Citizen".to_string(),
                email: "citizen@example.com".to_string(),
                phone: None,
            },
            ProblemType::Sweeping,
            "Dirty street",
            GeoLocation::new(4.61, -74.08, "Carrera 12"),
            vec![],
            Priority::Medium,
            zone_id,
            Utc.with_ymd_and_hms(2024, 1, 14, 14, 20, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_citizen_sees_only_own_reports() {
        let me = UserId::new();
        let someone_else = UserId::new();
        let zone = ZoneId::new();
        let identity = Identity {
            user_id: me,
            role: UserRole::Citizen,
            zone_id: None,
        };

        let mine = report_for(me, zone);
        let theirs = report_for(someone_else, zone);
        let visible = visible_reports(&identity, [&mine, &theirs]);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].citizen_id(), me);
    }

    #[test]
    fn test_citizen_has_no_task_surface() {
        let identity = Identity {
            user_id: UserId::new(),
            role: UserRole::Citizen,
            zone_id: None,
        };
        assert_eq!(task_scope(&identity), TaskScope::Nothing);
    }

    #[test]
    fn test_supervisor_scoped_to_zone() {
        let zone = ZoneId::new();
        let other_zone = ZoneId::new();
        let identity = Identity {
            user_id: UserId::new(),
            role: UserRole::Supervisor,
            zone_id: Some(zone),
        };

        let in_zone = report_for(UserId::new(), zone);
        let outside = report_for(UserId::new(), other_zone);
        let visible = visible_reports(&identity, [&in_zone, &outside]);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].zone_id(), zone);
    }

    #[test]
    fn test_worker_has_no_report_surface() {
        let identity = Identity {
            user_id: UserId::new(),
            role: UserRole::Worker,
            zone_id: Some(ZoneId::new()),
        };
        assert_eq!(report_scope(&identity), ReportScope::Nothing);

        let report = report_for(UserId::new(), identity.zone_id.unwrap());
        assert!(visible_reports(&identity, [&report]).is_empty());
    }

    #[test]
    fn test_statistics_reflect_filtered_set_only() {
        let me = UserId::new();
        let zone = ZoneId::new();
        let identity = Identity {
            user_id: me,
            role: UserRole::Citizen,
            zone_id: None,
        };

        let mine = report_for(me, zone);
        let theirs_a = report_for(UserId::new(), zone);
        let theirs_b = report_for(UserId::new(), zone);

        let all = [&mine, &theirs_a, &theirs_b];
        let filtered = visible_reports(&identity, all);
        let stats = ReportStatistics::summarize(filtered.into_iter());

        assert_eq!(stats.total(), 1);
        assert_eq!(stats.pending, 1);
    }
}
