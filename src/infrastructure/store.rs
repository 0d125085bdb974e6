//! Report and task stores
//!
//! The traits are the single persistence seam of the core: the in-memory
//! implementations here back every test, a persistent implementation lives
//! in the outer service. `update` carries an optimistic version check —
//! aggregates bump their version on every mutation, and a write whose
//! version is not exactly one ahead of the stored version is stale and
//! rejected with `ConflictingUpdate`. Last-writer-wins is not acceptable
//! because it can silently skip a lifecycle state.

use crate::entity::AggregateRoot;
use crate::errors::{DomainError, DomainResult};
use crate::report::{Report, ReportId};
use crate::task::{Task, TaskId};
use indexmap::IndexMap;
use std::sync::RwLock;

/// Persistence seam for reports
pub trait ReportStore: Send + Sync {
    /// Persist a new report; the id must be unused
    fn create(&self, report: Report) -> DomainResult<Report>;

    /// Fetch a report by id
    fn get(&self, id: ReportId) -> DomainResult<Report>;

    /// Apply a mutation, enforcing the optimistic version check
    fn update(&self, report: Report) -> DomainResult<Report>;

    /// Put back a prior snapshot, bypassing the version check
    ///
    /// Compensation path only: used to roll back the first write of a
    /// two-entity unit of work when the second write fails.
    fn restore(&self, report: Report) -> DomainResult<()>;

    /// All reports, in insertion order
    fn list(&self) -> Vec<Report>;
}

/// Persistence seam for tasks
pub trait TaskStore: Send + Sync {
    /// Persist a new task; the id must be unused
    fn create(&self, task: Task) -> DomainResult<Task>;

    /// Fetch a task by id
    fn get(&self, id: TaskId) -> DomainResult<Task>;

    /// Apply a mutation, enforcing the optimistic version check
    fn update(&self, task: Task) -> DomainResult<Task>;

    /// Put back a prior snapshot, bypassing the version check
    ///
    /// Compensation path only, see [`ReportStore::restore`].
    fn restore(&self, task: Task) -> DomainResult<()>;

    /// Remove a task, compensation for a failed assignment
    fn delete(&self, id: TaskId) -> DomainResult<()>;

    /// The live task backing a report, if one exists
    fn find_by_report(&self, report_id: ReportId) -> Option<Task>;

    /// All tasks, in insertion order
    fn list(&self) -> Vec<Task>;
}

fn check_version<A: AggregateRoot>(
    entity: &'static str,
    id: String,
    stored: &A,
    incoming: &A,
) -> DomainResult<()> {
    let expected = stored.version() + 1;
    if incoming.version() != expected {
        return Err(DomainError::ConflictingUpdate {
            entity,
            id,
            expected,
            actual: incoming.version(),
        });
    }
    Ok(())
}

/// In-memory report store for tests and local tooling
#[derive(Default)]
pub struct InMemoryReportStore {
    inner: RwLock<IndexMap<ReportId, Report>>,
}

impl InMemoryReportStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportStore for InMemoryReportStore {
    fn create(&self, report: Report) -> DomainResult<Report> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.contains_key(&report.id()) {
            return Err(DomainError::AlreadyExists {
                entity: "Report",
                id: report.id().to_string(),
            });
        }
        inner.insert(report.id(), report.clone());
        Ok(report)
    }

    fn get(&self, id: ReportId) -> DomainResult<Report> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound {
                entity: "Report",
                id: id.to_string(),
            })
    }

    fn update(&self, report: Report) -> DomainResult<Report> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let stored = inner.get(&report.id()).ok_or_else(|| DomainError::NotFound {
            entity: "Report",
            id: report.id().to_string(),
        })?;
        check_version("Report", report.id().to_string(), stored, &report)?;
        inner.insert(report.id(), report.clone());
        Ok(report)
    }

    fn restore(&self, report: Report) -> DomainResult<()> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.insert(report.id(), report);
        Ok(())
    }

    fn list(&self) -> Vec<Report> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect()
    }
}

/// In-memory task store for tests and local tooling
#[derive(Default)]
pub struct InMemoryTaskStore {
    inner: RwLock<IndexMap<TaskId, Task>>,
}

impl InMemoryTaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn create(&self, task: Task) -> DomainResult<Task> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.contains_key(&task.id()) {
            return Err(DomainError::AlreadyExists {
                entity: "Task",
                id: task.id().to_string(),
            });
        }
        inner.insert(task.id(), task.clone());
        Ok(task)
    }

    fn get(&self, id: TaskId) -> DomainResult<Task> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound {
                entity: "Task",
                id: id.to_string(),
            })
    }

    fn update(&self, task: Task) -> DomainResult<Task> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let stored = inner.get(&task.id()).ok_or_else(|| DomainError::NotFound {
            entity: "Task",
            id: task.id().to_string(),
        })?;
        check_version("Task", task.id().to_string(), stored, &task)?;
        inner.insert(task.id(), task.clone());
        Ok(task)
    }

    fn restore(&self, task: Task) -> DomainResult<()> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.insert(task.id(), task);
        Ok(())
    }

    fn delete(&self, id: TaskId) -> DomainResult<()> {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.shift_remove(&id).ok_or(DomainError::NotFound {
            entity: "Task",
            id: id.to_string(),
        })?;
        Ok(())
    }

    fn find_by_report(&self, report_id: ReportId) -> Option<Task> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .find(|task| task.report_id() == report_id)
            .cloned()
    }

    fn list(&self) -> Vec<Task> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect()
    }
}
