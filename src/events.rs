//! Domain events emitted by lifecycle transitions
//!
//! Events are published after the state writes commit; publication is not
//! part of the atomic unit of work, so a failing publisher never rolls back
//! a transition.

use crate::report::ReportId;
use crate::task::TaskId;
use crate::user::UserId;
use crate::zone::ZoneId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// A thing that happened in the domain
pub trait DomainEvent: Debug + Send + Sync {
    /// The aggregate this event belongs to
    fn aggregate_id(&self) -> Uuid;

    /// Event type name for routing and logging
    fn event_type(&self) -> &'static str;

    /// When the event occurred, per the injected clock
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// A citizen filed a new report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSubmitted {
    /// The new report
    pub report_id: ReportId,
    /// The filing citizen
    pub citizen_id: UserId,
    /// Zone the report falls in
    pub zone_id: ZoneId,
    /// Filing time
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for ReportSubmitted {
    fn aggregate_id(&self) -> Uuid {
        self.report_id.into()
    }

    fn event_type(&self) -> &'static str {
        "ReportSubmitted"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// A supervisor converted a report into a task for a worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAssigned {
    /// The new task
    pub task_id: TaskId,
    /// The originating report
    pub report_id: ReportId,
    /// The assigned worker
    pub worker_id: UserId,
    /// The assigning supervisor
    pub supervisor_id: UserId,
    /// Assignment time
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for TaskAssigned {
    fn aggregate_id(&self) -> Uuid {
        self.task_id.into()
    }

    fn event_type(&self) -> &'static str {
        "TaskAssigned"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// The assigned worker started on-site work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStarted {
    /// The started task
    pub task_id: TaskId,
    /// The acting worker
    pub worker_id: UserId,
    /// Start time
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for TaskStarted {
    fn aggregate_id(&self) -> Uuid {
        self.task_id.into()
    }

    fn event_type(&self) -> &'static str {
        "TaskStarted"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// The worker completed the task with accepted evidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCompleted {
    /// The completed task
    pub task_id: TaskId,
    /// The originating report
    pub report_id: ReportId,
    /// Number of evidence photos accepted
    pub evidence_count: usize,
    /// Completion time
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for TaskCompleted {
    fn aggregate_id(&self) -> Uuid {
        self.task_id.into()
    }

    fn event_type(&self) -> &'static str {
        "TaskCompleted"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Task completion propagated back onto the originating report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResolved {
    /// The resolved report
    pub report_id: ReportId,
    /// The task whose completion resolved it
    pub task_id: TaskId,
    /// Resolution time
    pub occurred_at: DateTime<Utc>,
}

impl DomainEvent for ReportResolved {
    fn aggregate_id(&self) -> Uuid {
        self.report_id.into()
    }

    fn event_type(&self) -> &'static str {
        "ReportResolved"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Event publisher trait for the lifecycle engine and resolver
pub trait EventPublisher: Send + Sync {
    /// Publish domain events, in order
    fn publish(&self, events: Vec<Box<dyn DomainEvent>>) -> crate::DomainResult<()>;
}

/// Publisher that drops all events, for wiring where nobody listens
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventPublisher;

impl EventPublisher for NullEventPublisher {
    fn publish(&self, _events: Vec<Box<dyn DomainEvent>>) -> crate::DomainResult<()> {
        Ok(())
    }
}

/// Publisher that records event type names and aggregate ids, for tests
#[derive(Clone, Default)]
pub struct RecordingEventPublisher {
    published: Arc<RwLock<Vec<(String, Uuid)>>>,
}

impl RecordingEventPublisher {
    /// Create a new recording publisher
    pub fn new() -> Self {
        Self::default()
    }

    /// All published events as `(event_type, aggregate_id)` pairs
    pub fn published(&self) -> Vec<(String, Uuid)> {
        self.published
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Published event type names, in publication order
    pub fn event_types(&self) -> Vec<String> {
        self.published().into_iter().map(|(t, _)| t).collect()
    }
}

impl EventPublisher for RecordingEventPublisher {
    fn publish(&self, events: Vec<Box<dyn DomainEvent>>) -> crate::DomainResult<()> {
        let mut published = self
            .published
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for event in events {
            published.push((event.event_type().to_string(), event.aggregate_id()));
        }
        Ok(())
    }
}
