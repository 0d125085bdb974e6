//! Domain core for a municipal public-cleanliness reporting platform
//!
//! Citizens file reports about garbage, weeds, and dirty streets;
//! supervisors triage reports in their zone and assign them to workers as
//! tasks; workers execute tasks and complete them with photographic
//! evidence, which resolves the originating report.
//!
//! The crate is the pure domain layer: aggregates, lifecycle state
//! machines, the assignment resolver, the evidence policy, and role-scoped
//! visibility. Persistence, authentication, image storage, and time are
//! trait seams under [`infrastructure`], with in-memory implementations
//! for tests. Nothing here performs I/O beyond those seams.
//!
//! # Architecture
//!
//! - [`report`] and [`task`] are the two aggregates; their statuses are
//!   linear state machines defined in [`state_machine`]
//! - [`assignment`] converts a pending report into a task for a worker,
//!   atomically with the report's move to `in_progress`
//! - [`lifecycle`] drives submission, start, and the completion that
//!   resolves the report as one unit of work
//! - [`evidence`] gates completion on a minimum evidence set
//! - [`visibility`] projects reports and tasks down to what an identity
//!   may see, and computes statistics from the filtered set only
//! - [`events`] carries the domain events published after transitions

#![warn(missing_docs)]

pub mod assignment;
pub mod entity;
pub mod errors;
pub mod events;
pub mod evidence;
pub mod infrastructure;
pub mod lifecycle;
pub mod report;
pub mod state_machine;
pub mod task;
pub mod types;
pub mod user;
pub mod visibility;
pub mod zone;

pub use assignment::{rank_candidates, AssignmentOutcome, AssignmentRequest, AssignmentResolver};
pub use entity::{AggregateRoot, Entity, EntityId};
pub use errors::{DomainError, DomainResult};
pub use events::{
    DomainEvent, EventPublisher, NullEventPublisher, RecordingEventPublisher, ReportResolved,
    ReportSubmitted, TaskAssigned, TaskCompleted, TaskStarted,
};
pub use evidence::{collect_evidence, EvidencePolicy, EvidenceSubmission, MinimumPhotoPolicy};
pub use infrastructure::{
    Clock, FixedClock, IdentityProvider, ImageUploader, InMemoryReportStore, InMemoryTaskStore,
    InMemoryUploader, InMemoryUserDirectory, InMemoryZoneDirectory, ReportStore,
    StaticIdentityProvider, SystemClock, TaskStore, UserDirectory, ZoneDirectory,
};
pub use lifecycle::{LifecycleEngine, NewReport, TaskCompletion};
pub use report::{Assignment, Report, ReportId, Reporter};
pub use state_machine::{ensure_transition, ReportStatus, State, TaskStatus};
pub use task::{Task, TaskId};
pub use types::{GeoLocation, GeoPoint, PhotoRef, Priority, ProblemType};
pub use user::{User, UserId, UserRole, WorkerProfile};
pub use visibility::{
    report_scope, task_scope, visible_reports, visible_tasks, Identity, ReportScope,
    ReportStatistics, TaskScope, TaskStatistics,
};
pub use zone::{Zone, ZoneId};
