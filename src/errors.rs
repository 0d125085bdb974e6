//! Error types for domain operations

use thiserror::Error;

/// Errors that can occur in domain operations
///
/// Every variant is terminal for the operation that raised it: the core
/// never silently recovers, and no operation partially commits on error.
/// Callers get a distinct typed outcome so presentation code can render an
/// appropriate message per failure.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Illegal state change attempted on a Report or Task
    #[error("Invalid transition for {entity}: {from} -> {to}")]
    InvalidTransition {
        /// Entity kind the transition was attempted on ("Report" or "Task")
        entity: &'static str,
        /// Current state name
        from: &'static str,
        /// Attempted target state name
        to: &'static str,
    },

    /// The report already has a task; reassignment is rejected
    #[error("Report {report_id} is already assigned")]
    AlreadyAssigned {
        /// The report that already carries an assignment
        report_id: String,
    },

    /// The task is already completed; a duplicate completion was rejected
    #[error("Task {task_id} is already completed")]
    AlreadyCompleted {
        /// The task that was already completed
        task_id: String,
    },

    /// Assignment precondition violated: worker and report zones differ
    #[error("Zone mismatch: report is in zone {report_zone}, worker is in zone {worker_zone}")]
    ZoneMismatch {
        /// Zone the report belongs to
        report_zone: String,
        /// Zone the worker belongs to
        worker_zone: String,
    },

    /// Assignment precondition violated: the chosen user cannot take tasks
    #[error("Invalid worker: {reason}")]
    InvalidWorker {
        /// Why the user cannot be assigned
        reason: String,
    },

    /// The acting identity does not have the role required for the operation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Completion precondition violated: the evidence set was rejected
    #[error("Insufficient evidence: {required} photo(s) required, {supplied} supplied")]
    InsufficientEvidence {
        /// Minimum number of evidence photos the policy requires
        required: usize,
        /// Number of photos actually supplied
        supplied: usize,
    },

    /// Concurrent write detected by the optimistic version check
    #[error("Conflicting update on {entity} {id}: expected version {expected}, found {actual}")]
    ConflictingUpdate {
        /// Entity kind the stale write targeted
        entity: &'static str,
        /// Identifier of the contested entity
        id: String,
        /// Version the store expected for the write to apply
        expected: u64,
        /// Version the write actually carried
        actual: u64,
    },

    /// Referenced entity missing
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind that was searched for
        entity: &'static str,
        /// Identifier that was searched for
        id: String,
    },

    /// An entity with this identifier already exists in the store
    #[error("{entity} already exists: {id}")]
    AlreadyExists {
        /// Entity kind that collided
        entity: &'static str,
        /// Identifier that collided
        id: String,
    },

    /// Collaborator I/O failure while uploading an image; not retried here
    #[error("Image upload failed: {0}")]
    UploadFailed(String),

    /// Construction or update input violated a model invariant
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }

    /// Check if this is a concurrent-write conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::ConflictingUpdate { .. })
    }

    /// Check if this is a violated operation precondition
    ///
    /// Covers the assignment and completion gates; distinct from
    /// [`DomainError::InvalidTransition`], which signals an out-of-order
    /// state change rather than a failed gate.
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            DomainError::AlreadyAssigned { .. }
                | DomainError::AlreadyCompleted { .. }
                | DomainError::ZoneMismatch { .. }
                | DomainError::InvalidWorker { .. }
                | DomainError::InsufficientEvidence { .. }
        )
    }
}
