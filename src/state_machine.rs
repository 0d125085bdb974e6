//! State machines for the report/task lifecycle
//!
//! Both lifecycles are small linear machines with a terminal end state:
//!
//! - Report: `pending --assign--> in_progress --complete--> resolved`
//! - Task:   `pending --start--> in_progress --complete--> completed`
//!
//! No transition skips a state and nothing regresses from a terminal state.
//! The aggregates call [`ensure_transition`] before mutating so an
//! out-of-order attempt fails with `InvalidTransition` and leaves the
//! entity unchanged.

use crate::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for lifecycle states
pub trait State: fmt::Debug + Clone + Copy + PartialEq + Eq + Send + Sync + 'static {
    /// Name of this state, also its canonical wire literal
    fn name(&self) -> &'static str;

    /// Check if this is a terminal state
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// All legal target states from this state
    fn valid_transitions(&self) -> &'static [Self];

    /// Check if a transition to the target state is legal
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }
}

/// Guard a transition, producing `InvalidTransition` when it is illegal
///
/// `entity` names the aggregate kind for the error message ("Report" or
/// "Task").
pub fn ensure_transition<S: State>(entity: &'static str, from: S, to: S) -> DomainResult<()> {
    if from.can_transition_to(&to) {
        Ok(())
    } else {
        Err(DomainError::InvalidTransition {
            entity,
            from: from.name(),
            to: to.name(),
        })
    }
}

/// Lifecycle states of a citizen report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Filed by a citizen, awaiting supervisor triage
    Pending,
    /// A task has been created for it and a worker assigned
    InProgress,
    /// Terminal: the backing task was completed with evidence
    Resolved,
}

impl State for ReportStatus {
    fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }

    fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InProgress],
            Self::InProgress => &[Self::Resolved],
            Self::Resolved => &[],
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle states of a work order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Assigned to a worker, not yet started
    Pending,
    /// The worker has started on-site work
    InProgress,
    /// Terminal: finished with accepted evidence
    Completed,
}

impl State for TaskStatus {
    fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::InProgress],
            Self::InProgress => &[Self::Completed],
            Self::Completed => &[],
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
