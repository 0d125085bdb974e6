//! Evidence gating for task completion
//!
//! The policy is isolated from the lifecycle engine so the minimum-evidence
//! threshold can change without touching state-transition code.

use crate::errors::{DomainError, DomainResult};
use crate::infrastructure::ImageUploader;
use crate::task::Task;
use crate::types::PhotoRef;

/// A candidate evidence set supplied by a worker to complete a task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceSubmission {
    /// Uploaded evidence photo references
    pub photos: Vec<PhotoRef>,
    /// Optional free-text completion notes
    pub notes: Option<String>,
}

impl EvidenceSubmission {
    /// Build a submission from already-uploaded photo references
    pub fn new(photos: Vec<PhotoRef>, notes: Option<String>) -> Self {
        Self { photos, notes }
    }
}

/// Decides whether an evidence set justifies completing a task
pub trait EvidencePolicy: Send + Sync {
    /// Accept or reject the submission for the given task
    fn validate(&self, submission: &EvidenceSubmission, task: &Task) -> DomainResult<()>;
}

/// Default policy: at least `minimum` photos, notes always optional
#[derive(Debug, Clone, Copy)]
pub struct MinimumPhotoPolicy {
    minimum: usize,
}

impl MinimumPhotoPolicy {
    /// Require at least `minimum` evidence photos
    pub fn new(minimum: usize) -> Self {
        Self { minimum }
    }

    /// The configured minimum
    pub fn minimum(&self) -> usize {
        self.minimum
    }
}

impl Default for MinimumPhotoPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

impl EvidencePolicy for MinimumPhotoPolicy {
    fn validate(&self, submission: &EvidenceSubmission, _task: &Task) -> DomainResult<()> {
        if submission.photos.len() < self.minimum {
            return Err(DomainError::InsufficientEvidence {
                required: self.minimum,
                supplied: submission.photos.len(),
            });
        }
        Ok(())
    }
}

/// Upload raw images and gather the references into a submission
///
/// Any single upload failure aborts the whole collection with
/// `UploadFailed` — evidence is never optimistic about upload success.
pub fn collect_evidence(
    uploader: &dyn ImageUploader,
    images: &[Vec<u8>],
    notes: Option<String>,
) -> DomainResult<EvidenceSubmission> {
    let mut photos = Vec::with_capacity(images.len());
    for image in images {
        photos.push(uploader.upload(image)?);
    }
    Ok(EvidenceSubmission { photos, notes })
}
