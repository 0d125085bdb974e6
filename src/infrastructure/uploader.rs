//! Image upload seam
//!
//! Uploads are result-bearing, never fire-and-forget: a failed upload is
//! visible as `UploadFailed` before any completion is attempted. The core
//! does not retry; the caller decides.

use crate::errors::DomainResult;
use crate::types::PhotoRef;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Uploads image bytes and returns an opaque photo reference
#[cfg_attr(test, mockall::automock)]
pub trait ImageUploader: Send + Sync {
    /// Upload one image, returning its stored reference
    fn upload(&self, bytes: &[u8]) -> DomainResult<PhotoRef>;
}

/// In-memory uploader for tests, hands out sequential `mem://` references
#[derive(Debug, Default)]
pub struct InMemoryUploader {
    counter: AtomicUsize,
}

impl InMemoryUploader {
    /// Create a fresh uploader
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of uploads performed
    pub fn upload_count(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

impl ImageUploader for InMemoryUploader {
    fn upload(&self, _bytes: &[u8]) -> DomainResult<PhotoRef> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(PhotoRef::new(format!("mem://photo-{n}")))
    }
}
