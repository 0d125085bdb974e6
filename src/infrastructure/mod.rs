//! Collaborator seams: stores, clock, image upload, identity, zones
//!
//! The core consumes these interfaces and ships in-memory implementations
//! for tests; network, persistence, and image-storage implementations live
//! in the outer service.

mod clock;
mod identity;
mod store;
mod uploader;
mod zones;

pub use clock::{Clock, FixedClock, SystemClock};
pub use identity::{IdentityProvider, InMemoryUserDirectory, StaticIdentityProvider, UserDirectory};
pub use store::{InMemoryReportStore, InMemoryTaskStore, ReportStore, TaskStore};
pub use uploader::{ImageUploader, InMemoryUploader};
pub use zones::{InMemoryZoneDirectory, ZoneDirectory};

#[cfg(test)]
pub use uploader::MockImageUploader;
