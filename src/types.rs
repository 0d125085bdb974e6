//! Shared value objects and enumerated fields
//!
//! The enum literals here are the canonical wire representation for the
//! whole platform: lower snake case, one spelling per value. Every
//! persistence or API layer must preserve them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of cleanliness problem a report describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemType {
    /// Accumulated garbage or debris
    SolidWaste,
    /// Overgrown vegetation obstructing public space
    Weeds,
    /// Streets needing sweeping
    Sweeping,
}

impl ProblemType {
    /// Canonical lower-snake literal for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SolidWaste => "solid_waste",
            Self::Weeds => "weeds",
            Self::Sweeping => "sweeping",
        }
    }

    /// Human-readable label, used when deriving task titles
    pub fn label(&self) -> &'static str {
        match self {
            Self::SolidWaste => "Solid waste",
            Self::Weeds => "Weeds",
            Self::Sweeping => "Sweeping",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a report or task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait for routine scheduling
    Low,
    /// Default urgency
    #[default]
    Medium,
    /// Needs prompt attention
    High,
}

impl Priority {
    /// Canonical lower-snake literal for this priority
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geographic point, used for zone boundary vertices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// A resolved geographic location
///
/// This is a snapshot value object: assignment copies it from the Report
/// onto the Task, it is never a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Resolved street address
    pub address: String,
}

impl GeoLocation {
    /// Create a location from coordinates and a resolved address
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
        }
    }
}

/// An opaque reference to an uploaded photo
///
/// Produced by the [`ImageUploader`](crate::ImageUploader) collaborator;
/// the core treats it as an opaque URL or storage path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(pub String);

impl PhotoRef {
    /// Create a photo reference from a URL or storage path
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoRef {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}
