//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for one optimization run
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable, lexicographically orderable identifier for a candidate site
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteId(String);

impl SiteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for the n-th generated site (zero-based), zero-padded so that
    /// lexicographic order matches generation order for up to 1000 sites —
    /// far beyond what one run can generate.
    pub fn from_index(index: usize) -> Self {
        Self(format!("site-{index:03}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Geographic coordinates in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// Charging station hardware class requested for the new site
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationType {
    Regular,
    Fast,
    UltraFast,
}

impl StationType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "regular" => Some(StationType::Regular),
            "fast" => Some(StationType::Fast),
            "ultra_fast" => Some(StationType::UltraFast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StationType::Regular => "regular",
            StationType::Fast => "fast",
            StationType::UltraFast => "ultra_fast",
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the five independent evaluation axes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Traffic,
    Grid,
    Competition,
    Demographics,
    Roi,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Traffic,
        Dimension::Grid,
        Dimension::Competition,
        Dimension::Demographics,
        Dimension::Roi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Traffic => "traffic",
            Dimension::Grid => "grid",
            Dimension::Competition => "competition",
            Dimension::Demographics => "demographics",
            Dimension::Roi => "roi",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One geographic point under evaluation for a new charging station.
/// Created once per run and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateSite {
    pub id: SiteId,
    pub coordinates: Coordinates,
    pub name: Option<String>,
    pub address: Option<String>,
}

impl CandidateSite {
    pub fn new(id: SiteId, coordinates: Coordinates) -> Self {
        Self {
            id,
            coordinates,
            name: None,
            address: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Display name for narratives and result payloads
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.id.as_str())
    }
}

/// Pipeline stage that produced a contained failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Evaluation,
    Narration,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStage::Evaluation => write!(f, "evaluation"),
            RunStage::Narration => write!(f, "narration"),
        }
    }
}
