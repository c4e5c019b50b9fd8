//! Shared types and enums used across burnmap.
//! Includes `Resampling`, `VisualKind`, `ImageFormat` and the `SeverityClass`
//! codes produced by the classifier.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Resampling policy used when aligning one grid onto another.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Resampling {
    /// Weighted blend of the 4 nearest source cells (continuous data).
    Bilinear,
    /// Copy of the single nearest source cell (categorical/boolean data).
    Nearest,
}

impl std::fmt::Display for Resampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resampling::Bilinear => write!(f, "bilinear"),
            Resampling::Nearest => write!(f, "nearest"),
        }
    }
}

/// Which rendering of the delta grid to produce as the visual artifact.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum VisualKind {
    /// Severity classes through the fixed 8-entry palette.
    Classified,
    /// Only cells at/above the burn threshold, colored by a continuous ramp.
    BurnOnly,
    /// Every finite cell, contrast-stretched over the 2nd-98th percentile.
    Stretched,
}

impl VisualKind {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            VisualKind::Classified => "dnbr_classes",
            VisualKind::BurnOnly => "dnbr_burn",
            VisualKind::Stretched => "dnbr_stretch",
        }
    }
}

impl std::fmt::Display for VisualKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisualKind::Classified => write!(f, "Classified"),
            VisualKind::BurnOnly => write!(f, "BurnOnly"),
            VisualKind::Stretched => write!(f, "Stretched"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum ImageFormat {
    PNG,
    JPEG, // No alpha channel, transparent cells are flattened to black
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::PNG => "png",
            ImageFormat::JPEG => "jpg",
        }
    }
}

/// Discrete burn severity bands, ordered from strong regrowth to high severity.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SeverityClass {
    Background = 0,
    EnhancedRegrowthHigh = 1,
    EnhancedRegrowthLow = 2,
    Unburned = 3,
    LowSeverity = 4,
    ModerateLowSeverity = 5,
    ModerateHighSeverity = 6,
    HighSeverity = 7,
}

impl SeverityClass {
    pub const ALL: [SeverityClass; 8] = [
        SeverityClass::Background,
        SeverityClass::EnhancedRegrowthHigh,
        SeverityClass::EnhancedRegrowthLow,
        SeverityClass::Unburned,
        SeverityClass::LowSeverity,
        SeverityClass::ModerateLowSeverity,
        SeverityClass::ModerateHighSeverity,
        SeverityClass::HighSeverity,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Inverse of `code`; codes above 7 have no class.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityClass::Background => "background / no data",
            SeverityClass::EnhancedRegrowthHigh => "enhanced regrowth, high",
            SeverityClass::EnhancedRegrowthLow => "enhanced regrowth, low",
            SeverityClass::Unburned => "unburned",
            SeverityClass::LowSeverity => "low severity",
            SeverityClass::ModerateLowSeverity => "moderate-low severity",
            SeverityClass::ModerateHighSeverity => "moderate-high severity",
            SeverityClass::HighSeverity => "high severity",
        }
    }
}

impl std::fmt::Display for SeverityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code(), self.label())
    }
}
