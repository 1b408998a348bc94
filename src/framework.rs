//! Known plugin frameworks.
//!
//! A [`Framework`] ties together everything the auditor needs to know about
//! one vendor extension package: its canonical identity, how usage is
//! recognized in project sources, where its checkout lives, and which kind of
//! compatibility evidence it ships.

use std::fmt;
use std::path::PathBuf;

use crate::evidence::EvidenceSource;

/// Identity of the core SDK in cross-stack version maps.
pub const TOOLCHAIN_ID: &str = "esp-idf";

/// A plugin framework with compatibility evidence of its own.
///
/// Variant order is the deterministic audit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Framework {
    /// ESP-ADF audio development framework.
    Adf,
    /// ESP-SR speech recognition framework.
    Sr,
}

impl Framework {
    /// All known frameworks in audit order.
    pub const ALL: [Framework; 2] = [Framework::Adf, Framework::Sr];

    /// Canonical lowercase identity.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Adf => "esp-adf",
            Self::Sr => "esp-sr",
        }
    }

    /// Human-facing name used in report summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Adf => "ESP-ADF",
            Self::Sr => "ESP-SR",
        }
    }

    /// Look up a framework by canonical identity.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    /// Case-insensitive pattern that marks a source file as using this framework.
    pub fn usage_pattern(&self) -> &'static str {
        match self {
            Self::Adf => r"(?i)\b(audio_pipeline|audio_board|audio_element|esp-adf)\b",
            Self::Sr => r"(?i)\b(esp-sr|esp_afe|wakenet|multinet|esp speech recognition)\b",
        }
    }

    /// Environment variables naming the checkout, in lookup order.
    pub fn checkout_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Adf => &["ESP_ADF_DIR", "ADF_PATH"],
            Self::Sr => &["ESP_SR_DIR", "ESP_SR_PATH"],
        }
    }

    /// Conventional checkout location relative to the home directory.
    pub fn default_checkout(&self) -> PathBuf {
        PathBuf::from("esp").join(self.id())
    }

    /// The evidence this framework publishes about toolchain support.
    pub fn evidence_source(&self) -> EvidenceSource {
        match self {
            Self::Adf => EvidenceSource::Table,
            Self::Sr => EvidenceSource::Manifest,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
