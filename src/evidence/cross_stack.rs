//! Joint ESP-ADF + ESP-SR compatibility evidence.
//!
//! Each framework's own evidence only speaks about ESP-IDF. When both are
//! linked into one firmware the project must additionally pin a combination
//! it has verified, either through an operator attestation in
//! [`STACK_EVIDENCE_ENV`] or through an evidence file in the project tree.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use super::{read_lossy, EvidenceRecord};
use crate::framework::{Framework, TOOLCHAIN_ID};

/// Environment variable carrying a free-text operator attestation.
pub const STACK_EVIDENCE_ENV: &str = "ESP_STACK_COMPAT_EVIDENCE";

/// Evidence files probed in order, relative to the project root.
pub const CANDIDATE_FILES: &[&str] = &[
    "esp-framework-compat.lock",
    "esp-framework-compatibility.lock",
    "docs/esp-framework-compat.md",
    "docs/compatibility/esp-frameworks.md",
];

/// The frameworks that interact and need joint evidence.
pub const INTERACTING: [Framework; 2] = [Framework::Adf, Framework::Sr];

/// Everything the reconciler looks at.
#[derive(Debug, Clone)]
pub struct CrossStackInput<'a> {
    pub project_dir: &'a Path,
    /// Framework identities detected as in use.
    pub used: &'a BTreeSet<String>,
    /// Identity to revision description, including the toolchain.
    pub versions: &'a BTreeMap<String, String>,
    /// Operator attestation, if any.
    pub attestation: Option<&'a str>,
}

/// Candidate evidence file paths under `project_dir`.
pub fn candidate_paths(project_dir: &Path) -> Vec<PathBuf> {
    CANDIDATE_FILES.iter().map(|f| project_dir.join(f)).collect()
}

fn is_pinned_identity(id: &str) -> bool {
    id == TOOLCHAIN_ID || INTERACTING.iter().any(|f| f.id() == id)
}

/// Whether `text` names every relevant identity and its version prefix.
///
/// Identities match case-insensitively. The version is cut at its first `-`
/// so `v2.7-dirty` is found as `v2.7`. Empty versions are not required.
pub fn pins_all_versions(text: &str, versions: &BTreeMap<String, String>) -> bool {
    let lowered = text.to_lowercase();
    versions
        .iter()
        .filter(|(id, version)| is_pinned_identity(id) && !version.is_empty())
        .all(|(id, version)| {
            let prefix = version.split('-').next().unwrap_or_default();
            lowered.contains(id.as_str()) && text.contains(prefix)
        })
}

/// Decide whether the combination of in-use frameworks is evidenced.
pub fn reconcile(input: &CrossStackInput<'_>) -> EvidenceRecord {
    let mut details = Vec::new();

    if !INTERACTING.iter().all(|f| input.used.contains(f.id())) {
        return EvidenceRecord::pass(
            "No ADF+SR cross-stack evidence required (both not in use together)",
            details,
        );
    }

    if let Some(attestation) = input.attestation.map(str::trim).filter(|a| !a.is_empty()) {
        details.push(format!("{STACK_EVIDENCE_ENV}={attestation}"));
        return EvidenceRecord::pass(
            format!("Cross-stack evidence provided via {STACK_EVIDENCE_ENV}"),
            details,
        );
    }

    for path in candidate_paths(input.project_dir) {
        if !path.exists() {
            continue;
        }
        let text = read_lossy(&path).unwrap_or_default();
        details.push(format!("Found cross-stack evidence file: {}", path.display()));
        tracing::debug!("Checking cross-stack evidence in {}", path.display());

        if pins_all_versions(&text, input.versions) {
            return EvidenceRecord::pass(
                format!("Cross-stack evidence file found: {}", path.display()),
                details,
            );
        }
        return EvidenceRecord::fail(
            format!(
                "Cross-stack evidence file {} exists but does not explicitly pin all framework versions",
                path.display()
            ),
            details,
        );
    }

    EvidenceRecord::fail(
        "ADF + SR are both in use but no explicit cross-stack compatibility evidence was provided",
        details,
    )
}
