//! Component-manifest evidence (ESP-SR).
//!
//! ESP-SR is consumed as an ESP-IDF component, so its `idf_component.yml`
//! declares the ESP-IDF range it builds against:
//!
//! ```yaml
//! version: "1.9.0"
//! dependencies:
//!   idf: ">=5.0,<5.6"
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

use super::{read_lossy, Checkout, EvidenceRecord};
use crate::version::{evaluate, Version};

const NAME: &str = "ESP-SR";
const MANIFEST: &str = "idf_component.yml";

static LOOSE_IDF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*idf:\s*"([^"]+)""#).expect("idf dependency pattern is valid")
});

/// What the manifest declares about ESP-IDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFacts {
    /// Self-reported component version, for the report only.
    pub version: Option<String>,
    /// Declared ESP-IDF dependency range.
    pub idf_range: Option<String>,
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `dependencies.idf` as either a plain range or `{ version: <range> }`.
fn structured_idf_range(doc: &Value) -> Option<String> {
    let idf = doc.get("dependencies")?.get("idf")?;
    match idf {
        Value::Mapping(_) => idf.get("version").and_then(scalar_text),
        other => scalar_text(other),
    }
}

/// Extract the version and ESP-IDF range from manifest text.
///
/// Documents that are not valid YAML still get a line-based search for an
/// `idf: "<range>"` entry.
pub fn extract(text: &str) -> ManifestFacts {
    let doc = match serde_yaml::from_str::<Value>(text) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::debug!("{} is not valid YAML, using line match: {}", MANIFEST, e);
            None
        }
    };

    let version = doc
        .as_ref()
        .and_then(|d| d.get("version"))
        .and_then(scalar_text);

    let idf_range = doc
        .as_ref()
        .and_then(structured_idf_range)
        .or_else(|| {
            LOOSE_IDF_RE
                .captures(text)
                .map(|caps| caps[1].to_string())
        })
        .map(|range| range.trim().to_string());

    ManifestFacts { version, idf_range }
}

/// Check the ESP-IDF range declared by the manifest in `checkout`.
pub fn check(checkout: &Checkout, toolchain: &Version) -> EvidenceRecord {
    let mut details = vec![format!("{NAME} git describe: {}", checkout.revision)];

    let Some(text) = read_lossy(&checkout.path.join(MANIFEST)) else {
        return EvidenceRecord::fail(
            format!("{NAME} {MANIFEST} not found (no dependency evidence)"),
            details,
        );
    };

    let facts = extract(&text);
    if let Some(version) = &facts.version {
        details.push(format!("{NAME} manifest version: {version}"));
    }

    let Some(constraint) = facts.idf_range else {
        return EvidenceRecord::fail(
            format!("{NAME} idf dependency range not found in manifest"),
            details,
        );
    };

    details.push(format!("{NAME} manifest idf dependency: {constraint}"));
    if evaluate(toolchain, &constraint) {
        EvidenceRecord::pass(
            format!("{NAME} manifest constraint '{constraint}' matches ESP-IDF version"),
            details,
        )
    } else {
        EvidenceRecord::fail(
            format!("{NAME} manifest constraint '{constraint}' does not match ESP-IDF version"),
            details,
        )
    }
}
