//! Support-matrix evidence (ESP-ADF).
//!
//! ESP-ADF documents which ESP-IDF release lines each of its own releases
//! supports in a Markdown table at the top of its `README.md`:
//!
//! ```text
//! |                       | ESP-IDF <br> Release/v5.2 | ESP-IDF <br> Release/v5.3 |
//! |:---------------------:|:---:|:---:|
//! | ESP-ADF <br> Release/v2.7 | <img src="yes-checkm.png"> | <img src="no-icon.png"> |
//! ```
//!
//! The column is chosen by the toolchain's `major.minor` line and the row by
//! the checkout's `git describe` output. Only the intersecting cell decides.

use std::sync::LazyLock;

use regex::Regex;

use super::{read_lossy, Checkout, EvidenceRecord};
use crate::version::Version;

const NAME: &str = "ESP-ADF";
const DOCUMENT: &str = "README.md";

/// Literal prefix of the matrix header row.
pub const HEADER_PREFIX: &str = "|                       | ESP-IDF";

/// Cell substrings that affirm support.
pub const SUPPORT_MARKERS: &[&str] = &["yes-checkm", "\"supported\""];

/// Cell substrings that deny support.
pub const NON_SUPPORT_MARKERS: &[&str] = &["no-icon", "not supported"];

static RELEASE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v(\d+\.\d+)").expect("release tag pattern is valid"));

/// Classification of a matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellVerdict {
    Supported,
    NotSupported,
    Ambiguous,
}

/// Classify cell text. Conflicting or absent markers are ambiguous.
pub fn classify_cell(cell: &str) -> CellVerdict {
    let supported = SUPPORT_MARKERS.iter().any(|m| cell.contains(m));
    let denied = NON_SUPPORT_MARKERS.iter().any(|m| cell.contains(m));
    match (supported, denied) {
        (true, false) => CellVerdict::Supported,
        (false, true) => CellVerdict::NotSupported,
        _ => CellVerdict::Ambiguous,
    }
}

/// Map a revision description to the matrix row key.
///
/// `v2.7-14-gabc` and `v2.7-dirty` map to the `Release/v2.7` row; anything
/// mentioning `master` maps to the `Master` row.
pub fn row_key(revision: &str) -> Option<String> {
    let tag = revision.split('-').next().unwrap_or_default();
    if let Some(caps) = RELEASE_TAG_RE.captures(tag) {
        return Some(format!("{NAME} <br> Release/v{}", &caps[1]));
    }
    if revision.to_lowercase().contains("master") {
        return Some(format!("{NAME} <br> Master"));
    }
    None
}

fn split_row(line: &str) -> Vec<&str> {
    line.trim().trim_matches('|').split('|').map(str::trim).collect()
}

/// Check the support matrix in `checkout` for the toolchain's release line.
pub fn check(checkout: &Checkout, toolchain: &Version) -> EvidenceRecord {
    let mut details = vec![format!("{NAME} git describe: {}", checkout.revision)];

    let Some(text) = read_lossy(&checkout.path.join(DOCUMENT)) else {
        return EvidenceRecord::fail(
            format!("{NAME} {DOCUMENT} not found (no matrix evidence)"),
            details,
        );
    };
    let lines: Vec<&str> = text.lines().collect();

    let Some(header) = lines.iter().find(|l| l.starts_with(HEADER_PREFIX)) else {
        return EvidenceRecord::fail(
            format!("{NAME} compatibility table header not found in {DOCUMENT}"),
            details,
        );
    };

    let line = toolchain.release_line();
    let column_label = format!("Release/v{line}");
    let Some(column) = split_row(header)
        .iter()
        .position(|cell| cell.contains(&column_label))
    else {
        details.push(format!("ADF README matrix header: {header}"));
        return EvidenceRecord::fail(
            format!("{NAME} README matrix does not explicitly list ESP-IDF v{line}"),
            details,
        );
    };
    tracing::debug!("Matrix column {} is {}", column, column_label);

    let Some(key) = row_key(&checkout.revision) else {
        details.push(format!(
            "Unable to map {NAME} version to README matrix row (non-release/non-master checkout)."
        ));
        return EvidenceRecord::fail(
            format!("Cannot map {NAME} checkout to matrix row; need explicit compatibility evidence"),
            details,
        );
    };

    let Some(row) = lines.iter().find(|l| l.contains(&key)) else {
        details.push(format!("Expected row key: {key}"));
        return EvidenceRecord::fail(
            format!("{NAME} matrix row for current version not found"),
            details,
        );
    };

    let cells = split_row(row);
    let Some(cell) = cells.get(column) else {
        details.push(format!("Row line: {row}"));
        return EvidenceRecord::fail(
            format!("{NAME} matrix row parse failed (column mismatch)"),
            details,
        );
    };

    details.push(format!("ADF matrix row: {row}"));
    details.push(format!("ADF matrix cell for ESP-IDF v{line}: {cell}"));

    match classify_cell(cell) {
        CellVerdict::Supported => EvidenceRecord::pass(
            format!("{NAME} matrix explicitly supports ESP-IDF v{line}"),
            details,
        ),
        CellVerdict::NotSupported => EvidenceRecord::fail(
            format!("{NAME} matrix marks ESP-IDF v{line} as not supported"),
            details,
        ),
        CellVerdict::Ambiguous => EvidenceRecord::fail(
            format!("{NAME} matrix cell is ambiguous; need explicit evidence"),
            details,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const YES: &str = r#"<img src="docs/_static/yes-checkm.png">"#;
    const NO: &str = r#"<img src="docs/_static/no-icon.png">"#;

    fn matrix(rows: &[(&str, &str, &str)]) -> String {
        let mut doc = String::from("# Espressif Audio Development Framework\n\n");
        doc.push_str(&format!(
            "{HEADER_PREFIX} <br> Release/v5.2 | ESP-IDF <br> Release/v5.3 |\n"
        ));
        doc.push_str("|:---:|:---:|:---:|\n");
        for (label, a, b) in rows {
            doc.push_str(&format!("| {label} | {a} | {b} |\n"));
        }
        doc
    }

    fn checkout_with(readme: Option<&str>, revision: &str) -> (TempDir, Checkout) {
        let temp = TempDir::new().unwrap();
        if let Some(body) = readme {
            fs::write(temp.path().join("README.md"), body).unwrap();
        }
        let checkout = Checkout::new(temp.path(), revision);
        (temp, checkout)
    }

    const V531: Version = Version::new(5, 3, 1);

    #[test]
    fn supported_cell_passes() {
        let doc = matrix(&[("ESP-ADF <br> Release/v2.7", NO, YES)]);
        let (_t, co) = checkout_with(Some(&doc), "v2.7");
        let rec = check(&co, &V531);
        assert!(rec.ok, "{rec:?}");
        assert_eq!(rec.summary, "ESP-ADF matrix explicitly supports ESP-IDF v5.3");
        assert_eq!(rec.details[0], "ESP-ADF git describe: v2.7");
        assert!(rec.details.iter().any(|d| d.contains(YES)));
    }

    #[test]
    fn non_support_marker_fails_with_dirty_checkout() {
        let doc = matrix(&[("ESP-ADF <br> Release/v2.7", YES, NO)]);
        let (_t, co) = checkout_with(Some(&doc), "v2.7-dirty");
        let rec = check(&co, &V531);
        assert!(!rec.ok);
        assert!(rec.summary.contains("not supported"));
        assert_eq!(
            rec.details.last().unwrap(),
            &format!("ADF matrix cell for ESP-IDF v5.3: {NO}")
        );
    }

    #[test]
    fn missing_readme_fails() {
        let (_t, co) = checkout_with(None, "v2.7");
        let rec = check(&co, &V531);
        assert!(!rec.ok);
        assert_eq!(rec.summary, "ESP-ADF README.md not found (no matrix evidence)");
    }

    #[test]
    fn missing_header_fails() {
        let (_t, co) = checkout_with(Some("# ESP-ADF\n\nno table here\n"), "v2.7");
        let rec = check(&co, &V531);
        assert!(!rec.ok);
        assert_eq!(
            rec.summary,
            "ESP-ADF compatibility table header not found in README.md"
        );
    }

    #[test]
    fn missing_column_fails() {
        let doc = matrix(&[("ESP-ADF <br> Release/v2.7", YES, YES)]);
        let (_t, co) = checkout_with(Some(&doc), "v2.7");
        let rec = check(&co, &Version::new(5, 4, 0));
        assert!(!rec.ok);
        assert_eq!(
            rec.summary,
            "ESP-ADF README matrix does not explicitly list ESP-IDF v5.4"
        );
        assert!(rec.details[1].starts_with("ADF README matrix header: "));
    }

    #[test]
    fn unmapped_revision_fails() {
        let doc = matrix(&[("ESP-ADF <br> Release/v2.7", YES, YES)]);
        let (_t, co) = checkout_with(Some(&doc), "a1b2c3d");
        let rec = check(&co, &V531);
        assert!(!rec.ok);
        assert!(rec.summary.starts_with("Cannot map ESP-ADF checkout"));
    }

    #[test]
    fn missing_row_fails() {
        let doc = matrix(&[("ESP-ADF <br> Release/v2.6", YES, YES)]);
        let (_t, co) = checkout_with(Some(&doc), "v2.7");
        let rec = check(&co, &V531);
        assert!(!rec.ok);
        assert_eq!(rec.summary, "ESP-ADF matrix row for current version not found");
        assert_eq!(
            rec.details.last().unwrap(),
            "Expected row key: ESP-ADF <br> Release/v2.7"
        );
    }

    #[test]
    fn short_row_is_column_mismatch() {
        let mut doc = matrix(&[]);
        doc.push_str(&format!("| ESP-ADF <br> Release/v2.7 | {YES} |\n"));
        let (_t, co) = checkout_with(Some(&doc), "v2.7");
        let rec = check(&co, &V531);
        assert!(!rec.ok);
        assert_eq!(rec.summary, "ESP-ADF matrix row parse failed (column mismatch)");
    }

    #[test]
    fn empty_cell_is_ambiguous() {
        let doc = matrix(&[("ESP-ADF <br> Release/v2.7", YES, "")]);
        let (_t, co) = checkout_with(Some(&doc), "v2.7");
        let rec = check(&co, &V531);
        assert!(!rec.ok);
        assert_eq!(rec.summary, "ESP-ADF matrix cell is ambiguous; need explicit evidence");
    }

    #[test]
    fn master_checkout_uses_master_row() {
        let doc = matrix(&[("ESP-ADF <br> Master", NO, YES)]);
        let (_t, co) = checkout_with(Some(&doc), "heads/master-0-gdeadbee");
        assert!(check(&co, &V531).ok);
    }

    #[test]
    fn row_key_mapping() {
        assert_eq!(
            row_key("v2.7-14-g1234567-dirty").as_deref(),
            Some("ESP-ADF <br> Release/v2.7")
        );
        assert_eq!(
            row_key("v2.7.1").as_deref(),
            Some("ESP-ADF <br> Release/v2.7")
        );
        assert_eq!(row_key("Master").as_deref(), Some("ESP-ADF <br> Master"));
        assert_eq!(row_key("1a2b3c4"), None);
        assert_eq!(row_key(""), None);
    }

    #[test]
    fn conflicting_markers_are_ambiguous() {
        assert_eq!(classify_cell(YES), CellVerdict::Supported);
        assert_eq!(classify_cell(r#"alt="supported""#), CellVerdict::Supported);
        assert_eq!(classify_cell(NO), CellVerdict::NotSupported);
        assert_eq!(classify_cell("not supported"), CellVerdict::NotSupported);
        assert_eq!(
            classify_cell(&format!("{YES} {NO}")),
            CellVerdict::Ambiguous
        );
        assert_eq!(classify_cell("limited"), CellVerdict::Ambiguous);
        assert_eq!(classify_cell(""), CellVerdict::Ambiguous);
    }
}
