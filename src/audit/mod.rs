//! Audit orchestration.
//!
//! - [`auditor`] - the phase-driven audit run
//! - [`report`] - the append-only report it produces

pub mod auditor;
pub mod report;

pub use auditor::{AuditOutcome, Auditor, FrameworkAudit, Phase, Verdict};
pub use report::ReportBuilder;
