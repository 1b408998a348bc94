//! The audit state machine.
//!
//! A run moves through [`Phase`]s in a fixed order:
//!
//! ```text
//! ResolvingToolchain -> DetectingUsage -> AuditingFrameworks
//!     -> ReconcilingCrossStack -> Finalizing
//! ```
//!
//! Only a toolchain failure short-circuits to `Finalizing`. Per-framework
//! failures are counted and the run carries on, so the report always shows
//! every check that could be made.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;

use super::report::ReportBuilder;
use crate::config::{resolve_checkout, AuditConfig};
use crate::detection::{detect_usage_with, UsageDetector, REQUIRED_PLUGINS_ENV};
use crate::error::Result;
use crate::evidence::{reconcile, Checkout, CrossStackInput, EvidenceRecord};
use crate::framework::{Framework, TOOLCHAIN_ID};
use crate::shell::Host;
use crate::version::{parse_version, Version};

/// Stage of an audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ResolvingToolchain,
    DetectingUsage,
    AuditingFrameworks,
    ReconcilingCrossStack,
    Finalizing,
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every check passed, or none was required.
    Pass,
    /// At least one evidence check failed.
    ChecksFailed,
    /// The toolchain version could not be determined.
    PreconditionFailed,
}

impl Verdict {
    /// Process exit code for this verdict.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Pass => 0,
            Self::PreconditionFailed => 1,
            Self::ChecksFailed => 2,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Result of auditing one in-use framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameworkAudit {
    pub framework: String,
    /// Located checkout, if any.
    pub checkout: Option<PathBuf>,
    pub record: EvidenceRecord,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AuditOutcome {
    pub verdict: Verdict,
    pub project_dir: PathBuf,
    /// Parsed toolchain version, if resolution succeeded.
    pub toolchain: Option<String>,
    pub used_plugins: BTreeSet<String>,
    pub frameworks: Vec<FrameworkAudit>,
    pub cross_stack: Option<EvidenceRecord>,
    pub failures: usize,
    pub report_path: PathBuf,
    /// Report lines as persisted.
    pub report: Vec<String>,
}

/// Mutable state of one run, owned by the phase loop.
struct RunState {
    report: ReportBuilder,
    toolchain: Option<Version>,
    used: BTreeSet<String>,
    versions: BTreeMap<String, String>,
    frameworks: Vec<FrameworkAudit>,
    cross_stack: Option<EvidenceRecord>,
    failures: usize,
}

/// Runs one audit against a project.
pub struct Auditor<'a> {
    config: &'a AuditConfig,
    host: &'a dyn Host,
    detector: &'a dyn UsageDetector,
}

impl<'a> Auditor<'a> {
    pub fn new(config: &'a AuditConfig, host: &'a dyn Host, detector: &'a dyn UsageDetector) -> Self {
        Self {
            config,
            host,
            detector,
        }
    }

    /// Run every phase and persist the report.
    ///
    /// Evidence failures are reported through the returned verdict; `Err` is
    /// reserved for failing to write the report.
    pub fn run(&self) -> Result<AuditOutcome> {
        let mut state = RunState {
            report: ReportBuilder::new(),
            toolchain: None,
            used: BTreeSet::new(),
            versions: BTreeMap::new(),
            frameworks: Vec::new(),
            cross_stack: None,
            failures: 0,
        };

        let mut phase = Phase::ResolvingToolchain;
        loop {
            tracing::debug!("Audit phase: {:?}", phase);
            phase = match phase {
                Phase::ResolvingToolchain => self.resolve_toolchain(&mut state),
                Phase::DetectingUsage => self.detect_usage(&mut state),
                Phase::AuditingFrameworks => self.audit_frameworks(&mut state),
                Phase::ReconcilingCrossStack => self.reconcile_cross_stack(&mut state),
                Phase::Finalizing => return self.finalize(state),
            };
        }
    }

    fn resolve_toolchain(&self, state: &mut RunState) -> Phase {
        state
            .report
            .meta("project_dir", self.config.project_dir.display());

        let resolved = self
            .host
            .toolchain_version()
            .and_then(|raw| parse_version(&raw).map(|v| (raw, v)));

        match resolved {
            Ok((raw, version)) => {
                tracing::info!("ESP-IDF version {}", version);
                state.report.meta("esp-idf", raw);
                state.report.meta("esp-idf-semver", version);
                state.versions.insert(
                    TOOLCHAIN_ID.to_string(),
                    format!("v{}", version.release_line()),
                );
                state.toolchain = Some(version);
                Phase::DetectingUsage
            }
            Err(e) => {
                tracing::error!("ESP-IDF preflight failed: {}", e);
                state.report.outcome(false, &format!("ESP-IDF preflight failed: {e}"));
                Phase::Finalizing
            }
        }
    }

    fn detect_usage(&self, state: &mut RunState) -> Phase {
        state.used = detect_usage_with(
            &self.config.project_dir,
            self.config.required_plugins.as_deref(),
            self.detector,
        );

        for id in state.used.iter().filter(|id| Framework::from_id(id).is_none()) {
            tracing::warn!("Unknown framework '{}' has no compatibility evidence source", id);
        }

        let listed = if state.used.is_empty() {
            "none".to_string()
        } else {
            state.used.iter().cloned().collect::<Vec<_>>().join(",")
        };
        tracing::info!("Frameworks in use: {}", listed);
        state.report.meta("used-plugins", listed);
        Phase::AuditingFrameworks
    }

    fn audit_frameworks(&self, state: &mut RunState) -> Phase {
        let Some(toolchain) = state.toolchain else {
            return Phase::Finalizing;
        };

        for fw in Framework::ALL {
            if !state.used.contains(fw.id()) {
                continue;
            }

            let Some(dir) = resolve_checkout(&self.config.checkout_candidates(fw)) else {
                let sources = fw.checkout_env_vars().join("/");
                let summary = format!("{} is used but {sources}/local repo was not found", fw.id());
                state.report.outcome(false, &summary);
                state.failures += 1;
                state.frameworks.push(FrameworkAudit {
                    framework: fw.id().to_string(),
                    checkout: None,
                    record: EvidenceRecord::fail(summary, Vec::new()),
                });
                continue;
            };

            state.report.meta(&format!("{}-dir", fw.id()), dir.display());
            let record = match self.host.describe_revision(&dir) {
                Ok(revision) => {
                    state.versions.insert(fw.id().to_string(), revision.clone());
                    fw.evidence_source()
                        .evaluate(&Checkout::new(&dir, revision), &toolchain)
                }
                Err(e) => {
                    state.versions.insert(fw.id().to_string(), String::new());
                    EvidenceRecord::fail(
                        format!(
                            "{} checkout revision could not be described; no evidence identity",
                            fw.display_name()
                        ),
                        e.to_string().lines().map(str::to_string).collect(),
                    )
                }
            };

            tracing::info!(
                "{}: {} ({})",
                fw,
                if record.ok { "ok" } else { "failed" },
                record.summary
            );
            state.report.record(&record);
            if !record.ok {
                state.failures += 1;
            }
            state.frameworks.push(FrameworkAudit {
                framework: fw.id().to_string(),
                checkout: Some(dir),
                record,
            });
        }

        Phase::ReconcilingCrossStack
    }

    fn reconcile_cross_stack(&self, state: &mut RunState) -> Phase {
        if state.used.is_empty() {
            state.report.outcome(
                true,
                "No known plugin frameworks detected; no plugin compatibility checks required.",
            );
            state.report.line(format!(
                "      Set {REQUIRED_PLUGINS_ENV}=esp-adf,esp-sr to force checks."
            ));
            return Phase::Finalizing;
        }

        let record = reconcile(&CrossStackInput {
            project_dir: &self.config.project_dir,
            used: &state.used,
            versions: &state.versions,
            attestation: self.config.stack_evidence.as_deref(),
        });
        state.report.record(&record);
        if !record.ok {
            state.failures += 1;
        }
        state.cross_stack = Some(record);
        Phase::Finalizing
    }

    fn finalize(&self, mut state: RunState) -> Result<AuditOutcome> {
        let verdict = match (state.toolchain, state.failures) {
            (None, _) => Verdict::PreconditionFailed,
            (Some(_), 0) => Verdict::Pass,
            (Some(_), _) => Verdict::ChecksFailed,
        };

        if state.toolchain.is_some() {
            let result = if verdict.is_pass() { "PASS" } else { "FAIL" };
            state.report.meta("result", result);
        }

        let report_path = self.config.report_path();
        state.report.persist(&report_path)?;

        Ok(AuditOutcome {
            verdict,
            project_dir: self.config.project_dir.clone(),
            toolchain: state.toolchain.map(|v| v.to_string()),
            used_plugins: state.used,
            frameworks: state.frameworks,
            cross_stack: state.cross_stack,
            failures: state.failures,
            report_path,
            report: state.report.into_lines(),
        })
    }
}
