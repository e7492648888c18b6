//! Suite control loop.
//!
//! Stages run in a fixed order: resolve the active shims, discover the
//! broker, build every case, execute them one at a time, and hand back a
//! report. Startup problems abort before the first case; case failures never
//! do.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jmsit_model::MessageKind;
use tracing::{info, warn};

use crate::broker::{BrokerIdentity, BrokerProbe, NoBrokerProbe};
use crate::builder::{BuilderOptions, TestCaseBuilder, shim_pairs};
use crate::case::{CaseId, TestCase};
use crate::error::SuiteError;
use crate::outcome::TestOutcome;
use crate::runner::{CrossProcessRunner, DEFAULT_SHIM_TIMEOUT};
use crate::shim::ShimHandle;
use crate::table::TypeDomainTable;

pub const DEFAULT_BROKER: &str = "localhost:5672";

/// Per-run selection and execution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    pub broker: String,
    pub timeout: Duration,
    pub exclude_kinds: Vec<MessageKind>,
    pub exclude_shims: Vec<String>,
    /// Exact case identifiers; empty runs everything.
    pub only_cases: Vec<String>,
    pub builder: BuilderOptions,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            broker: DEFAULT_BROKER.to_string(),
            timeout: DEFAULT_SHIM_TIMEOUT,
            exclude_kinds: Vec::new(),
            exclude_shims: Vec::new(),
            only_cases: Vec::new(),
            builder: BuilderOptions::default(),
        }
    }
}

/// A built case together with the skip rule that gates it, if any.
#[derive(Debug, Clone)]
pub struct PlannedCase {
    pub case: TestCase,
    pub skip: Option<String>,
}

#[derive(Debug)]
pub struct CaseResult {
    pub id: CaseId,
    pub outcome: TestOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteCounts {
    pub ran: usize,
    pub passed: usize,
    pub failures: usize,
    pub errors: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub struct SuiteReport {
    pub broker: BrokerIdentity,
    pub results: Vec<CaseResult>,
    pub elapsed: Duration,
}

impl SuiteReport {
    pub fn counts(&self) -> SuiteCounts {
        let mut counts = SuiteCounts {
            ran: self.results.len(),
            ..SuiteCounts::default()
        };
        for result in &self.results {
            match &result.outcome {
                TestOutcome::Pass => counts.passed += 1,
                TestOutcome::Skipped(_) => counts.skipped += 1,
                TestOutcome::Fail(failure) if failure.is_error() => {
                    counts.errors += 1
                }
                TestOutcome::Fail(_) => counts.failures += 1,
            }
        }
        counts
    }

    /// True when no executed case failed; skips do not count against it.
    pub fn is_success(&self) -> bool {
        let counts = self.counts();
        counts.failures == 0 && counts.errors == 0
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

pub struct TestSuiteDriver {
    table: TypeDomainTable,
    shims: Vec<Arc<dyn ShimHandle>>,
    probe: Box<dyn BrokerProbe>,
}

impl fmt::Debug for TestSuiteDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSuiteDriver")
            .field("shims", &self.shims)
            .finish_non_exhaustive()
    }
}

impl TestSuiteDriver {
    pub fn new(table: TypeDomainTable, shims: Vec<Arc<dyn ShimHandle>>) -> Self {
        Self {
            table,
            shims,
            probe: Box::new(NoBrokerProbe),
        }
    }

    pub fn with_probe(mut self, probe: impl BrokerProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn table(&self) -> &TypeDomainTable {
        &self.table
    }

    pub fn shims(&self) -> &[Arc<dyn ShimHandle>] {
        &self.shims
    }

    /// Configured shims minus `exclude`, in configured order. The registry
    /// itself is left untouched.
    pub fn active_shims(
        &self,
        exclude: &[String],
    ) -> Result<Vec<Arc<dyn ShimHandle>>, SuiteError> {
        if self.shims.is_empty() {
            return Err(SuiteError::NoShims);
        }

        let mut names = HashSet::new();
        for shim in &self.shims {
            if !names.insert(shim.name()) {
                return Err(SuiteError::DuplicateShim(shim.name().to_string()));
            }
        }
        if let Some(unknown) =
            exclude.iter().find(|name| !names.contains(name.as_str()))
        {
            let mut known: Vec<_> = names.into_iter().collect();
            known.sort_unstable();
            return Err(SuiteError::UnknownShim {
                name: unknown.clone(),
                known: known.join(", "),
            });
        }

        let active: Vec<_> = self
            .shims
            .iter()
            .filter(|shim| !exclude.iter().any(|name| name == shim.name()))
            .cloned()
            .collect();
        if active.is_empty() {
            return Err(SuiteError::AllShimsExcluded);
        }
        Ok(active)
    }

    /// Every selected case in execution order, annotated with the skip
    /// reason for `broker_product`.
    pub fn plan(
        &self,
        config: &SuiteConfig,
        broker_product: &str,
    ) -> Result<Vec<PlannedCase>, SuiteError> {
        let shims = self.active_shims(&config.exclude_shims)?;
        let pairs = shim_pairs(&shims);
        let builder =
            TestCaseBuilder::new(&self.table).with_options(config.builder);

        let mut seen = HashSet::new();
        let mut planned = Vec::new();
        for kind in self.table.kinds() {
            if config.exclude_kinds.contains(&kind) {
                continue;
            }
            let skip = self
                .table
                .should_skip(kind, broker_product)
                .map(str::to_string);
            for case in builder.build_kind(kind, &pairs) {
                if !seen.insert(case.id().clone()) {
                    return Err(SuiteError::DuplicateCaseId(
                        case.id().to_string(),
                    ));
                }
                planned.push(PlannedCase {
                    case,
                    skip: skip.clone(),
                });
            }
        }

        if config.only_cases.is_empty() {
            return Ok(planned);
        }
        if let Some(missing) = config
            .only_cases
            .iter()
            .find(|id| !planned.iter().any(|p| p.case.id().as_str() == *id))
        {
            return Err(SuiteError::UnknownCase(missing.clone()));
        }
        planned.retain(|p| {
            config.only_cases.iter().any(|id| id == p.case.id().as_str())
        });
        Ok(planned)
    }

    /// Identifiers of the selected cases, without contacting the broker.
    pub fn case_ids(
        &self,
        config: &SuiteConfig,
    ) -> Result<Vec<CaseId>, SuiteError> {
        Ok(self
            .plan(config, BrokerIdentity::Unknown.product())?
            .into_iter()
            .map(|planned| planned.case.id().clone())
            .collect())
    }

    /// Run every selected case. `on_result` sees each outcome as soon as it
    /// is known.
    pub async fn run<F>(
        &self,
        config: &SuiteConfig,
        mut on_result: F,
    ) -> Result<SuiteReport, SuiteError>
    where
        F: FnMut(&CaseResult),
    {
        let started = Instant::now();
        self.active_shims(&config.exclude_shims)?;

        let broker = self.probe.probe(&config.broker).await;
        match broker.describe() {
            Some(description) => info!(target: "suite::summary", "{description}"),
            None => warn!(
                broker = %config.broker,
                "unable to get connection properties - unknown broker"
            ),
        }

        let planned = self.plan(config, broker.product())?;
        info!(
            target: "suite::summary",
            cases = planned.len(),
            broker = %config.broker,
            "starting suite"
        );

        let runner = CrossProcessRunner::new(&config.broker, config.timeout);
        let mut results = Vec::with_capacity(planned.len());
        for PlannedCase { case, skip } in planned {
            let outcome = match skip {
                Some(reason) => {
                    info!(id = %case.id(), %reason, "skipping case");
                    TestOutcome::Skipped(reason)
                }
                None => runner.execute(&case).await,
            };
            let result = CaseResult {
                id: case.id().clone(),
                outcome,
            };
            on_result(&result);
            results.push(result);
        }

        let report = SuiteReport {
            broker,
            results,
            elapsed: started.elapsed(),
        };
        let counts = report.counts();
        info!(
            target: "suite::summary",
            ran = counts.ran,
            passed = counts.passed,
            failures = counts.failures,
            errors = counts.errors,
            skipped = counts.skipped,
            elapsed = ?report.elapsed,
            "suite finished"
        );
        Ok(report)
    }
}
