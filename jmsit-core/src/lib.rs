//! # jmsit core
//!
//! Test-matrix generation and cross-process verification for JMS-over-AMQP
//! client interoperability.
//!
//! ## Overview
//!
//! Given N client shims, every ordered (sender, receiver) pair is exercised
//! for every active JMS message kind with boundary-value bodies and header
//! variants. A message sent by one shim must come back from the other
//! structurally identical.
//!
//! - [`table`]: curated boundary-value domains per message kind and header
//! - [`builder`]: expansion of the table into immutable [`TestCase`]s
//! - [`runner`]: receiver-then-sender execution of one case under a deadline
//! - [`oracle`]: exact field-by-field comparison
//! - [`driver`]: the suite loop, filters and aggregate outcome
//! - [`shim`]: the launch seam and its subprocess implementation
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use jmsit_core::{
//!     CommandSpec, ShimHandle, SubprocessShim, SuiteConfig, TestSuiteDriver,
//!     TypeDomainTable,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let shim = SubprocessShim::new(
//!     "ProtonPython",
//!     CommandSpec::new("JmsSenderShim.py", Vec::<String>::new()),
//!     CommandSpec::new("JmsReceiverShim.py", Vec::<String>::new()),
//! );
//! let shims: Vec<Arc<dyn ShimHandle>> = vec![Arc::new(shim)];
//!
//! let driver = TestSuiteDriver::new(TypeDomainTable::jms(), shims);
//! let report = driver.run(&SuiteConfig::default(), |_| {}).await?;
//! std::process::exit(report.exit_code().into());
//! # }
//! ```

#![allow(missing_docs)]

pub mod broker;
pub mod builder;
pub mod case;
pub mod driver;
pub mod error;
pub mod oracle;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod shim;
pub mod skip;
pub mod table;

pub use broker::{
    BrokerIdentity, BrokerProbe, BrokerProperties, CommandBrokerProbe,
    NoBrokerProbe,
};
pub use builder::{BuilderOptions, ShimPair, TestCaseBuilder, shim_pairs};
pub use case::{CaseId, HeaderVariant, PropertyVariant, TestCase, Variant};
pub use driver::{
    CaseResult, DEFAULT_BROKER, PlannedCase, SuiteConfig, SuiteCounts,
    SuiteReport, TestSuiteDriver,
};
pub use error::{LaunchError, SuiteError};
pub use oracle::{ReceivedMessage, SentMessage, compare};
pub use outcome::{
    CompletedUnit, FieldMismatch, Failure, ReceivedField, TestOutcome,
    TimedOutUnit,
};
pub use runner::{CrossProcessRunner, DEFAULT_SHIM_TIMEOUT, queue_name};
pub use shim::{
    CommandSpec, DECODE_HINTS_ENV, LaunchRequest, Role, RunningShim,
    ShimExit, ShimHandle, ShimOutput, SubprocessShim,
};
pub use skip::{SkipRule, SkipRules};
pub use table::TypeDomainTable;
