use std::io;

use thiserror::Error;

use crate::shim::Role;

/// A shim process could not be started.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to spawn {role} for shim '{shim}' ({program}): {source}")]
    Spawn {
        shim: String,
        role: Role,
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode {role} payload")]
    Payload {
        role: Role,
        #[source]
        source: serde_json::Error,
    },
}

/// Startup errors; raised before any case runs.
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("no shims configured")]
    NoShims,
    #[error("no shims left after exclusions")]
    AllShimsExcluded,
    #[error("unknown shim '{name}' (configured: {known})")]
    UnknownShim { name: String, known: String },
    #[error("duplicate shim name '{0}'")]
    DuplicateShim(String),
    #[error("duplicate test case identifier '{0}'")]
    DuplicateCaseId(String),
    #[error("no test case named '{0}'")]
    UnknownCase(String),
}
