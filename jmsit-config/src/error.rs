use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ConfigGuardRailError;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error(
        "no shim registry found: pass --shims, set JMSIT_SHIMS_PATH or \
         JMSIT_SHIMS_JSON, add jmsit.toml, or set QPID_INTEROP_TEST_HOME"
    )]
    NotFound,
    #[error("failed to load shim registry from {origin}")]
    Registry {
        origin: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("incomplete QPID_INTEROP_TEST_HOME at {home}")]
    TestHome {
        home: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
}
