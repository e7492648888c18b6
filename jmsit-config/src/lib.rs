//! Shim registry configuration for jmsit.
//!
//! A registry names every client shim, the argv used to start its sender and
//! receiver, the per-process timeout, an optional broker probe command and
//! any broker skip rules. Files are TOML or JSON; see [`loader`] for the
//! resolution order.

#![allow(missing_docs)]

pub mod error;
pub mod loader;
pub mod models;
pub mod validation;

pub use error::ConfigLoadError;
pub use loader::{ConfigLoad, LoadContext, SHIMS_JSON_ENV, SHIMS_PATH_ENV, load};
pub use models::test_home::TEST_HOME_ENV;
pub use models::{
    ShimConfig, ShimRegistry, ShimRegistryConfig, ShimRegistrySource,
    SkipConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
