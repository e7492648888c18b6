pub mod registry;
pub mod test_home;

pub use registry::{
    ShimConfig, ShimRegistry, ShimRegistryConfig, ShimRegistrySource,
    SkipConfig,
};
