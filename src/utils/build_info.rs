//! Build metadata stamped in by `build.rs`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub revision: &'static str,
    pub built_at: &'static str,
    pub profile: &'static str,
}

pub fn current() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        revision: option_env!("MYMONEY_BUILD_REVISION").unwrap_or("unknown"),
        built_at: option_env!("MYMONEY_BUILD_TIMESTAMP").unwrap_or("unknown"),
        profile: option_env!("MYMONEY_BUILD_PROFILE").unwrap_or("unknown"),
    }
}
