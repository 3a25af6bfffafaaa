//! Build-time information
//!
//! Metadata captured at compile time by the build script: build timestamp,
//! cargo configuration and compiler version.

/// Build timestamp (when the binary was compiled)
pub const BUILD_TIMESTAMP: &str = env!("VERGEN_BUILD_TIMESTAMP");

/// Cargo optimization level (0, 1, 2, 3, s, z)
pub const CARGO_OPT_LEVEL: &str = env!("VERGEN_CARGO_OPT_LEVEL");

/// Target triple (e.g., x86_64-unknown-linux-gnu)
pub const CARGO_TARGET_TRIPLE: &str = env!("VERGEN_CARGO_TARGET_TRIPLE");

pub const RUSTC_SEMVER: &str = env!("VERGEN_RUSTC_SEMVER");

pub const RUSTC_CHANNEL: &str = env!("VERGEN_RUSTC_CHANNEL");

pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short version line, e.g. `interface-manager 0.1.0 (x86_64-unknown-linux-gnu-opt3)`
pub fn version_string() -> String {
    format!(
        "{} {} ({}-opt{})",
        env!("CARGO_PKG_NAME"),
        PKG_VERSION,
        CARGO_TARGET_TRIPLE,
        CARGO_OPT_LEVEL
    )
}

/// Multi-line build report used by the diagnostics
pub fn detailed_info() -> String {
    format!(
        "Version: {}\nBuilt: {}\nTarget: {}\nOptimization: {}\nRustc: {} ({})",
        PKG_VERSION, BUILD_TIMESTAMP, CARGO_TARGET_TRIPLE, CARGO_OPT_LEVEL, RUSTC_SEMVER, RUSTC_CHANNEL
    )
}
