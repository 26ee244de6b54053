// Package identity, baked in at build time

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// "name vX.Y.Z", logged once at startup.
pub fn banner() -> String {
    format!("{} v{}", NAME, VERSION)
}
