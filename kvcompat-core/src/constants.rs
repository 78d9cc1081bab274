/// Compatibility layer version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commands whose absence on the host is signalled by a dedicated error
/// signature; they are always treated as compatibility failures.
pub const MISSING_RANK_COMMANDS: &[&str] = &["zrank", "zrevrank"];

/// Maximum number of operation records retained by the sliding metrics window.
pub const METRICS_WINDOW_SIZE: usize = 1000;
