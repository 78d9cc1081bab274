// Single source of truth for all default values.

// --- Monitor ---
pub const DEFAULT_MONITOR_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_RESOLVED_GRACE_SECS: u64 = 60;
pub const DEFAULT_HISTORY_CAPACITY: usize = 10_000;
pub const DEFAULT_TODAY_TOP_METHODS: usize = 10;
pub const DEFAULT_DELIVERY_TIMEOUT_MS: u64 = 5_000;

// --- Thresholds ---
pub const DEFAULT_ERROR_RATE_WARNING: f64 = 5.0; // percent
pub const DEFAULT_ERROR_RATE_CRITICAL: f64 = 15.0;
pub const DEFAULT_RESPONSE_TIME_WARNING_MS: f64 = 1_000.0;
pub const DEFAULT_RESPONSE_TIME_CRITICAL_MS: f64 = 5_000.0;
pub const DEFAULT_COMPAT_ISSUES_WARNING: f64 = 10.0;
pub const DEFAULT_COMPAT_ISSUES_CRITICAL: f64 = 50.0;
pub const DEFAULT_UNSUPPORTED_USAGE_WARNING: f64 = 1.0;
pub const DEFAULT_UNSUPPORTED_USAGE_CRITICAL: f64 = 10.0;

// --- Executor ---
pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_VALIDATE_BEFORE_EXECUTE: bool = true;

// --- Ranking ---
pub const DEFAULT_LEADERBOARD_RETRY_LIMIT: usize = 5;

// --- Logging ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
