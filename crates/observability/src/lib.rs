//! Process-wide logging setup.

/// Initialize tracing with the format named by `LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .map(|s| LogFormat::from_str_lossy(&s))
        .unwrap_or_default();
    self::tracing::init(format);
}

/// Subscriber configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;
