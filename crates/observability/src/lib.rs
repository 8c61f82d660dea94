//! Tracing/logging setup shared by the binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide tracing with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::Json);
}

/// Initialize process-wide tracing with the given output format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}
