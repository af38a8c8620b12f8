//! Tracing/logging setup shared by binaries and integration harnesses that
//! embed the cart.

/// Initialize process-wide tracing with the default `info` filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
