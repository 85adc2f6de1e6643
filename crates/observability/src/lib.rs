//! Tracing/logging setup shared by binaries and test suites that embed the
//! variant engine.

/// Subscriber configuration (filters, formats).
pub mod tracing;

/// Initialize process-wide logging (JSON, `RUST_LOG`, default `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize human-readable logging captured by the test harness.
pub fn init_for_tests() {
    tracing::init_for_tests();
}
