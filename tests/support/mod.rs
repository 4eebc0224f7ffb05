// ABOUTME: Test support utilities.
// ABOUTME: Tracing setup, fixture paths and local runtime access for integration tests.

use smoke_runner::runtime::{BollardRuntime, RuntimeConfig, connect};
use std::path::PathBuf;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("smoke_runner=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Directory under tests/fixtures.
#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A connected local runtime, or `None` when no daemon answers.
#[allow(dead_code)]
pub async fn local_runtime() -> Option<BollardRuntime> {
    connect(&RuntimeConfig::default()).await.ok()
}

