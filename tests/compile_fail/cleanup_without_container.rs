// ABOUTME: Compile-fail test verifying cleanup needs a state that owns a container.
// ABOUTME: This test should fail to compile, validating state machine safety.

use smoke_runner::smoke::{SmokePlan, SmokeTest};
use smoke_runner::types::ImageRef;

async fn try_cleanup_unbuilt<R: smoke_runner::runtime::FullRuntime>(runtime: &R) {
    let tag = ImageRef::parse("intel_image:latest").unwrap();
    let test = SmokeTest::new(SmokePlan::new("Dockerfile.ipex", tag));

    // ERROR: Initialized does not implement HasContainer
    let _ = test.cleanup(runtime).await;
}

fn main() {}
