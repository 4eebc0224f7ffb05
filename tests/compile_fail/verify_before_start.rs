// ABOUTME: Compile-fail test verifying verify cannot be called before a container starts.
// ABOUTME: This test should fail to compile, validating state machine safety.

use smoke_runner::diagnostics::Diagnostics;
use smoke_runner::smoke::{SmokePlan, SmokeTest};
use smoke_runner::types::ImageRef;

async fn try_verify_unbuilt<R: smoke_runner::runtime::FullRuntime>(runtime: &R) {
    let tag = ImageRef::parse("intel_image:latest").unwrap();
    let test = SmokeTest::new(SmokePlan::new("Dockerfile.ipex", tag));
    let mut diag = Diagnostics::default();

    // ERROR: verify() doesn't exist on SmokeTest<Initialized>
    let _ = test.verify(runtime, &mut diag).await;
}

fn main() {}
