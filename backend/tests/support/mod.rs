//! Embedded PostgreSQL plumbing shared by the Diesel adapter suites.
//!
//! Each test gets its own database cloned from a template that already has
//! the migrations applied. Set `SKIP_TEST_CLUSTER=1` where the cluster
//! cannot start; suites then skip instead of failing.

pub mod embedded_postgres;

pub use embedded_postgres::{provision_database, shared_cluster};

/// True when `SKIP_TEST_CLUSTER` is `1`, `true`, or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when allowed, otherwise fail loudly so CI notices.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
