//! Test utilities for ShimStack
//!
//! Provides utilities for scenario tests against emulated backends:
//! - Build a backend selector from the environment
//! - Seed the standard test database and table
//! - Clear every constructed store between scenarios
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shimstack_test::TestHarness;
//!
//! #[test]
//! fn test_reads_catalog() {
//!     let harness = TestHarness::setup().unwrap();
//!     let catalog = harness.selector().emulated_catalog().unwrap();
//!     assert!(catalog.database_exists(&harness.data().test_database));
//! }
//! ```

pub mod data;
pub mod harness;

pub use data::{standard_table_columns, standard_table_parameters, TestData};
pub use harness::{HarnessError, TestHarness};

use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to warnings only.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}
