//! Test utilities for handlebars-x
//!
//! This module provides logging setup for tests and fixture builders for the
//! in-memory file sets a pass runs over. It is compiled for unit tests and,
//! through the `test-utils` feature, for the integration test target.
//!
//! # Example
//!
//! ```rust,no_run
//! use handlebars_x::pipeline::Build;
//! use handlebars_x::templating::HandlebarsX;
//! use handlebars_x::test_utils::{SiteFixture, contents_of, init_test_logging};
//!
//! init_test_logging(None);
//! let mut files = SiteFixture::simple().build();
//! HandlebarsX::default().process(&mut files, &Build::new()).unwrap();
//! assert_eq!(contents_of(&files, "posts/simple.hbs"), "<h1>test:simple</h1>");
//! ```

pub mod fixtures;

pub use fixtures::{SiteFixture, contents_of};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Installs a tracing subscriber once per process, regardless of how many
/// times it is called. An explicit `level` wins; otherwise `RUST_LOG` is
/// used when set, and without either nothing is installed.
///
/// This is the stock test-logging helper, kept unchanged: a `Once`-guarded
/// `fmt` subscriber with an `EnvFilter`, writing through the test writer so
/// output is captured per test.
///
/// ```bash
/// RUST_LOG=handlebars_x=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
