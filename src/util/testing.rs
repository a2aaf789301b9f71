//! Tracing for tests
//!
//! Output goes through the libtest capture, so it only shows for failing tests
//! or with `--nocapture`.

use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{fmt, fmt::format::FmtSpan, prelude::*, EnvFilter};

/// Used when `RUST_LOG` is unset. The config crate is chatty below warn.
const DEFAULT_FILTER: &str = "arbor=debug,config=warn";

static INIT: Once = Once::new();

/// Installs the test subscriber; later calls are no-ops.
pub fn init_test_setup() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let layer = fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(filter);

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            eprintln!("tracing subscriber already installed, keeping it");
        }
        debug!("test tracing ready");
    });
}
