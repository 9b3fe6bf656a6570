//! Subscriber setup.
//!
//! `RUST_LOG` selects the filter (`warn` by default, `debug` with
//! `--verbose`). Setting `DERIV_LOG_TREE` switches the flat `fmt` output
//! for an indented span tree, which reads better when following the passes
//! of one run.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var_os("DERIV_LOG_TREE").is_some() {
        registry
            .with(
                HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_bracketed_fields(true),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
