pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str =
    "spendsmart=info,spendsmart_core=info,spendsmart_storage_json=info,spendsmart_assistant=info";

/// Installs the global subscriber: `RUST_LOG` when set, otherwise `info` for the SpendSmart crates.
///
/// Logs go to stderr so script-mode stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
