//! Test logging setup.

use std::sync::Once;

static INIT: Once = Once::new();

/// Route `tracing` output through the test harness's captured writer.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    INIT.call_once(|| {
        let installed = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .with_target(false)
            .try_init();
        if let Err(err) = installed {
            eprintln!("test tracing not installed: {err}");
        }
    });
}
