use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TYPEFLOW_LOG";

/// Send tracing output to `path`.
///
/// The terminal belongs to the UI, so nothing is ever written to stderr.
/// Filtering follows `TYPEFLOW_LOG`, defaulting to `typeflow=info`. Failing
/// to open the file leaves logging disabled.
pub fn init(path: &Path) {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("typeflow=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}
