use std::{fs, path::Path, sync::Once};

use crate::errors::CoreResult;

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("envelope_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Creates the directory and any missing parents.
pub fn ensure_dir(path: &Path) -> CoreResult<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
