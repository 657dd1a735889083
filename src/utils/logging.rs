use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Inicializa o subscriber; `RUST_LOG` tem precedência sobre `verbose`.
/// Registros do crate `log` (rtm_client) também são capturados.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn log_config_loaded(run_mode: &str) {
    info!("Configuration loaded successfully for run mode: {}", run_mode);
}

pub fn log_rtm_call(method: &str) {
    debug!("Calling RTM method {}", method);
}

pub fn log_export_loaded(path: &Path, lists: usize, tasks: usize) {
    info!("📥 Export loaded: {} - {} lists, {} tasks", path.display(), lists, tasks);
}

pub fn log_conversion_summary(tags: usize, kept: usize, dropped: usize) {
    info!("🏷️ Conversion done: {} tags, {} tasks kept, {} completed tasks dropped", tags, kept, dropped);
}

pub fn log_import_written(path: &Path) {
    info!("✅ Import written to {}", path.display());
}

pub fn log_duplicate_inbox(count: usize) {
    warn!("Export has {} lists named Inbox; using the last one", count);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}
