pub mod build_info;
pub mod persistence;

use std::{env, path::PathBuf, sync::Once};

use dirs::home_dir;

const DEFAULT_DIR_NAME: &str = ".member_form";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_STORE_FILE: &str = "members.json";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Logs go to stderr so they never interleave with the form on stdout.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
            .add_directive("member_form=info".parse().unwrap_or_else(|_| LevelFilter::INFO.into()));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Returns the application data directory, defaulting to `~/.member_form`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("MEMBER_FORM_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file() -> PathBuf {
    app_data_dir().join(CONFIG_FILE)
}

/// Record store used when neither the config nor `--store` names one.
pub fn default_store_file() -> PathBuf {
    app_data_dir().join(DEFAULT_STORE_FILE)
}
