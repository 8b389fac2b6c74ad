use tracing_subscriber::EnvFilter;

use crate::config::AppEnv;

/// Installs the global subscriber: human-readable debug output locally, JSON
/// at info level everywhere else. `RUST_LOG` overrides the level.
pub fn init(env: AppEnv) {
    let default_level = match env {
        AppEnv::Local => "debug",
        AppEnv::Prod => "info",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match env {
        AppEnv::Local => builder.pretty().try_init(),
        AppEnv::Prod => builder.json().with_current_span(true).try_init(),
    };

    // A subscriber is already installed when the process embeds the gateway.
    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already set");
    }
}
