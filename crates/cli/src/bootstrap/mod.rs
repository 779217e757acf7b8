mod logging;
mod resolver;

pub use logging::init_logging;
pub use resolver::build_resolver;

use ferrous_recursor_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}

pub fn log_config_summary(config: &Config) {
    info!(
        bind = %config.server.bind_address,
        port = config.server.dns_port,
        max_recursion_depth = config.resolver.max_recursion_depth,
        query_timeout_ms = config.resolver.query_timeout_ms,
        tcp_fallback = config.resolver.tcp_fallback,
        root_hints = config.resolver.root_hints_path.as_deref().unwrap_or("bundled"),
        "Configuration loaded"
    );
}
