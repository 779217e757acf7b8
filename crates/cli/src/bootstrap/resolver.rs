use ferrous_recursor_domain::config::ResolverSettings;
use ferrous_recursor_infrastructure::{IterativeResolver, NetworkExchange, ResolverConfig, RootHints};
use std::sync::Arc;
use tracing::{error, info};

pub fn build_resolver(settings: &ResolverSettings) -> anyhow::Result<Arc<IterativeResolver>> {
    let hints = RootHints::load(settings.root_hints_path.as_deref()).map_err(|e| {
        error!(error = %e, "Failed to load root hints");
        anyhow::anyhow!(e)
    })?;
    info!(roots = hints.len(), "Root hints ready");

    let config = ResolverConfig::from(settings);
    let exchange = Arc::new(NetworkExchange::from(&config));
    let resolver = IterativeResolver::new(hints.into_servers(), exchange, config)?;

    Ok(Arc::new(resolver))
}
