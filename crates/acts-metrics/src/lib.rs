//! ---
//! acts_section: "03-logging-metrics"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Metrics registry sharing and export utilities."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::{Registry, TextEncoder};

/// Shared registry type used across crates.
pub type SharedRegistry = Arc<Registry>;

/// Produce a new shared registry.
pub fn new_registry() -> SharedRegistry {
    Arc::new(Registry::new())
}

/// Encode every family in the registry using the Prometheus text format.
pub fn render(registry: &SharedRegistry) -> Result<String> {
    let families = registry.gather();
    TextEncoder::new()
        .encode_to_string(&families)
        .context("failed to encode metrics")
}

/// Names of all metric families currently registered.
pub fn family_names(registry: &SharedRegistry) -> Vec<String> {
    registry
        .gather()
        .iter()
        .map(|family| family.get_name().to_string())
        .collect()
}

pub use prometheus;

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{IntCounter, Opts};

    #[test]
    fn render_includes_registered_counter() {
        let registry = new_registry();
        let counter = IntCounter::with_opts(Opts::new("acts_test_total", "test counter")).unwrap();
        registry.register(Box::new(counter.clone())).unwrap();
        counter.inc_by(3);

        let text = render(&registry).unwrap();
        assert!(text.contains("acts_test_total 3"));
        assert_eq!(family_names(&registry), vec!["acts_test_total".to_string()]);
    }
}
