use neuron_admin_client::PluginApi;
use neuron_admin_common::Notifier;
use neuron_admin_error::NAResult;
use neuron_admin_models::domain::prelude::{PluginInfo, PluginSchema};
use std::collections::HashMap;
use tracing::{debug, info};

/// Plugin library management.
pub struct PluginManager<A, N> {
    api: A,
    notifier: N,
}

impl<A, N> PluginManager<A, N>
where
    A: PluginApi,
    N: Notifier,
{
    pub fn new(api: A, notifier: N) -> Self {
        Self { api, notifier }
    }

    pub async fn list_plugins(&self) -> NAResult<Vec<PluginInfo>> {
        Ok(self.api.plugins().await?)
    }

    /// Plugins keyed by name.
    pub async fn plugin_map(&self) -> NAResult<HashMap<String, PluginInfo>> {
        let plugins = self.list_plugins().await?;
        Ok(plugins.into_iter().map(|p| (p.name.clone(), p)).collect())
    }

    pub async fn add_plugin(&self, library: &str) -> NAResult<()> {
        self.api.add_plugin(library).await?;
        info!("Plugin library `{library}` added");
        self.notifier.success(format!("Plugin library `{library}` added"));
        Ok(())
    }

    pub async fn delete_plugin(&self, name: &str) -> NAResult<()> {
        self.api.delete_plugin(name).await?;
        info!("Plugin `{name}` deleted");
        self.notifier.success(format!("Plugin `{name}` deleted"));
        Ok(())
    }

    #[inline]
    pub async fn plugin_schema(&self, schema_name: &str) -> NAResult<PluginSchema> {
        Ok(self.api.plugin_schema(schema_name).await?)
    }

    /// Schema of the plugin named `plugin`.
    ///
    /// The schema name comes from the plugin list; unknown plugins fall back
    /// to their lower-cased name.
    pub async fn schema_for_plugin(&self, plugin: &str) -> NAResult<PluginSchema> {
        let plugins = self.plugin_map().await?;
        let schema_name = plugins
            .get(plugin)
            .map(PluginInfo::schema_name)
            .unwrap_or_else(|| plugin.to_lowercase());
        debug!("Resolved plugin `{plugin}` to schema `{schema_name}`");
        self.plugin_schema(&schema_name).await
    }
}
