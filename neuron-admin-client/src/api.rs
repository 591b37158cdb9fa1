use async_trait::async_trait;
use neuron_admin_error::ApiResult;
use neuron_admin_models::{
    domain::prelude::{NodeInfo, NodeQuery, NodeSetting, NodeStatus, PluginInfo, PluginSchema, TagRecord},
    enums::node::NodeLogLevel,
};
use serde_json::{Map, Value as Json};

/// Tag submission endpoint.
#[async_trait]
pub trait TagApi: Send + Sync {
    /// Add `tags` to `group` of `node` in one request.
    ///
    /// A rejected batch surfaces as `ApiError::Backend` carrying the 0-based
    /// index of the offending tag.
    async fn add_tags(&self, node: &str, group: &str, tags: &[TagRecord]) -> ApiResult<()>;
}

/// South driver (node) endpoints.
#[async_trait]
pub trait NodeApi: Send + Sync {
    async fn south_nodes(&self, query: &NodeQuery) -> ApiResult<Vec<NodeInfo>>;

    /// States of `node`, or of every node when `None`.
    async fn node_states(&self, node: Option<&str>) -> ApiResult<Vec<NodeStatus>>;

    async fn node_setting(&self, node: &str) -> ApiResult<NodeSetting>;

    async fn submit_node_setting(&self, node: &str, params: &Map<String, Json>)
        -> ApiResult<()>;

    async fn delete_node(&self, name: &str) -> ApiResult<()>;

    async fn set_node_log_level(&self, node: &str, level: NodeLogLevel) -> ApiResult<()>;
}

/// Plugin library endpoints.
#[async_trait]
pub trait PluginApi: Send + Sync {
    async fn plugins(&self) -> ApiResult<Vec<PluginInfo>>;

    async fn add_plugin(&self, library: &str) -> ApiResult<()>;

    async fn delete_plugin(&self, name: &str) -> ApiResult<()>;

    async fn plugin_schema(&self, schema_name: &str) -> ApiResult<PluginSchema>;
}

#[async_trait]
impl<T: TagApi + ?Sized> TagApi for &T {
    async fn add_tags(&self, node: &str, group: &str, tags: &[TagRecord]) -> ApiResult<()> {
        (**self).add_tags(node, group, tags).await
    }
}

#[async_trait]
impl<T: NodeApi + ?Sized> NodeApi for &T {
    async fn south_nodes(&self, query: &NodeQuery) -> ApiResult<Vec<NodeInfo>> {
        (**self).south_nodes(query).await
    }

    async fn node_states(&self, node: Option<&str>) -> ApiResult<Vec<NodeStatus>> {
        (**self).node_states(node).await
    }

    async fn node_setting(&self, node: &str) -> ApiResult<NodeSetting> {
        (**self).node_setting(node).await
    }

    async fn submit_node_setting(
        &self,
        node: &str,
        params: &Map<String, Json>,
    ) -> ApiResult<()> {
        (**self).submit_node_setting(node, params).await
    }

    async fn delete_node(&self, name: &str) -> ApiResult<()> {
        (**self).delete_node(name).await
    }

    async fn set_node_log_level(&self, node: &str, level: NodeLogLevel) -> ApiResult<()> {
        (**self).set_node_log_level(node, level).await
    }
}

#[async_trait]
impl<T: PluginApi + ?Sized> PluginApi for &T {
    async fn plugins(&self) -> ApiResult<Vec<PluginInfo>> {
        (**self).plugins().await
    }

    async fn add_plugin(&self, library: &str) -> ApiResult<()> {
        (**self).add_plugin(library).await
    }

    async fn delete_plugin(&self, name: &str) -> ApiResult<()> {
        (**self).delete_plugin(name).await
    }

    async fn plugin_schema(&self, schema_name: &str) -> ApiResult<PluginSchema> {
        (**self).plugin_schema(schema_name).await
    }
}
