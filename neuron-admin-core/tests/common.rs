#![allow(dead_code)]

use async_trait::async_trait;
use neuron_admin_client::{NodeApi, PluginApi, TagApi};
use neuron_admin_error::{api::ApiError, ApiResult};
use neuron_admin_models::{
    domain::prelude::{
        NodeInfo, NodeQuery, NodeSetting, NodeStatus, PluginInfo, PluginSchema, RawTagRow,
        TagRecord,
    },
    enums::node::NodeLogLevel,
};
use serde_json::{Map, Value as Json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tokio::sync::Barrier;

#[derive(Debug, Clone, PartialEq)]
pub struct TagCall {
    pub node: String,
    pub group: String,
    pub tags: Vec<TagRecord>,
}

/// In-memory gateway recording every call.
#[derive(Debug, Default)]
pub struct FakeGateway {
    pub tag_calls: Mutex<Vec<TagCall>>,
    /// Group name -> error returned by `add_tags`
    pub tag_failures: HashMap<String, ApiError>,
    /// When set, every `add_tags` call waits here before answering
    pub tag_barrier: Option<Arc<Barrier>>,
    pub nodes: Vec<NodeInfo>,
    pub states: Mutex<Vec<NodeStatus>>,
    pub settings: HashMap<String, Map<String, Json>>,
    pub submitted: Mutex<Vec<(String, Map<String, Json>)>>,
    pub deleted: Mutex<Vec<String>>,
    pub log_levels: Mutex<Vec<(String, NodeLogLevel)>>,
    pub plugins: Vec<PluginInfo>,
    pub added_plugins: Mutex<Vec<String>>,
    pub deleted_plugins: Mutex<Vec<String>>,
    pub schemas: HashMap<String, Json>,
    pub schema_requests: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn tag_calls(&self) -> Vec<TagCall> {
        self.tag_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TagApi for FakeGateway {
    async fn add_tags(&self, node: &str, group: &str, tags: &[TagRecord]) -> ApiResult<()> {
        self.tag_calls.lock().unwrap().push(TagCall {
            node: node.into(),
            group: group.into(),
            tags: tags.to_vec(),
        });
        if let Some(barrier) = &self.tag_barrier {
            barrier.wait().await;
        }
        match self.tag_failures.get(group) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NodeApi for FakeGateway {
    async fn south_nodes(&self, query: &NodeQuery) -> ApiResult<Vec<NodeInfo>> {
        Ok(self
            .nodes
            .iter()
            .filter(|n| query.node.as_deref().map_or(true, |q| n.name.contains(q)))
            .filter(|n| query.plugin.as_deref().map_or(true, |q| n.plugin.contains(q)))
            .cloned()
            .collect())
    }

    async fn node_states(&self, node: Option<&str>) -> ApiResult<Vec<NodeStatus>> {
        Ok(self
            .states
            .lock()
            .unwrap()
            .iter()
            .filter(|s| node.map_or(true, |n| s.node == n))
            .cloned()
            .collect())
    }

    async fn node_setting(&self, node: &str) -> ApiResult<NodeSetting> {
        Ok(NodeSetting {
            node: node.into(),
            params: self.settings.get(node).cloned().unwrap_or_default(),
        })
    }

    async fn submit_node_setting(&self, node: &str, params: &Map<String, Json>) -> ApiResult<()> {
        self.submitted
            .lock()
            .unwrap()
            .push((node.into(), params.clone()));
        Ok(())
    }

    async fn delete_node(&self, name: &str) -> ApiResult<()> {
        self.deleted.lock().unwrap().push(name.into());
        Ok(())
    }

    async fn set_node_log_level(&self, node: &str, level: NodeLogLevel) -> ApiResult<()> {
        self.log_levels.lock().unwrap().push((node.into(), level));
        Ok(())
    }
}

#[async_trait]
impl PluginApi for FakeGateway {
    async fn plugins(&self) -> ApiResult<Vec<PluginInfo>> {
        Ok(self.plugins.clone())
    }

    async fn add_plugin(&self, library: &str) -> ApiResult<()> {
        self.added_plugins.lock().unwrap().push(library.into());
        Ok(())
    }

    async fn delete_plugin(&self, name: &str) -> ApiResult<()> {
        self.deleted_plugins.lock().unwrap().push(name.into());
        Ok(())
    }

    async fn plugin_schema(&self, schema_name: &str) -> ApiResult<PluginSchema> {
        self.schema_requests
            .lock()
            .unwrap()
            .push(schema_name.into());
        let schema = self
            .schemas
            .get(schema_name)
            .cloned()
            .ok_or(ApiError::Backend {
                code: 2301,
                index: None,
            })?;
        serde_json::from_value(schema).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

pub fn raw_row(row: usize, value: Json) -> RawTagRow {
    let values: Map<String, Json> = serde_json::from_value(value).unwrap();
    RawTagRow::new(row, values)
}
