//! Node configuration form.
//!
//! The form starts from the plugin schema defaults, is overlaid with the
//! node's stored setting and is cleaned up before submission.

use crate::plugin::PluginManager;
use neuron_admin_client::{NodeApi, PluginApi};
use neuron_admin_common::Notifier;
use neuron_admin_error::{NAError, NAResult};
use neuron_admin_models::{
    constants::{CLIENT_ID_PLACEHOLDER, NODE_NAME_PLACEHOLDER, TAG_REGEX_KEY},
    domain::prelude::{NodeInfo, NodeQuery, ParamInfo, PluginSchema, SchemaField},
};
use serde_json::{Map, Value as Json};
use tracing::{debug, info, instrument};

#[inline]
fn is_empty_value(value: Option<&Json>) -> bool {
    match value {
        None | Some(Json::Null) => true,
        Some(Json::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Initial form value of a field for `node`.
///
/// String defaults have `${node-name}` replaced by the node name, or when
/// absent, `{client-id}`. Fields without a default start from the
/// per-type fallback.
pub fn initial_value(param: &ParamInfo, node: &str) -> Json {
    match &param.default {
        Some(Json::String(s)) if s.contains(NODE_NAME_PLACEHOLDER) => {
            Json::String(s.replacen(NODE_NAME_PLACEHOLDER, node, 1))
        }
        Some(Json::String(s)) if s.contains(CLIENT_ID_PLACEHOLDER) => {
            Json::String(s.replacen(CLIENT_ID_PLACEHOLDER, node, 1))
        }
        Some(default) => default.clone(),
        None => param.r#type.fallback_value(),
    }
}

/// Field key to initial value, in schema order.
pub fn default_form(schema: &PluginSchema, node: &str) -> Map<String, Json> {
    schema
        .fields
        .iter()
        .map(|f| (f.key.clone(), initial_value(&f.info, node)))
        .collect()
}

/// For every default key take the configured value unless it is empty.
pub fn merge_configured(
    defaults: &Map<String, Json>,
    configured: &Map<String, Json>,
) -> Map<String, Json> {
    defaults
        .iter()
        .map(|(key, default)| {
            let value = configured.get(key);
            let value = if is_empty_value(value) {
                default.clone()
            } else {
                value.cloned().unwrap_or_default()
            };
            (key.clone(), value)
        })
        .collect()
}

/// Clean a form for submission.
///
/// `tag_regex` is dropped. Empty values fall back to the default for optional
/// fields that declare one and are removed otherwise.
pub fn prepare_submission(
    form: &Map<String, Json>,
    schema: &PluginSchema,
    defaults: &Map<String, Json>,
) -> Map<String, Json> {
    let mut out = Map::new();
    for (key, value) in form {
        if key == TAG_REGEX_KEY {
            continue;
        }
        if !is_empty_value(Some(value)) {
            out.insert(key.clone(), value.clone());
            continue;
        }
        let keep_default = schema
            .field(key)
            .map(|info| info.is_optional() && info.has_default())
            .unwrap_or(false);
        if keep_default {
            if let Some(default) = defaults.get(key) {
                out.insert(key.clone(), default.clone());
            }
        }
    }
    out
}

/// Editable configuration of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeForm {
    pub node: NodeInfo,
    pub fields: Vec<SchemaField>,
    pub defaults: Map<String, Json>,
    pub values: Map<String, Json>,
    schema: PluginSchema,
}

impl NodeForm {
    pub fn new(node: NodeInfo, schema: PluginSchema, configured: &Map<String, Json>) -> Self {
        let defaults = default_form(&schema, &node.name);
        let values = if defaults.is_empty() {
            defaults.clone()
        } else {
            merge_configured(&defaults, configured)
        };
        Self {
            node,
            fields: schema.fields.clone(),
            defaults,
            values,
            schema,
        }
    }

    #[inline]
    pub fn set(&mut self, key: impl Into<String>, value: Json) {
        self.values.insert(key.into(), value);
    }

    /// Restore every field to its default.
    #[inline]
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
    }

    #[inline]
    pub fn schema(&self) -> &PluginSchema {
        &self.schema
    }

    pub fn submission(&self) -> Map<String, Json> {
        prepare_submission(&self.values, &self.schema, &self.defaults)
    }
}

/// Look up a south node by exact name.
pub async fn find_node<A: NodeApi>(api: &A, node: &str) -> NAResult<NodeInfo> {
    let query = NodeQuery {
        node: Some(node.to_string()),
        plugin: None,
    };
    api.south_nodes(&query)
        .await?
        .into_iter()
        .find(|n| n.name == node)
        .ok_or_else(|| NAError::InvalidArgument(format!("node `{node}` does not exist")))
}

pub struct NodeConfigService<A, N> {
    api: A,
    notifier: N,
}

impl<A, N> NodeConfigService<A, N>
where
    A: NodeApi + PluginApi,
    N: Notifier,
{
    pub fn new(api: A, notifier: N) -> Self {
        Self { api, notifier }
    }

    /// Resolve the node's plugin schema and current setting into a form.
    #[instrument(name = "load-node-config", skip(self))]
    pub async fn load(&self, node: &str) -> NAResult<NodeForm> {
        let info = find_node(&self.api, node).await?;
        let plugins = PluginManager::new(&self.api, &self.notifier);
        let (schema, setting) = futures::try_join!(
            plugins.schema_for_plugin(&info.plugin),
            async { Ok::<_, NAError>(self.api.node_setting(node).await?) },
        )?;
        debug!(
            "Loaded {} field(s) and {} configured value(s)",
            schema.fields.len(),
            setting.params.len()
        );
        Ok(NodeForm::new(info, schema, &setting.params))
    }

    /// Submit the cleaned form and return what was sent.
    #[instrument(name = "submit-node-config", skip_all, fields(node = %form.node.name))]
    pub async fn submit(&self, form: &NodeForm) -> NAResult<Map<String, Json>> {
        let params = form.submission();
        self.api
            .submit_node_setting(&form.node.name, &params)
            .await?;
        info!("Node `{}` configuration submitted", form.node.name);
        self.notifier.success("Submitted successfully");
        Ok(params)
    }
}
