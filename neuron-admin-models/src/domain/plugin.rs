use crate::{
    constants::SCHEMA_RESERVED_KEYS,
    enums::{
        node::NodeType,
        param::{ParamAttribute, ParamType},
        tag::TagType,
    },
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as Json};
use tracing::warn;

/// Plugin library registered on the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginInfo {
    pub name: String,
    #[serde(default)]
    pub library: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kind: Option<u8>,
    #[serde(default)]
    pub node_type: Option<NodeType>,
    /// Schema name used to fetch the configuration descriptor
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub single: Option<bool>,
    #[serde(default)]
    pub display: Option<bool>,
}

impl PluginInfo {
    /// Schema name for this plugin, falling back to the lower-cased name.
    pub fn schema_name(&self) -> String {
        self.schema
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.name.to_lowercase())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginList {
    #[serde(default)]
    pub plugins: Vec<PluginInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddPluginRequest<'a> {
    pub library: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletePluginRequest<'a> {
    pub plugin: &'a str,
}

fn default_param_attribute() -> ParamAttribute {
    ParamAttribute::Required
}

/// Metadata of one plugin configuration field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_param_attribute")]
    pub attribute: ParamAttribute,
    pub r#type: ParamType,
    #[serde(default)]
    pub default: Option<Json>,
    #[serde(default)]
    pub valid: Option<Json>,
}

impl ParamInfo {
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.attribute == ParamAttribute::Optional
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub key: String,
    pub info: ParamInfo,
}

/// Per-plugin configuration descriptor.
///
/// On the wire this is a flat object: every key except `tag_type` and
/// `params` describes one configuration field. Field order is preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PluginSchema {
    /// Tag types the plugin accepts; `None` when the schema does not restrict them
    pub tag_type: Option<Vec<TagType>>,
    pub fields: Vec<SchemaField>,
}

impl PluginSchema {
    /// Whether a tag of type `tag_type` may be created on nodes of this plugin.
    ///
    /// A schema without a (non-empty) `tag_type` list does not restrict types.
    pub fn allows(&self, tag_type: TagType) -> bool {
        match &self.tag_type {
            Some(types) if !types.is_empty() => types.contains(&tag_type),
            _ => true,
        }
    }

    /// Labels of the allowed tag types, in schema order.
    pub fn allowed_type_labels(&self) -> Vec<String> {
        self.tag_type
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|t| t.label().to_string())
            .collect()
    }

    #[inline]
    pub fn field(&self, key: &str) -> Option<&ParamInfo> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.info)
    }
}

fn decode_tag_types(value: Json) -> Option<Vec<TagType>> {
    match value {
        Json::Array(codes) => Some(
            codes
                .into_iter()
                .filter_map(|code| match serde_json::from_value::<TagType>(code.clone()) {
                    Ok(t) => Some(t),
                    Err(_) => {
                        warn!("Skipping unknown tag type `{code}` in plugin schema");
                        None
                    }
                })
                .collect(),
        ),
        Json::Null => None,
        other => {
            warn!("Ignoring malformed tag_type `{other}` in plugin schema");
            None
        }
    }
}

impl<'de> Deserialize<'de> for PluginSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Json>::deserialize(deserializer)?;

        // Iterate in wire order; removing keys from a `preserve_order` map reorders it
        let mut tag_type = None;
        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            if key == "tag_type" {
                tag_type = decode_tag_types(value);
                continue;
            }
            if SCHEMA_RESERVED_KEYS.contains(&key.as_str()) || !value.is_object() {
                continue;
            }
            match serde_json::from_value::<ParamInfo>(value) {
                Ok(info) => fields.push(SchemaField { key, info }),
                Err(e) => warn!("Skipping plugin schema field `{key}`: {e}"),
            }
        }

        Ok(Self { tag_type, fields })
    }
}
