use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Value type of a plugin configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Int,
    Real,
    Bool,
    String,
    Enum,
    Map,
    File,
    Array,
}

impl ParamType {
    /// Form value used when the schema declares no default.
    ///
    /// Numbers and choices have no neutral value, so they start as `null`
    /// and must be supplied by the user.
    pub fn fallback_value(&self) -> Json {
        match self {
            ParamType::Bool => Json::Bool(false),
            ParamType::String | ParamType::File => Json::String(String::new()),
            ParamType::Array => Json::Array(Vec::new()),
            ParamType::Int | ParamType::Real | ParamType::Enum | ParamType::Map => Json::Null,
        }
    }
}

/// Whether a configuration field must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamAttribute {
    Required,
    Optional,
}
