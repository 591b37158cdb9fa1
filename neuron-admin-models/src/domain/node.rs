use crate::enums::node::{NodeLinkState, NodeLogLevel, NodeState};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::{fmt, str::FromStr};

/// Node entry as returned by the node list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub name: String,
    pub plugin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeList {
    #[serde(default)]
    pub nodes: Vec<NodeInfo>,
}

/// Fuzzy filters of the south driver list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeQuery {
    pub node: Option<String>,
    pub plugin: Option<String>,
}

/// Runtime state of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStatus {
    pub node: String,
    pub running: NodeState,
    pub link: NodeLinkState,
    #[serde(default)]
    pub rtt: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeStatusList {
    #[serde(default)]
    pub states: Vec<NodeStatus>,
}

/// A south driver row: node info joined with its runtime state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SouthDriver {
    pub name: String,
    pub plugin: String,
    pub running: NodeState,
    pub link: NodeLinkState,
}

impl SouthDriver {
    /// Row for a node whose state has not been fetched yet.
    pub fn placeholder(info: NodeInfo) -> Self {
        Self {
            name: info.name,
            plugin: info.plugin,
            running: NodeState::Running,
            link: NodeLinkState::Connected,
        }
    }
}

/// Current configuration of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSetting {
    pub node: String,
    #[serde(default)]
    pub params: Map<String, Json>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSettingRequest<'a> {
    pub node: &'a str,
    pub params: &'a Map<String, Json>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteNodeRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeLogLevelRequest<'a> {
    pub node: &'a str,
    pub level: NodeLogLevel,
}

/// Column the driver list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverSortKey {
    Name,
    Plugin,
    Running,
    Link,
}

impl FromStr for DriverSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "plugin" => Ok(Self::Plugin),
            "running" | "status" => Ok(Self::Running),
            "link" | "connection" => Ok(Self::Link),
            other => Err(format!("unknown sort key `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    /// Accepts `asc`/`desc` as well as `ascending`/`descending`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_ascii_lowercase();
        if s.contains("asc") {
            Ok(Self::Asc)
        } else if s.contains("desc") {
            Ok(Self::Desc)
        } else {
            Err(format!("unknown sort order `{s}`"))
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}
