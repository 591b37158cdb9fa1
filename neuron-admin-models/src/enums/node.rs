use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt::{Display, Error, Formatter};

/// Node category on the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum NodeType {
    /// South driver connecting a field device
    Driver = 1,
    /// North application
    App = 2,
}

/// Running state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum NodeState {
    Init = 1,
    Ready = 2,
    Running = 3,
    Stopped = 4,
}

impl NodeState {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Ready => "Ready",
            Self::Running => "Running",
            Self::Stopped => "Stopped",
        }
    }
}

impl Display for NodeState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}

/// Connection state between a south driver and its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum NodeLinkState {
    Disconnected = 0,
    Connected = 1,
}

impl NodeLinkState {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connected => "Connected",
        }
    }
}

impl Display for NodeLinkState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.as_str())
    }
}

/// Gateway log levels accepted by the per-node log endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeLogLevel {
    Debug,
    Info,
    Notice,
    Warn,
    Error,
}
