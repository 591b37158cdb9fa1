pub mod api;
pub mod http;

pub use api::{NodeApi, PluginApi, TagApi};
pub use http::HttpConfigClient;
