use crate::api::{NodeApi, PluginApi, TagApi};
use async_trait::async_trait;
use neuron_admin_error::{api::ApiError, ApiResult};
use neuron_admin_models::{
    constants::{API_PREFIX, BEARER_TOKEN},
    domain::prelude::{
        AddPluginRequest, AddTagsRequest, DeleteNodeRequest, DeletePluginRequest, NodeInfo,
        NodeList, NodeLogLevelRequest, NodeQuery, NodeSetting, NodeSettingRequest, NodeStatus,
        NodeStatusList, PluginInfo, PluginList, PluginSchema, TagRecord,
    },
    enums::node::{NodeLogLevel, NodeType},
    settings::Client as ClientSettings,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
    Method, RequestBuilder, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    name: &'a str,
    pass: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// `reqwest` implementation of the gateway configuration API.
#[derive(Debug)]
pub struct HttpConfigClient {
    client: reqwest::Client,
    api_base: String,
    token: RwLock<Option<String>>,
}

impl HttpConfigClient {
    /// Build a client for `settings.base_url` with JSON defaults and the
    /// configured request timeout. A configured token is used as-is.
    pub fn new(settings: &ClientSettings) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base: format!("{}{}", settings.base_url.trim_end_matches('/'), API_PREFIX),
            token: RwLock::new(settings.token.clone().filter(|t| !t.is_empty())),
        })
    }

    #[inline]
    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    pub fn set_token(&self, token: impl Into<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.into());
        }
    }

    /// Log in with username/password and keep the issued token.
    #[instrument(name = "login", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        let resp: LoginResponse = self
            .send(self.request(Method::POST, "/login").json(&LoginRequest {
                name: username,
                pass: password,
            }))
            .await?;
        self.set_token(resp.token);
        debug!("login succeeded");
        Ok(())
    }

    /// Log in when no token is configured but credentials are.
    pub async fn authenticate(&self, settings: &ClientSettings) -> ApiResult<()> {
        if self.has_token() {
            return Ok(());
        }
        match (&settings.username, &settings.password) {
            (Some(user), Some(pass)) => self.login(user, pass).await,
            _ => Ok(()),
        }
    }

    #[inline]
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        let token = self.token.read().ok().and_then(|t| t.clone());
        match token {
            Some(token) => builder.header(AUTHORIZATION, format!("{BEARER_TOKEN} {token}")),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let body = self.execute(builder).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_unit(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.execute(builder).await.map(|_| ())
    }

    async fn execute(&self, builder: RequestBuilder) -> ApiResult<Json> {
        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode_response(resp).await
    }
}

/// Turn a gateway response into its JSON body or a typed error.
///
/// A non-zero `error` field is a failure even with HTTP 200.
async fn decode_response(resp: Response) -> ApiResult<Json> {
    let status = resp.status();
    match status {
        StatusCode::UNAUTHORIZED => return Err(ApiError::Unauthorized),
        StatusCode::FORBIDDEN => return Err(ApiError::Forbidden),
        _ => {}
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let body: Option<Json> = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };

    if let Some(Json::Object(map)) = &body {
        if let Some(code) = map.get("error").and_then(Json::as_i64) {
            if code != 0 {
                let index = map
                    .get("index")
                    .and_then(Json::as_u64)
                    .map(|i| i as usize);
                return Err(ApiError::Backend { code, index });
            }
        }
    }

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }

    Ok(body.unwrap_or(Json::Null))
}

#[async_trait]
impl TagApi for HttpConfigClient {
    #[instrument(name = "add-tags", skip(self, tags), fields(count = tags.len()))]
    async fn add_tags(&self, node: &str, group: &str, tags: &[TagRecord]) -> ApiResult<()> {
        self.send_unit(
            self.request(Method::POST, "/tags")
                .json(&AddTagsRequest { node, group, tags }),
        )
        .await
    }
}

#[async_trait]
impl NodeApi for HttpConfigClient {
    #[instrument(name = "south-nodes", skip(self))]
    async fn south_nodes(&self, query: &NodeQuery) -> ApiResult<Vec<NodeInfo>> {
        let mut params: Vec<(&str, String)> =
            vec![("type", (NodeType::Driver as u8).to_string())];
        if let Some(node) = query.node.as_deref().filter(|s| !s.is_empty()) {
            params.push(("node", node.to_string()));
        }
        if let Some(plugin) = query.plugin.as_deref().filter(|s| !s.is_empty()) {
            params.push(("plugin", plugin.to_string()));
        }
        let list: NodeList = self
            .send(self.request(Method::GET, "/node").query(&params))
            .await?;
        Ok(list.nodes)
    }

    #[instrument(name = "node-states", skip(self))]
    async fn node_states(&self, node: Option<&str>) -> ApiResult<Vec<NodeStatus>> {
        let mut builder = self.request(Method::GET, "/node/state");
        if let Some(node) = node {
            builder = builder.query(&[("node", node)]);
        }
        let list: NodeStatusList = self.send(builder).await?;
        Ok(list.states)
    }

    #[instrument(name = "node-setting", skip(self))]
    async fn node_setting(&self, node: &str) -> ApiResult<NodeSetting> {
        self.send(
            self.request(Method::GET, "/node/setting")
                .query(&[("node", node)]),
        )
        .await
    }

    #[instrument(name = "submit-node-setting", skip(self, params))]
    async fn submit_node_setting(
        &self,
        node: &str,
        params: &Map<String, Json>,
    ) -> ApiResult<()> {
        self.send_unit(
            self.request(Method::POST, "/node/setting")
                .json(&NodeSettingRequest { node, params }),
        )
        .await
    }

    #[instrument(name = "delete-node", skip(self))]
    async fn delete_node(&self, name: &str) -> ApiResult<()> {
        self.send_unit(
            self.request(Method::DELETE, "/node")
                .json(&DeleteNodeRequest { name }),
        )
        .await
    }

    #[instrument(name = "node-log-level", skip(self))]
    async fn set_node_log_level(&self, node: &str, level: NodeLogLevel) -> ApiResult<()> {
        self.send_unit(
            self.request(Method::PUT, "/log/level")
                .json(&NodeLogLevelRequest { node, level }),
        )
        .await
    }
}

#[async_trait]
impl PluginApi for HttpConfigClient {
    #[instrument(name = "plugins", skip(self))]
    async fn plugins(&self) -> ApiResult<Vec<PluginInfo>> {
        let list: PluginList = self.send(self.request(Method::GET, "/plugin")).await?;
        Ok(list.plugins)
    }

    #[instrument(name = "add-plugin", skip(self))]
    async fn add_plugin(&self, library: &str) -> ApiResult<()> {
        self.send_unit(
            self.request(Method::POST, "/plugin")
                .json(&AddPluginRequest { library }),
        )
        .await
    }

    #[instrument(name = "delete-plugin", skip(self))]
    async fn delete_plugin(&self, name: &str) -> ApiResult<()> {
        self.send_unit(
            self.request(Method::DELETE, "/plugin")
                .json(&DeletePluginRequest { plugin: name }),
        )
        .await
    }

    #[instrument(name = "plugin-schema", skip(self))]
    async fn plugin_schema(&self, schema_name: &str) -> ApiResult<PluginSchema> {
        self.send(
            self.request(Method::GET, "/schema")
                .query(&[("schema_name", schema_name)]),
        )
        .await
    }
}
