mod common;

use common::FakeGateway;
use neuron_admin_common::{MemoryNotifier, NoticeLevel};
use neuron_admin_core::PluginManager;
use neuron_admin_models::{domain::prelude::PluginInfo, enums::tag::TagType};
use serde_json::json;

fn plugin(name: &str, schema: Option<&str>) -> PluginInfo {
    serde_json::from_value(json!({
        "name": name,
        "library": format!("libplugin-{}.so", name.to_lowercase().replace(' ', "-")),
        "schema": schema,
    }))
    .unwrap()
}

fn gateway() -> FakeGateway {
    FakeGateway {
        plugins: vec![plugin("Modbus TCP", Some("modbus-tcp")), plugin("OPC UA", None)],
        schemas: [
            ("modbus-tcp".to_string(), json!({"tag_type": [3, 9]})),
            ("opc ua".to_string(), json!({"tag_type": [13]})),
            ("siemens s7".to_string(), json!({})),
        ]
        .into_iter()
        .collect(),
        ..FakeGateway::default()
    }
}

#[tokio::test]
async fn plugin_map_is_keyed_by_name() {
    let gateway = gateway();
    let notifier = MemoryNotifier::new();
    let plugins = PluginManager::new(&gateway, &notifier);

    let map = plugins.plugin_map().await.unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["Modbus TCP"].library, "libplugin-modbus-tcp.so");
    assert_eq!(map["OPC UA"].schema, None);
}

#[tokio::test]
async fn add_and_delete_reach_the_gateway_and_notify() {
    let gateway = gateway();
    let notifier = MemoryNotifier::new();
    let plugins = PluginManager::new(&gateway, &notifier);

    plugins.add_plugin("libplugin-s7.so").await.unwrap();
    plugins.delete_plugin("OPC UA").await.unwrap();

    assert_eq!(
        *gateway.added_plugins.lock().unwrap(),
        vec!["libplugin-s7.so".to_string()]
    );
    assert_eq!(
        *gateway.deleted_plugins.lock().unwrap(),
        vec!["OPC UA".to_string()]
    );
    assert_eq!(notifier.count(NoticeLevel::Success), 2);
}

#[tokio::test]
async fn schema_lookup_uses_listed_name_or_lowercase_fallback() {
    let gateway = gateway();
    let notifier = MemoryNotifier::new();
    let plugins = PluginManager::new(&gateway, &notifier);

    let modbus = plugins.schema_for_plugin("Modbus TCP").await.unwrap();
    assert_eq!(modbus.tag_type, Some(vec![TagType::Int16, TagType::Float]));

    // Listed without a schema name
    let opc = plugins.schema_for_plugin("OPC UA").await.unwrap();
    assert_eq!(opc.tag_type, Some(vec![TagType::String]));

    // Not in the plugin list at all
    let s7 = plugins.schema_for_plugin("Siemens S7").await.unwrap();
    assert_eq!(s7.tag_type, None);

    assert_eq!(
        *gateway.schema_requests.lock().unwrap(),
        vec!["modbus-tcp", "opc ua", "siemens s7"]
    );
}
