use neuron_admin_client::HttpConfigClient;
use neuron_admin_models::settings::Client;
use std::sync::Once;
use tracing::Level;
use wiremock::MockServer;

static INIT_TRACING: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

pub fn client_settings(server: &MockServer) -> Client {
    Client {
        base_url: server.uri(),
        timeout_ms: 2_000,
        ..Client::default()
    }
}

pub fn http_client(server: &MockServer) -> HttpConfigClient {
    init_tracing();
    HttpConfigClient::new(&client_settings(server)).unwrap()
}
