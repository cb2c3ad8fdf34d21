//! Test helper functions and utilities

use readywall_client::{Gateway, Session};
use std::sync::Once;
use wiremock::MockServer;

static INIT_LOGGER: Once = Once::new();

/// Token every authenticated test request carries
pub const TOKEN: &str = "test-token";

/// Initialize test logging (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Mock gateway plus a client pointed at it
pub struct TestGateway {
    pub server: MockServer,
    pub gateway: Gateway,
    pub session: Session,
}

impl TestGateway {
    /// Start a mock server and a signed-in client
    pub async fn start() -> Self {
        init_test_logging();
        let server = MockServer::start().await;
        let gateway = Gateway::new(server.uri());
        Self {
            server,
            gateway,
            session: Session::new(TOKEN, None),
        }
    }

    /// Number of requests the mock server has seen
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

/// `Authorization` header value for [`TOKEN`]
pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}
