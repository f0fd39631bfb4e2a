pub mod fixtures;

use avifconv_api::setup::routes::setup_routes;
use avifconv_api::AppState;
use avifconv_core::Config;
use axum_test::TestServer;
use std::sync::Arc;

/// Configuration used by the integration tests: the fixed conversion settings, but
/// the fastest encoder speed to keep the suite quick.
pub fn test_config() -> Config {
    Config {
        avif_speed: 10,
        max_concurrent_conversions: 2,
        ..Config::default()
    }
}

/// Build a test server around the real router.
pub fn setup_test_app_with(config: Config) -> TestServer {
    let state = Arc::new(AppState::new(config.clone()));
    let router = setup_routes(&config, state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to start test server")
}

pub fn setup_test_app() -> TestServer {
    setup_test_app_with(test_config())
}
