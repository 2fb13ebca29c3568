//! Lifecycle coordination: boot, shutdown, and startup failure modes.

use std::sync::Arc;
use std::time::Duration;

use bifrost::client::{RetryConfig, connect_with_retry};
use bifrost::server::RpcEndpoint;
use bifrost::server::config::{Config, GatewayConfig};
use bifrost::server::proto::GreetRequest;
use bifrost::server::proto::greeter_client::GreeterClient;
use bifrost::{BifrostError, Daemon, HelloGreeter};

fn ephemeral_config() -> Config {
    let mut config = Config::default();
    config.rpc.address = "127.0.0.1:0".to_string();
    config.http.address = "127.0.0.1:0".to_string();
    config
}

#[tokio::test]
async fn daemon_serves_both_endpoints() {
    let daemon = Daemon::start(ephemeral_config(), Arc::new(HelloGreeter))
        .await
        .unwrap();

    // Direct gRPC call
    let mut grpc = GreeterClient::connect(format!("http://{}", daemon.rpc_addr()))
        .await
        .unwrap();
    let reply = grpc
        .greet(GreetRequest {
            name: "Ada".to_string(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(reply.message, "Ada world");

    // Transcoded HTTP call
    let body: serde_json::Value =
        reqwest::get(format!("http://{}/v1/greet/Ada", daemon.http_addr()))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
    assert_eq!(body, serde_json::json!({ "message": "Ada world" }));

    daemon.shutdown();
    daemon.wait().await.unwrap();
}

#[tokio::test]
async fn rpc_bind_conflict_is_fatal() {
    let holder = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let mut config = ephemeral_config();
    config.rpc.address = holder.local_addr().unwrap().to_string();

    let err = Daemon::start(config, Arc::new(HelloGreeter))
        .await
        .unwrap_err();
    assert!(matches!(err, BifrostError::Bind { .. }));
}

#[tokio::test]
async fn dial_exhaustion_is_fatal() {
    let mut config = ephemeral_config();
    config.gateway = GatewayConfig {
        // Discard port; nothing listens there.
        rpc_target: Some("http://127.0.0.1:9".to_string()),
        retry: RetryConfig {
            max_attempts: 2,
            initial_delay_ms: 10,
            max_delay_ms: 20,
        },
    };

    let err = Daemon::start(config, Arc::new(HelloGreeter))
        .await
        .unwrap_err();
    assert!(matches!(err, BifrostError::Dial { .. }));
}

#[tokio::test]
async fn gateway_dial_retries_until_endpoint_appears() {
    // Reserve a port, free it, and dial it before anything listens there
    // again; the endpoint appears mid-retry.
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = probe.local_addr().unwrap();
    drop(probe);

    let (stop, stop_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let endpoint = RpcEndpoint::bind(addr).await.unwrap();
        endpoint.serve(Arc::new(HelloGreeter), stop_rx).await.unwrap();
    });

    let retry = RetryConfig {
        max_attempts: 10,
        initial_delay_ms: 100,
        max_delay_ms: 500,
    };
    connect_with_retry(&format!("http://{addr}"), &retry)
        .await
        .expect("dial should succeed once the endpoint is up");
    let _ = stop.send(true);
}
