//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use wiremock::MockServer;

use zhiyoubao_sdk::client::DEFAULT_ENDPOINT_KEY;
use zhiyoubao_sdk::config::RetryPolicy;
use zhiyoubao_sdk::observability::MemoryRetryLogger;
use zhiyoubao_sdk::{Client, ClientConfig};

pub const SERVICE_PATH: &str = "/boss/service/code.htm";
pub const PRIVATE_KEY: &str = "TESTFX";

/// A successful order status reply with two ticket lines.
pub const ORDER_REPLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PWBResponse>
    <transactionName>QUERY_ORDER_RES</transactionName>
    <code>0</code>
    <description>成功</description>
    <orderResponse>
        <order>
            <orderCode>ABC123</orderCode>
            <linkName>Zhang San</linkName>
            <linkMobile>13800000000</linkMobile>
            <payStatus>1</payStatus>
            <ticketOrders>
                <ticketOrder>
                    <goodsName>Adult ticket</goodsName>
                    <quantity>2</quantity>
                    <price>10000</price>
                    <totalPrice>20000</totalPrice>
                    <alreadyCheckNum>1</alreadyCheckNum>
                    <returnNum>0</returnNum>
                </ticketOrder>
                <ticketOrder>
                    <goodsName>Child ticket</goodsName>
                    <quantity>1</quantity>
                    <price>5000</price>
                    <totalPrice>5000</totalPrice>
                    <alreadyCheckNum>0</alreadyCheckNum>
                    <returnNum>0</returnNum>
                </ticketOrder>
            </ticketOrders>
        </order>
    </orderResponse>
</PWBResponse>"#;

/// Fast retry policy so real-time tests stay quick.
pub fn fast_policy(max_retries: u32, retry_on_timeout: bool) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_delay_ms: 10,
        multiplier: 2.0,
        max_delay_ms: 100,
        retry_on_timeout,
    }
}

/// Config pointing the default endpoint at `url`.
pub fn test_config(url: &str) -> ClientConfig {
    let mut config = ClientConfig::new("CORP01", "admin", PRIVATE_KEY);
    config.endpoints = BTreeMap::from([(DEFAULT_ENDPOINT_KEY.to_string(), url.to_string())]);
    config.retry = fast_policy(3, true);
    config.transport.connect_timeout_secs = 1;
    config.transport.request_timeout_secs = 1;
    config
}

/// Full service URL on a mock server.
pub fn service_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), SERVICE_PATH)
}

/// Client over the real reqwest transport with an in-memory retry log.
pub fn test_client(config: ClientConfig) -> (Client, MemoryRetryLogger) {
    let logger = MemoryRetryLogger::new();
    let client = Client::new(config)
        .unwrap()
        .with_logger(Arc::new(logger.clone()));
    (client, logger)
}

/// URL of a local port with nothing listening on it.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, SERVICE_PATH)
}

/// URL of a server that reads each request and hangs up without replying.
///
/// Returns the URL and a counter of accepted connections.
pub async fn hang_up_url() -> (String, Arc<AtomicU32>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 8192];
            let _ = socket.read(&mut buf).await;
            drop(socket);
        }
    });

    (format!("http://{}{}", addr, SERVICE_PATH), hits)
}

/// Decode an `application/x-www-form-urlencoded` body.
pub fn form_fields(body: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(body).into_owned().collect()
}
