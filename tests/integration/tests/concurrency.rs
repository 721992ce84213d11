//! Concurrent callers racing on the same route identity.

use std::sync::Arc;
use std::time::Duration;

use meridian_core::config::EngineConfig;
use meridian_core::types::{Packet, Priority};
use meridian_routing::RoutingEngine;

use meridian_integration_tests::{interplanetary_topology, CountingMonitor, CountingVerifier};

#[tokio::test]
async fn concurrent_identical_packets_converge() {
    // A very wide bucket keeps all tasks inside one derivation window.
    let config = EngineConfig {
        time_bucket: Duration::from_secs(86_400),
        ..EngineConfig::default()
    };
    let engine = Arc::new(RoutingEngine::new(
        Arc::new(CountingVerifier::authorizing()),
        Arc::new(CountingMonitor::reporting(1e-5)),
        Arc::new(interplanetary_topology()),
        config,
    ));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let packet =
                Packet::new("earth", "mars", vec![0xAA; 64], "shared-nonce", Priority::Data);
            engine.route_packet(&packet).await
        }));
    }

    let mut routes = Vec::new();
    for handle in handles {
        routes.push(handle.await.expect("task panicked").expect("routing failed"));
    }

    // Every caller sees the same fingerprint and path.
    let first = &routes[0];
    for route in &routes {
        assert_eq!(route.fingerprint, first.fingerprint);
        assert_eq!(route.path, first.path);
    }

    // The cache converged on exactly one live entry for that identity.
    assert_eq!(engine.table().len(), 1);
    assert!(engine
        .table()
        .lookup(&first.fingerprint, chrono::Utc::now())
        .is_some());
}

#[tokio::test]
async fn distinct_nonces_do_not_contend() {
    let config = EngineConfig {
        time_bucket: Duration::from_secs(86_400),
        ..EngineConfig::default()
    };
    let engine = Arc::new(RoutingEngine::new(
        Arc::new(CountingVerifier::authorizing()),
        Arc::new(CountingMonitor::reporting(1e-5)),
        Arc::new(interplanetary_topology()),
        config,
    ));

    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let packet = Packet::new(
                "earth",
                "mars",
                vec![0xAA; 64],
                format!("nonce-{}", i),
                Priority::Data,
            );
            engine.route_packet(&packet).await
        }));
    }

    for handle in handles {
        handle.await.expect("task panicked").expect("routing failed");
    }

    // One cache entry per distinct nonce.
    assert_eq!(engine.table().len(), 16);
}
