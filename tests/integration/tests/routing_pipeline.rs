//! End-to-end pipeline scenarios: gate ordering, error surfacing, and the
//! crypto-backed attestation path.

use std::sync::Arc;
use std::time::Duration;

use meridian_core::config::EngineConfig;
use meridian_core::types::{Packet, Priority};
use meridian_crypto::{issue_proof, AuthorityKeypair, Ed25519AttestationVerifier};
use meridian_routing::{RoutingEngine, RoutingError};

use meridian_integration_tests::{
    interplanetary_topology, CountingMixer, CountingMonitor, CountingVerifier,
};

fn wide_bucket_config() -> EngineConfig {
    // A one-hour bucket keeps multi-call scenarios inside one window.
    EngineConfig {
        time_bucket: Duration::from_secs(3600),
        ..EngineConfig::default()
    }
}

fn packet() -> Packet {
    Packet::new("earth", "mars", vec![0xAA; 64], "nonce-1", Priority::Data)
}

#[tokio::test]
async fn attestation_rejection_short_circuits_pipeline() {
    let verifier = Arc::new(CountingVerifier::rejecting());
    let monitor = Arc::new(CountingMonitor::reporting(1e-5));
    let engine = RoutingEngine::new(
        verifier.clone(),
        monitor.clone(),
        Arc::new(interplanetary_topology()),
        wide_bucket_config(),
    );

    let table_size_before = engine.table().len();
    let err = engine.route_packet(&packet()).await.unwrap_err();

    assert!(matches!(err, RoutingError::Attestation { .. }));
    assert_eq!(verifier.call_count(), 1);
    // Nothing downstream of the attestation gate runs.
    assert_eq!(monitor.call_count(), 0);
    assert_eq!(engine.table().len(), table_size_before);
}

#[tokio::test]
async fn verifier_failure_is_an_attestation_error() {
    let verifier = Arc::new(CountingVerifier::failing("chain unreachable"));
    let monitor = Arc::new(CountingMonitor::reporting(1e-5));
    let engine = RoutingEngine::new(
        verifier,
        monitor.clone(),
        Arc::new(interplanetary_topology()),
        wide_bucket_config(),
    );

    let err = engine.route_packet(&packet()).await.unwrap_err();
    assert!(matches!(err, RoutingError::Attestation { .. }));
    assert!(err.to_string().contains("chain unreachable"));
    assert_eq!(monitor.call_count(), 0);
}

#[tokio::test]
async fn excessive_sigma_blocks_derivation() {
    // σ = 1e-4 against the default 5e-5 threshold.
    let verifier = Arc::new(CountingVerifier::authorizing());
    let monitor = Arc::new(CountingMonitor::reporting(1e-4));
    let mixer = Arc::new(CountingMixer::new());
    let engine = RoutingEngine::with_mixer(
        verifier,
        monitor.clone(),
        Arc::new(interplanetary_topology()),
        wide_bucket_config(),
        mixer.clone(),
    );

    let err = engine.route_packet(&packet()).await.unwrap_err();
    assert!(matches!(err, RoutingError::Instability { .. }));
    assert!(err.is_retryable());
    assert_eq!(monitor.call_count(), 1);
    // Derivation never starts once the stability gate refuses.
    assert_eq!(mixer.call_count(), 0);
    assert!(engine.table().is_empty());
}

#[tokio::test]
async fn monitor_failure_is_an_instability_error() {
    let verifier = Arc::new(CountingVerifier::authorizing());
    let monitor = Arc::new(CountingMonitor::failing("feed offline"));
    let engine = RoutingEngine::new(
        verifier,
        monitor,
        Arc::new(interplanetary_topology()),
        wide_bucket_config(),
    );

    let err = engine.route_packet(&packet()).await.unwrap_err();
    assert!(matches!(err, RoutingError::Instability { .. }));
    assert!(engine.table().is_empty());
}

#[tokio::test]
async fn routed_packet_lands_in_cache_with_latency() {
    let verifier = Arc::new(CountingVerifier::authorizing());
    let monitor = Arc::new(CountingMonitor::reporting(1e-5));
    let engine = RoutingEngine::new(
        verifier,
        monitor,
        Arc::new(interplanetary_topology()),
        wide_bucket_config(),
    );

    let route = engine.route_packet(&packet()).await.unwrap();

    assert_eq!(route.source().unwrap().as_str(), "earth");
    assert_eq!(route.destination().unwrap().as_str(), "mars");
    assert!(engine.topology().validate(&route.path));
    assert!(route.stability > 0.0 && route.stability <= 1.0);
    // Data priority rides the base delay unchanged.
    assert_eq!(route.latency, Duration::from_secs(3500));

    let cached = engine
        .table()
        .lookup(&route.fingerprint, chrono::Utc::now())
        .expect("route should be cached");
    assert_eq!(cached.path, route.path);
}

#[tokio::test]
async fn emergency_priority_halves_latency() {
    let verifier = Arc::new(CountingVerifier::authorizing());
    let monitor = Arc::new(CountingMonitor::reporting(1e-5));
    let engine = RoutingEngine::new(
        verifier,
        monitor,
        Arc::new(interplanetary_topology()),
        wide_bucket_config(),
    );

    let mut urgent = packet();
    urgent.priority = Priority::Emergency;
    let route = engine.route_packet(&urgent).await.unwrap();
    // 3500 s base → 1750 s at emergency priority.
    assert_eq!(route.latency, Duration::from_secs(1750));
}

#[tokio::test]
async fn unknown_priority_pays_best_effort_surcharge() {
    let verifier = Arc::new(CountingVerifier::authorizing());
    let monitor = Arc::new(CountingMonitor::reporting(1e-5));
    let engine = RoutingEngine::new(
        verifier,
        monitor,
        Arc::new(interplanetary_topology()),
        wide_bucket_config(),
    );

    let mut odd = packet();
    odd.priority = Priority::parse("unknown-value");
    let route = engine.route_packet(&odd).await.unwrap();
    assert_eq!(route.latency, Duration::from_secs(4200));
}

#[tokio::test]
async fn ed25519_proof_round_trip_through_engine() {
    let authority = AuthorityKeypair::generate();
    let verifier = Arc::new(Ed25519AttestationVerifier::new(authority.public()));
    let monitor = Arc::new(CountingMonitor::reporting(1e-5));
    let engine = RoutingEngine::new(
        verifier,
        monitor,
        Arc::new(interplanetary_topology()),
        wide_bucket_config(),
    );

    let mut signed = packet();
    signed.proof = issue_proof(&authority, &signed.source, &signed.destination);
    let route = engine.route_packet(&signed).await.unwrap();
    assert!(engine.topology().validate(&route.path));

    // A proof for different endpoints does not transfer.
    let mut stolen = packet();
    stolen.source = "venus".into();
    stolen.proof = signed.proof.clone();
    let err = engine.route_packet(&stolen).await.unwrap_err();
    assert!(matches!(err, RoutingError::Attestation { .. }));
}

#[tokio::test]
async fn route_serializes_for_the_wire() {
    let verifier = Arc::new(CountingVerifier::authorizing());
    let monitor = Arc::new(CountingMonitor::reporting(1e-5));
    let engine = RoutingEngine::new(
        verifier,
        monitor,
        Arc::new(interplanetary_topology()),
        wide_bucket_config(),
    );

    let route = engine.route_packet(&packet()).await.unwrap();
    let wire = serde_json::to_value(&route).unwrap();

    // Fingerprint rides as 64 hex characters, latency as plain seconds.
    assert_eq!(
        wire["fingerprint"].as_str().unwrap(),
        route.fingerprint.to_hex()
    );
    assert_eq!(wire["latency"].as_u64().unwrap(), 3500);
    assert_eq!(wire["path"][0].as_str().unwrap(), "earth");
}

#[tokio::test]
async fn expired_routes_are_not_resurrected() {
    let verifier = Arc::new(CountingVerifier::authorizing());
    let monitor = Arc::new(CountingMonitor::reporting(1e-5));
    let config = EngineConfig {
        route_ttl: Duration::ZERO,
        time_bucket: Duration::from_secs(3600),
        ..EngineConfig::default()
    };
    let engine = RoutingEngine::new(
        verifier,
        monitor,
        Arc::new(interplanetary_topology()),
        config,
    );

    let route = engine.route_packet(&packet()).await.unwrap();

    // With a zero TTL the entry expires immediately.
    let later = chrono::Utc::now() + chrono::Duration::seconds(1);
    assert!(engine.table().lookup(&route.fingerprint, later).is_none());
}
