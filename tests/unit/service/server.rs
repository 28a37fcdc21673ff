use super::*;

#[test]
fn phase_names_are_stable() {
    let names: Vec<String> = [
        SessionPhase::AwaitRequest,
        SessionPhase::Decoding,
        SessionPhase::Compositing,
        SessionPhase::EncodingResponse,
        SessionPhase::Closed,
    ]
    .iter()
    .map(ToString::to_string)
    .collect();
    assert_eq!(
        names,
        ["await_request", "decoding", "compositing", "encoding_response", "closed"]
    );
}

#[test]
fn failure_display_names_phase_and_cause() {
    let f = SessionFailure {
        phase: SessionPhase::Decoding,
        error: SirenError::malformed("short read"),
    };
    let s = f.to_string();
    assert!(s.starts_with("session aborted during decoding: "), "{s}");
    assert!(s.contains("short read"));
}

#[test]
fn zero_thread_pool_is_rejected_at_bind() {
    let cfg = ServerConfig {
        bind: "127.0.0.1:0".to_string(),
        concurrency: Concurrency::Pooled { threads: Some(0) },
        ..ServerConfig::default()
    };
    assert!(matches!(RenderServer::bind(cfg), Err(SirenError::Validation(_))));
}

#[test]
fn thread_pool_honours_requested_size() {
    let pool = build_thread_pool(Some(2)).unwrap();
    assert_eq!(pool.current_num_threads(), 2);
}

#[test]
fn bind_rejects_invalid_config() {
    let cfg = ServerConfig {
        bind: "not an address".to_string(),
        ..ServerConfig::default()
    };
    assert!(matches!(RenderServer::bind(cfg), Err(SirenError::Validation(_))));
}

#[test]
fn bind_on_ephemeral_port_reports_address() {
    let server = RenderServer::bind(ServerConfig {
        bind: "127.0.0.1:0".to_string(),
        ..ServerConfig::default()
    })
    .unwrap();
    let addr = server.local_addr().unwrap();
    assert!(addr.ip().is_loopback());
    assert_ne!(addr.port(), 0);
    assert_eq!(server.config().concurrency, Concurrency::Sequential);
}
