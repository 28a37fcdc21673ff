use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SirenError::invalid_dimension(0, 4)
            .to_string()
            .contains("invalid dimension:")
    );
    assert!(
        SirenError::malformed("x")
            .to_string()
            .contains("malformed stream:")
    );
    assert!(
        SirenError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SirenError::Transport(std::io::Error::other("x"))
            .to_string()
            .contains("transport failure:")
    );
}

#[test]
fn unexpected_eof_is_a_malformed_stream() {
    let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short");
    assert!(matches!(
        SirenError::from_io(eof),
        SirenError::MalformedStream(_)
    ));

    let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
    let err = SirenError::from(reset);
    assert!(matches!(err, SirenError::Transport(_)));
    assert!(err.is_connection_fault());
    assert!(!SirenError::validation("x").is_connection_fault());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SirenError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
