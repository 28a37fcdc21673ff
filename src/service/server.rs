use std::{
    fmt,
    io::{BufReader, BufWriter, Write},
    net::{Shutdown, SocketAddr, TcpListener, TcpStream},
    time::{Duration, Instant},
};

use crate::{
    foundation::error::{SirenError, SirenResult},
    protocol::codec::{read_instruction_set, write_image},
    service::config::{Concurrency, ServerConfig},
};

/// Per-connection state machine.
///
/// `AwaitRequest -> Decoding -> Compositing -> EncodingResponse -> Closed`; a failure in any
/// phase jumps straight to `Closed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Waiting in `accept`.
    AwaitRequest,
    /// Reading the instruction set.
    Decoding,
    /// Drawing instructions onto the canvas.
    Compositing,
    /// Writing the canvas back.
    EncodingResponse,
    /// Both directions shut down.
    Closed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitRequest => "await_request",
            Self::Decoding => "decoding",
            Self::Compositing => "compositing",
            Self::EncodingResponse => "encoding_response",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Summary of a connection that completed its round trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionReport {
    /// Remote address, when the OS still knew it.
    pub peer: Option<SocketAddr>,
    /// Canvas size that was rendered.
    pub canvas: (u32, u32),
    /// Number of instructions drawn.
    pub instructions: usize,
    /// Wall time from first read to flushed response.
    pub elapsed: Duration,
}

/// A connection that was aborted, with the phase it failed in.
#[derive(thiserror::Error, Debug)]
#[error("session aborted during {phase}: {error}")]
pub struct SessionFailure {
    /// Phase that was running when the error surfaced.
    pub phase: SessionPhase,
    /// Underlying cause.
    #[source]
    pub error: SirenError,
}

/// Serve one connection: decode a request, composite it, write the canvas back.
///
/// The stream is shut down in both directions on every exit path. No response bytes are
/// written when decoding or compositing fails.
pub fn handle_connection(
    stream: TcpStream,
    config: &ServerConfig,
) -> Result<SessionReport, SessionFailure> {
    let peer = stream.peer_addr().ok();
    let span = tracing::info_span!("session", peer = ?peer);
    let _enter = span.enter();

    let mut phase = SessionPhase::Decoding;
    let result = run_session(&stream, config, &mut phase);

    // Peer may already be gone; closing is best effort.
    let _ = stream.shutdown(Shutdown::Both);

    match result {
        Ok(mut report) => {
            report.peer = peer;
            tracing::info!(
                width = report.canvas.0,
                height = report.canvas.1,
                instructions = report.instructions,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "rendered request"
            );
            Ok(report)
        }
        Err(error) => {
            tracing::warn!(%phase, %error, "session aborted");
            Err(SessionFailure { phase, error })
        }
    }
}

fn run_session(
    stream: &TcpStream,
    config: &ServerConfig,
    phase: &mut SessionPhase,
) -> SirenResult<SessionReport> {
    stream.set_read_timeout(config.read_timeout())?;
    stream.set_write_timeout(config.write_timeout())?;
    let started = Instant::now();

    *phase = SessionPhase::Decoding;
    let mut reader = BufReader::with_capacity(config.io_buffer_bytes, stream);
    let set = read_instruction_set(&mut reader, &config.limits)?;
    tracing::debug!(%phase, instructions = set.len(), "request decoded");

    *phase = SessionPhase::Compositing;
    let canvas = set.composite()?;

    *phase = SessionPhase::EncodingResponse;
    let mut writer = BufWriter::with_capacity(config.io_buffer_bytes, stream);
    write_image(&mut writer, &canvas)?;
    writer.flush()?;

    *phase = SessionPhase::Closed;
    Ok(SessionReport {
        peer: None,
        canvas: (canvas.width(), canvas.height()),
        instructions: set.len(),
        elapsed: started.elapsed(),
    })
}

/// TCP accept loop around [`handle_connection`].
#[derive(Debug)]
pub struct RenderServer {
    listener: TcpListener,
    config: ServerConfig,
    pool: Option<rayon::ThreadPool>,
}

impl RenderServer {
    /// Validate `config` and bind its listen address.
    pub fn bind(config: ServerConfig) -> SirenResult<Self> {
        config.validate()?;
        let listener = TcpListener::bind(&config.bind)?;
        let pool = match config.concurrency {
            Concurrency::Sequential => None,
            Concurrency::Pooled { threads } => Some(build_thread_pool(threads)?),
        };
        tracing::info!(
            addr = %listener.local_addr()?,
            concurrency = ?config.concurrency,
            "render server listening"
        );
        Ok(Self {
            listener,
            config,
            pool,
        })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> SirenResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Active configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Accept and serve connections until the process exits.
    pub fn serve(&self) -> SirenResult<()> {
        self.run(None)
    }

    /// Accept exactly `count` connections, serve them, then return.
    ///
    /// In pooled mode this waits for every dispatched session to finish.
    pub fn serve_connections(&self, count: usize) -> SirenResult<()> {
        self.run(Some(count))
    }

    fn run(&self, limit: Option<usize>) -> SirenResult<()> {
        let config = &self.config;
        match &self.pool {
            None => self.accept_loop(limit, |stream| {
                let _ = handle_connection(stream, config);
            }),
            Some(pool) => pool.in_place_scope(|scope| {
                self.accept_loop(limit, |stream| {
                    scope.spawn(move |_| {
                        let _ = handle_connection(stream, config);
                    });
                })
            }),
        }
    }

    fn accept_loop(
        &self,
        limit: Option<usize>,
        mut dispatch: impl FnMut(TcpStream),
    ) -> SirenResult<()> {
        let mut accepted = 0usize;
        while limit.is_none_or(|n| accepted < n) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    accepted += 1;
                    tracing::debug!(%peer, "connection accepted");
                    dispatch(stream);
                }
                Err(e) => {
                    // One bad accept must not take the service down.
                    tracing::warn!(error = %e, "accept failed");
                    std::thread::sleep(ACCEPT_RETRY_DELAY);
                }
            }
        }
        Ok(())
    }
}

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(10);

/// `threads` has already passed [`ServerConfig::validate`].
fn build_thread_pool(threads: Option<usize>) -> SirenResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("siren-worker-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SirenError::validation(format!("failed to build worker pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/service/server.rs"]
mod tests;
