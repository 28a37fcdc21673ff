use std::{fs::File, io::BufReader, net::SocketAddr, path::Path, time::Duration};

use anyhow::Context;

use crate::{
    foundation::error::{SirenError, SirenResult},
    protocol::codec::DecodeLimits,
};

/// Well-known port of the render service.
pub const DEFAULT_PORT: u16 = 8011;

/// How accepted connections are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Concurrency {
    /// Fully process each connection before accepting the next one.
    #[default]
    Sequential,
    /// Hand each accepted connection to a worker pool; every worker owns its own canvas.
    Pooled {
        /// Worker count; `None` uses one per logical CPU.
        #[serde(default)]
        threads: Option<usize>,
    },
}

/// Render server settings, loadable from JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind: String,
    /// Connection scheduling.
    pub concurrency: Concurrency,
    /// Per-read socket timeout. Absent means a stalled peer can block its session forever.
    pub read_timeout_ms: Option<u64>,
    /// Per-write socket timeout.
    pub write_timeout_ms: Option<u64>,
    /// Decode bounds for incoming requests.
    pub limits: DecodeLimits,
    /// Capacity of the buffered reader and writer wrapped around each connection.
    pub io_buffer_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: format!("127.0.0.1:{DEFAULT_PORT}"),
            concurrency: Concurrency::Sequential,
            read_timeout_ms: None,
            write_timeout_ms: None,
            limits: DecodeLimits::default(),
            io_buffer_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Read and parse a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> SirenResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> SirenResult<()> {
        self.bind.parse::<SocketAddr>().map_err(|e| {
            SirenError::validation(format!("bind address '{}' is invalid: {e}", self.bind))
        })?;
        if let Concurrency::Pooled { threads: Some(0) } = self.concurrency {
            return Err(SirenError::validation(
                "pooled concurrency 'threads' must be >= 1 when set",
            ));
        }
        if self.read_timeout_ms == Some(0) || self.write_timeout_ms == Some(0) {
            return Err(SirenError::validation(
                "socket timeouts must be >= 1 ms when set",
            ));
        }
        if self.limits.max_image_pixels == 0 {
            return Err(SirenError::validation("limits.max_image_pixels must be > 0"));
        }
        if self.io_buffer_bytes == 0 {
            return Err(SirenError::validation("io_buffer_bytes must be > 0"));
        }
        Ok(())
    }

    pub(crate) fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub(crate) fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/config.rs"]
mod tests;
