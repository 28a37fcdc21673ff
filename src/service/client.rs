use std::{
    io::{BufReader, BufWriter, Write},
    net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

use crate::{
    foundation::error::{SirenError, SirenResult},
    protocol::{
        codec::{DecodeLimits, read_image, write_instruction_set},
        model::InstructionSet,
    },
    raster::buffer::PixelBuffer,
};

/// Sends instruction sets to a render server and reads back the finished canvas.
///
/// Each [`RenderClient::render`] call is one connection: write the request, half-close,
/// read one image. There are no retries; a server that aborts the session surfaces as a
/// [`SirenError::MalformedStream`] (short read) or [`SirenError::Transport`].
#[derive(Clone, Debug)]
pub struct RenderClient {
    addr: SocketAddr,
    timeout: Option<Duration>,
    limits: DecodeLimits,
}

impl RenderClient {
    /// Resolve `addr` (first address wins).
    pub fn new(addr: impl ToSocketAddrs) -> SirenResult<Self> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| SirenError::validation("server address resolved to nothing"))?;
        Ok(Self {
            addr,
            timeout: None,
            limits: DecodeLimits::UNBOUNDED,
        })
    }

    /// Apply `timeout` to connect, every read and every write.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Bound the size of the response image further than the requested canvas already does.
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run one request/response round trip.
    #[tracing::instrument(
        level = "debug",
        skip(self, set),
        fields(addr = %self.addr, instructions = set.len())
    )]
    pub fn render(&self, set: &InstructionSet) -> SirenResult<PixelBuffer> {
        let stream = match self.timeout {
            Some(t) => TcpStream::connect_timeout(&self.addr, t)?,
            None => TcpStream::connect(self.addr)?,
        };
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;

        let mut writer = BufWriter::new(&stream);
        write_instruction_set(&mut writer, set)?;
        writer.flush()?;
        drop(writer);
        stream.shutdown(Shutdown::Write)?;

        // Responses larger than the requested canvas are refused before any allocation.
        let (w, h) = (set.canvas_width(), set.canvas_height());
        let canvas_pixels = u64::from(w.unsigned_abs()) * u64::from(h.unsigned_abs());
        let limits = DecodeLimits {
            max_image_pixels: self.limits.max_image_pixels.min(canvas_pixels),
        };

        let mut reader = BufReader::new(&stream);
        let canvas = read_image(&mut reader, &limits)?;

        if i64::from(canvas.width()) != i64::from(w) || i64::from(canvas.height()) != i64::from(h) {
            return Err(SirenError::malformed(format!(
                "server returned a {}x{} canvas for a {w}x{h} request",
                canvas.width(),
                canvas.height(),
            )));
        }
        tracing::debug!("received canvas");
        Ok(canvas)
    }
}
