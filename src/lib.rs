//! Render Siren is a minimal rendering-as-a-service engine.
//!
//! A client sends an ordered list of images with placements (position, rotation, scale) over
//! a raw TCP socket; the server composites them onto a canvas with a software rasterizer and
//! returns the finished raster.
//!
//! # Pipeline overview
//!
//! 1. **Build**: [`InstructionSet`] = canvas size + [`DrawInstruction`]s in draw order
//! 2. **Encode**: [`write_instruction_set`] (big-endian, field order, no framing)
//! 3. **Composite**: [`InstructionSet::composite`] blits each image with [`blit_bitmap`]
//! 4. **Respond**: [`write_image`] sends the canvas back, then the connection closes
//!
//! Colors are straight (non-premultiplied) packed ARGB; see [`blend`] for the blend law.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod foundation;
mod protocol;
mod raster;
mod service;

pub use assets::codec::{decode_file, decode_image, encode_file};
pub use foundation::error::{SirenError, SirenResult};
pub use foundation::math::BLIT_EPSILON;
pub use protocol::codec::{
    DecodeLimits, read_image, read_instruction, read_instruction_set, write_image,
    write_instruction, write_instruction_set,
};
pub use protocol::manifest::{CanvasSize, ManifestEntry, RenderManifest, load_manifest};
pub use protocol::model::{DrawInstruction, InstructionSet};
pub use raster::blit::{BlitMode, Placement, blit_bitmap};
pub use raster::buffer::PixelBuffer;
pub use raster::color::{Channel, Color, blend};
pub use service::client::RenderClient;
pub use service::config::{Concurrency, DEFAULT_PORT, ServerConfig};
pub use service::server::{
    RenderServer, SessionFailure, SessionPhase, SessionReport, handle_connection,
};
