//! Straight field-order serialization, no version tag, no checksums:
//!
//! ```text
//! InstructionSet := canvas_width:i32 canvas_height:i32 count:i32 Instruction{count}
//! Instruction    := Image x:f32 y:f32 rotation:f32 scale_x:f32 scale_y:f32
//! Image          := width:i32 height:i32 pixel:i32{width*height}   // row-major ARGB
//! ```
//!
//! Every integer is 4-byte big-endian two's complement, every float 4-byte big-endian
//! IEEE-754. A stream that ends before the declared sizes are satisfied decodes to
//! [`SirenError::MalformedStream`]; there are no partial results.

use std::io::{Read, Write};

use crate::{
    foundation::error::{SirenError, SirenResult},
    protocol::model::{DrawInstruction, InstructionSet},
    raster::{blit::Placement, buffer::PixelBuffer, color::Color},
};

/// Upper bounds applied while decoding, so a lying header cannot force a huge allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Largest `width * height` accepted for any single image or canvas.
    pub max_image_pixels: u64,
}

impl DecodeLimits {
    /// No bound beyond what fits in memory addressing.
    pub const UNBOUNDED: Self = Self {
        max_image_pixels: u64::MAX,
    };

    /// Reject `width x height` if it is non-positive or above the pixel cap.
    pub fn check_dims(&self, width: i32, height: i32) -> SirenResult<()> {
        if width <= 0 || height <= 0 {
            return Err(SirenError::invalid_dimension(width, height));
        }
        let pixels = u64::from(width.unsigned_abs()) * u64::from(height.unsigned_abs());
        if pixels > self.max_image_pixels {
            return Err(SirenError::malformed(format!(
                "declared size {width}x{height} exceeds the {} pixel limit",
                self.max_image_pixels
            )));
        }
        Ok(())
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_image_pixels: 1 << 26,
        }
    }
}

fn write_i32<W: Write + ?Sized>(w: &mut W, v: i32) -> SirenResult<()> {
    w.write_all(&v.to_be_bytes())?;
    Ok(())
}

fn write_f32<W: Write + ?Sized>(w: &mut W, v: f32) -> SirenResult<()> {
    w.write_all(&v.to_be_bytes())?;
    Ok(())
}

fn read_i32<R: Read + ?Sized>(r: &mut R) -> SirenResult<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

fn read_f32<R: Read + ?Sized>(r: &mut R) -> SirenResult<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_be_bytes(buf))
}

/// Encode an `Image`: dimensions followed by every pixel, row-major.
pub fn write_image<W: Write + ?Sized>(w: &mut W, image: &PixelBuffer) -> SirenResult<()> {
    let width = i32::try_from(image.width())
        .map_err(|_| SirenError::validation("image width does not fit in i32"))?;
    let height = i32::try_from(image.height())
        .map_err(|_| SirenError::validation("image height does not fit in i32"))?;
    write_i32(w, width)?;
    write_i32(w, height)?;

    let mut row_bytes = Vec::with_capacity(image.width() as usize * 4);
    for row in image.pixels().chunks(image.width() as usize) {
        row_bytes.clear();
        for px in row {
            row_bytes.extend_from_slice(&px.to_bits_i32().to_be_bytes());
        }
        w.write_all(&row_bytes)?;
    }
    Ok(())
}

/// Pixels read per `read_exact` call while decoding an image.
const DECODE_CHUNK_PIXELS: usize = 16 * 1024;

/// Decode an `Image` of the declared size.
///
/// The declared size is checked against `limits` and against addressable memory before any
/// pixel storage is reserved. Storage then grows with the bytes that actually arrive, so a
/// header that promises more than the peer sends fails with [`SirenError::MalformedStream`]
/// without a matching allocation.
pub fn read_image<R: Read + ?Sized>(
    r: &mut R,
    limits: &DecodeLimits,
) -> SirenResult<PixelBuffer> {
    let width = read_i32(r)?;
    let height = read_i32(r)?;
    limits.check_dims(width, height)?;

    let total = usize::try_from(u64::from(width.unsigned_abs()) * u64::from(height.unsigned_abs()))
        .ok()
        .filter(|px| {
            px.checked_mul(4)
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or_else(|| {
            SirenError::malformed(format!(
                "declared size {width}x{height} does not fit in memory"
            ))
        })?;

    let mut pixels = Vec::with_capacity(total.min(DECODE_CHUNK_PIXELS));
    let mut chunk = vec![0u8; total.min(DECODE_CHUNK_PIXELS) * 4];
    while pixels.len() < total {
        let n = (total - pixels.len()).min(DECODE_CHUNK_PIXELS);
        let bytes = &mut chunk[..n * 4];
        r.read_exact(bytes)?;
        pixels.extend(
            bytes
                .chunks_exact(4)
                .map(|b| Color::from_bits_i32(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))),
        );
    }
    PixelBuffer::from_pixels(width, height, pixels)
}

/// Encode one `Instruction`: the image, then its five placement floats.
pub fn write_instruction<W: Write + ?Sized>(
    w: &mut W,
    instruction: &DrawInstruction,
) -> SirenResult<()> {
    write_image(w, instruction.image())?;
    let p = instruction.placement();
    for v in [p.x, p.y, p.rotation, p.scale_x, p.scale_y] {
        write_f32(w, v)?;
    }
    Ok(())
}

/// Decode one `Instruction`.
pub fn read_instruction<R: Read + ?Sized>(
    r: &mut R,
    limits: &DecodeLimits,
) -> SirenResult<DrawInstruction> {
    let image = read_image(r, limits)?;
    let placement = Placement {
        x: read_f32(r)?,
        y: read_f32(r)?,
        rotation: read_f32(r)?,
        scale_x: read_f32(r)?,
        scale_y: read_f32(r)?,
    };
    Ok(DrawInstruction::placed(image, placement))
}

/// Encode a full request.
pub fn write_instruction_set<W: Write + ?Sized>(
    w: &mut W,
    set: &InstructionSet,
) -> SirenResult<()> {
    let count = i32::try_from(set.len())
        .map_err(|_| SirenError::validation("instruction count does not fit in i32"))?;
    write_i32(w, set.canvas_width())?;
    write_i32(w, set.canvas_height())?;
    write_i32(w, count)?;
    for inst in set.instructions() {
        write_instruction(w, inst)?;
    }
    Ok(())
}

/// Decode a full request, reading fields in declared order.
pub fn read_instruction_set<R: Read + ?Sized>(
    r: &mut R,
    limits: &DecodeLimits,
) -> SirenResult<InstructionSet> {
    let canvas_width = read_i32(r)?;
    let canvas_height = read_i32(r)?;
    limits.check_dims(canvas_width, canvas_height)?;
    let mut set = InstructionSet::new(canvas_width, canvas_height)?;

    let count = read_i32(r)?;
    let count = usize::try_from(count)
        .map_err(|_| SirenError::malformed(format!("negative instruction count {count}")))?;

    // Grows as instructions arrive; `count` is untrusted.
    for _ in 0..count {
        set.push(read_instruction(r, limits)?);
    }
    tracing::debug!(
        canvas_width,
        canvas_height,
        instructions = set.len(),
        "decoded instruction set"
    );
    Ok(set)
}

#[cfg(test)]
#[path = "../../tests/unit/protocol/codec.rs"]
mod tests;
