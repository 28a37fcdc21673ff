use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::error::{SirenError, SirenResult},
    raster::buffer::PixelBuffer,
};

/// Decode encoded image bytes (any format the `image` crate recognizes) into straight ARGB.
pub fn decode_image(bytes: &[u8]) -> SirenResult<PixelBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    from_rgba_image(dyn_img.to_rgba8())
}

/// Load and decode an image file.
pub fn decode_file(path: &Path) -> SirenResult<PixelBuffer> {
    let dyn_img =
        image::open(path).with_context(|| format!("decode image '{}'", path.display()))?;
    from_rgba_image(dyn_img.to_rgba8())
}

/// Write `buffer` as a PNG, creating parent directories as needed.
pub fn encode_file(buffer: &PixelBuffer, path: &Path) -> SirenResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        &buffer.to_rgba8(),
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn from_rgba_image(rgba: image::RgbaImage) -> SirenResult<PixelBuffer> {
    let (width, height) = rgba.dimensions();
    let (w, h) = match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(SirenError::invalid_dimension(width, height)),
    };
    PixelBuffer::from_rgba8(w, h, rgba.as_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
