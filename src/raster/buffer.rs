use crate::{
    foundation::error::{SirenError, SirenResult},
    raster::color::{Color, blend},
};

/// Row-major grid of packed colors (`index = x + y * width`).
///
/// The backing storage always holds exactly `width * height` pixels and is never resized.
/// Point accessors are bounds-checked: coordinates outside the buffer are silently ignored
/// on write and read back as [`Color::TRANSPARENT`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Allocate a zeroed (fully transparent) buffer.
    pub fn new(width: i32, height: i32) -> SirenResult<Self> {
        let (w, h, len) = checked_dims(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            pixels: vec![Color::TRANSPARENT; len],
        })
    }

    /// Wrap existing pixels; `pixels.len()` must equal `width * height`.
    pub fn from_pixels(width: i32, height: i32, pixels: Vec<Color>) -> SirenResult<Self> {
        let (w, h, len) = checked_dims(width, height)?;
        if pixels.len() != len {
            return Err(SirenError::validation(format!(
                "pixel count {} does not match {width}x{height}",
                pixels.len()
            )));
        }
        Ok(Self {
            width: w,
            height: h,
            pixels,
        })
    }

    /// Build from straight RGBA8 bytes (4 bytes per pixel, row-major).
    pub fn from_rgba8(width: i32, height: i32, rgba: &[u8]) -> SirenResult<Self> {
        if !rgba.len().is_multiple_of(4) {
            return Err(SirenError::validation(
                "rgba8 byte length must be a multiple of 4",
            ));
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|px| Color::from_rgba8([px[0], px[1], px[2], px[3]]))
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Straight RGBA8 bytes, row-major.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            out.extend_from_slice(&px.to_rgba8());
        }
        out
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Always false; buffers have positive dimensions.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Read-only view of the backing storage.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Set every pixel to `color`.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some(x as usize + y as usize * self.width as usize)
    }

    /// Overwrite a pixel without blending. Out-of-bounds writes are a no-op.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if let Some(i) = self.index_of(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Stored color, or [`Color::TRANSPARENT`] outside the buffer.
    pub fn get_pixel(&self, x: i64, y: i64) -> Color {
        self.index_of(x, y)
            .map_or(Color::TRANSPARENT, |i| self.pixels[i])
    }

    /// Blend `color` over the pixel at `(x, y)`. Opaque colors overwrite directly.
    pub fn draw_pixel(&mut self, x: i64, y: i64, color: Color) {
        let Some(i) = self.index_of(x, y) else {
            return;
        };
        if color.is_opaque() {
            self.pixels[i] = color;
        } else {
            self.pixels[i] = blend(self.pixels[i], color);
        }
    }

    /// Index-addressed variant of [`PixelBuffer::draw_pixel`] for hot loops.
    /// Indices at or past `len()` are ignored.
    pub fn draw_pixel_at(&mut self, index: usize, color: Color) {
        if let Some(px) = self.pixels.get_mut(index) {
            *px = blend(*px, color);
        }
    }
}

fn checked_dims(width: i32, height: i32) -> SirenResult<(u32, u32, usize)> {
    if width <= 0 || height <= 0 {
        return Err(SirenError::invalid_dimension(width, height));
    }
    let (w, h) = (width as u32, height as u32);
    let len = (w as usize)
        .checked_mul(h as usize)
        .ok_or_else(|| SirenError::invalid_dimension(width, height))?;
    Ok((w, h, len))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
