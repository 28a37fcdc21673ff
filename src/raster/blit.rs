use crate::{
    foundation::math::{approx_one, approx_zero, ceil_px, clip_span, floor_px},
    raster::buffer::PixelBuffer,
};

/// Where and how a source image lands on a destination buffer.
///
/// `(x, y)` is the destination point under the center of the (scaled) source image.
/// Rotation is in radians; positive angles turn clockwise on a y-down canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// Destination x of the image center.
    pub x: f32,
    /// Destination y of the image center.
    pub y: f32,
    /// Rotation in radians.
    #[serde(default)]
    pub rotation: f32,
    /// Horizontal scale factor, `1.0` means unscaled.
    #[serde(default = "unit_scale")]
    pub scale_x: f32,
    /// Vertical scale factor, `1.0` means unscaled.
    #[serde(default = "unit_scale")]
    pub scale_y: f32,
}

fn unit_scale() -> f32 {
    1.0
}

impl Placement {
    /// Unrotated, unscaled placement centered at `(x, y)`.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Same placement rotated by `rotation` radians.
    pub fn rotated(self, rotation: f32) -> Self {
        Self { rotation, ..self }
    }

    /// Same placement scaled by `(scale_x, scale_y)`.
    pub fn scaled(self, scale_x: f32, scale_y: f32) -> Self {
        Self {
            scale_x,
            scale_y,
            ..self
        }
    }

    /// Finite coordinates and strictly positive scale factors.
    pub fn is_drawable(&self) -> bool {
        [self.x, self.y, self.rotation, self.scale_x, self.scale_y]
            .iter()
            .all(|v| v.is_finite())
            && self.scale_x > 0.0
            && self.scale_y > 0.0
    }

    /// Blit strategy for this placement.
    pub fn mode(&self) -> BlitMode {
        BlitMode::select(
            f64::from(self.rotation),
            f64::from(self.scale_x),
            f64::from(self.scale_y),
        )
    }
}

/// The four blit algorithms, picked once per placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlitMode {
    /// Straight copy centered on the anchor.
    Identity,
    /// Nearest-neighbor scaling, no rotation.
    Scaled,
    /// Rotation at unit scale.
    Rotated,
    /// Rotation combined with scaling.
    RotatedScaled,
}

impl BlitMode {
    /// Pick a strategy, treating values within [`BLIT_EPSILON`](crate::BLIT_EPSILON) of 0
    /// (rotation) or 1 (scale) as exact.
    pub fn select(rotation: f64, scale_x: f64, scale_y: f64) -> Self {
        let unrotated = approx_zero(rotation);
        let unscaled = approx_one(scale_x) && approx_one(scale_y);
        match (unrotated, unscaled) {
            (true, true) => Self::Identity,
            (true, false) => Self::Scaled,
            (false, true) => Self::Rotated,
            (false, false) => Self::RotatedScaled,
        }
    }
}

/// Composite `src` onto `dst` at `placement`, dispatching to one of the [`BlitMode`]s.
///
/// Sampling is nearest-neighbor and every destination write goes through
/// [`PixelBuffer::draw_pixel`] blending. Placements that miss the destination, or that are
/// not [drawable](Placement::is_drawable), draw nothing.
pub fn blit_bitmap(dst: &mut PixelBuffer, src: &PixelBuffer, placement: &Placement) {
    if !placement.is_drawable() {
        tracing::debug!(?placement, "skipping placement with degenerate transform");
        return;
    }

    let x = f64::from(placement.x);
    let y = f64::from(placement.y);
    let rot = f64::from(placement.rotation);
    let sx = f64::from(placement.scale_x);
    let sy = f64::from(placement.scale_y);

    let mode = placement.mode();
    tracing::trace!(?mode, x, y, rot, sx, sy, "blit");
    match mode {
        BlitMode::Identity => blit_direct(dst, src, x, y),
        BlitMode::Scaled => blit_scaled(dst, src, x, y, sx, sy),
        BlitMode::Rotated => blit_rotated(dst, src, x, y, rot),
        BlitMode::RotatedScaled => blit_rotated_scaled(dst, src, x, y, rot, sx, sy),
    }
}

fn dst_extent(dst: &PixelBuffer) -> (i64, i64) {
    (i64::from(dst.width()), i64::from(dst.height()))
}

fn blit_direct(dst: &mut PixelBuffer, src: &PixelBuffer, x: f64, y: f64) {
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));
    let (dw, dh) = dst_extent(dst);

    let left = floor_px(x - sw as f64 * 0.5);
    let top = floor_px(y - sh as f64 * 0.5);

    let Some((x0, x1)) = clip_span(left, left.saturating_add(sw), dw) else {
        return;
    };
    let Some((y0, y1)) = clip_span(top, top.saturating_add(sh), dh) else {
        return;
    };

    let src_px = src.pixels();
    for dy in y0..y1 {
        let src_row = (dy - top) as usize * sw as usize;
        let dst_row = dy as usize * dw as usize;
        for dx in x0..x1 {
            let sample = src_px[src_row + (dx - left) as usize];
            dst.draw_pixel_at(dst_row + dx as usize, sample);
        }
    }
}

fn blit_scaled(dst: &mut PixelBuffer, src: &PixelBuffer, x: f64, y: f64, sx: f64, sy: f64) {
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));
    let (dw, dh) = dst_extent(dst);

    let fw = (sw as f64 * sx).round();
    let fh = (sh as f64 * sy).round();
    if fw < 1.0 || fh < 1.0 {
        return;
    }
    let (fw_px, fh_px) = (fw as i64, fh as i64);

    let left = floor_px(x - fw * 0.5);
    let top = floor_px(y - fh * 0.5);

    let Some((x0, x1)) = clip_span(left, left.saturating_add(fw_px), dw) else {
        return;
    };
    let Some((y0, y1)) = clip_span(top, top.saturating_add(fh_px), dh) else {
        return;
    };

    let step_x = sw as f64 / fw;
    let step_y = sh as f64 / fh;

    for dy in y0..y1 {
        let src_y = (((dy - top) as f64 * step_y) as i64).min(sh - 1);
        for dx in x0..x1 {
            let src_x = (((dx - left) as f64 * step_x) as i64).min(sw - 1);
            dst.draw_pixel(dx, dy, src.get_pixel(src_x, src_y));
        }
    }
}

fn blit_rotated(dst: &mut PixelBuffer, src: &PixelBuffer, x: f64, y: f64, rot: f64) {
    blit_transformed(dst, src, x, y, rot, 1.0, 1.0);
}

fn blit_rotated_scaled(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    x: f64,
    y: f64,
    rot: f64,
    sx: f64,
    sy: f64,
) {
    blit_transformed(dst, src, x, y, rot, sx, sy);
}

/// Bounding-box scan with inverse mapping.
///
/// The footprint rectangle (source size times scale) is anchored like the direct blit, its
/// four corners are rotated about its center, and every destination pixel inside the
/// axis-aligned bounds of those corners is mapped back into source space at its pixel
/// center. Only samples that land inside the source are drawn.
fn blit_transformed(
    dst: &mut PixelBuffer,
    src: &PixelBuffer,
    x: f64,
    y: f64,
    rot: f64,
    sx: f64,
    sy: f64,
) {
    let (sw, sh) = (f64::from(src.width()), f64::from(src.height()));
    let (dw, dh) = dst_extent(dst);

    let fw = sw * sx;
    let fh = sh * sy;
    if !(fw > 0.0 && fh > 0.0) {
        return;
    }

    let cx = floor_px(x - fw * 0.5) as f64 + fw * 0.5;
    let cy = floor_px(y - fh * 0.5) as f64 + fh * 0.5;

    let (sin, cos) = rot.sin_cos();
    let (hw, hh) = (fw * 0.5, fh * 0.5);

    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for (px, py) in [(-hw, -hh), (hw, -hh), (-hw, hh), (hw, hh)] {
        let rx = px * cos - py * sin;
        let ry = px * sin + py * cos;
        min = (min.0.min(rx), min.1.min(ry));
        max = (max.0.max(rx), max.1.max(ry));
    }

    let Some((x0, x1)) = clip_span(floor_px(cx + min.0), ceil_px(cx + max.0), dw) else {
        return;
    };
    let Some((y0, y1)) = clip_span(floor_px(cy + min.1), ceil_px(cy + max.1), dh) else {
        return;
    };

    for dy in y0..y1 {
        let oy = dy as f64 + 0.5 - cy;
        for dx in x0..x1 {
            let ox = dx as f64 + 0.5 - cx;

            let u = (ox * cos + oy * sin) / sx + sw * 0.5;
            let v = (oy * cos - ox * sin) / sy + sh * 0.5;
            if !(u >= 0.0 && v >= 0.0 && u < sw && v < sh) {
                continue;
            }

            dst.draw_pixel(dx, dy, src.get_pixel(u as i64, v as i64));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blit.rs"]
mod tests;
