//! Software rasterizer: packed colors, pixel buffers and the blit compositor.

/// Bounding-box/inverse-mapping blits (direct, scaled, rotated, rotated+scaled).
pub mod blit;
/// Owned, bounds-checked pixel storage.
pub mod buffer;
/// Packed ARGB colors and the blend law.
pub mod color;
