/// Tolerance used when deciding whether a rotation is zero or a scale factor is one.
pub const BLIT_EPSILON: f64 = 1e-6;

pub(crate) fn approx_zero(v: f64) -> bool {
    v.abs() < BLIT_EPSILON
}

pub(crate) fn approx_one(v: f64) -> bool {
    (v - 1.0).abs() < BLIT_EPSILON
}

/// Floor to an integer pixel coordinate.
///
/// Expects a finite input; callers filter placements with `Placement::is_drawable` first.
pub(crate) fn floor_px(v: f64) -> i64 {
    v.floor() as i64
}

/// Ceil to an integer pixel coordinate. Same finite-input expectation as [`floor_px`].
pub(crate) fn ceil_px(v: f64) -> i64 {
    v.ceil() as i64
}

/// Intersect the half-open span `[start, end)` with `[0, limit)`.
pub(crate) fn clip_span(start: i64, end: i64, limit: i64) -> Option<(i64, i64)> {
    let lo = start.max(0);
    let hi = end.min(limit);
    (lo < hi).then_some((lo, hi))
}

/// Linear mix of one 8-bit channel: `src * t + dst * (1 - t)`, truncated.
pub(crate) fn mix_channel(src: u8, dst: u8, t: f64) -> u8 {
    (f64::from(src) * t + f64::from(dst) * (1.0 - t)) as u8
}
