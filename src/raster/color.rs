use crate::foundation::math::mix_channel;

/// One of the four 8-bit fields of a packed [`Color`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Bits 24..=31.
    Alpha,
    /// Bits 16..=23.
    Red,
    /// Bits 8..=15.
    Green,
    /// Bits 0..=7.
    Blue,
}

impl Channel {
    const fn shift(self) -> u32 {
        match self {
            Self::Alpha => 24,
            Self::Red => 16,
            Self::Green => 8,
            Self::Blue => 0,
        }
    }
}

/// Straight (non-premultiplied) packed ARGB color.
///
/// Alpha 255 is fully opaque, alpha 0 fully transparent. The all-zero value doubles as the
/// "nothing here" color returned for out-of-bounds reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);

    /// Pack four channels. Each input is masked to its low 8 bits, so out-of-range values
    /// are truncated rather than rejected.
    pub const fn pack(a: i32, r: i32, g: i32, b: i32) -> Self {
        let a = (a as u32 & 0xFF) << 24;
        let r = (r as u32 & 0xFF) << 16;
        let g = (g as u32 & 0xFF) << 8;
        let b = b as u32 & 0xFF;
        Self(a | r | g | b)
    }

    /// Build from the raw signed value carried on the wire.
    pub const fn from_bits_i32(bits: i32) -> Self {
        Self(bits as u32)
    }

    /// Raw signed value as carried on the wire.
    pub const fn to_bits_i32(self) -> i32 {
        self.0 as i32
    }

    /// Extract a single channel.
    pub const fn channel(self, which: Channel) -> u8 {
        ((self.0 >> which.shift()) & 0xFF) as u8
    }

    /// Alpha channel.
    pub const fn alpha(self) -> u8 {
        self.channel(Channel::Alpha)
    }

    /// Red channel.
    pub const fn red(self) -> u8 {
        self.channel(Channel::Red)
    }

    /// Green channel.
    pub const fn green(self) -> u8 {
        self.channel(Channel::Green)
    }

    /// Blue channel.
    pub const fn blue(self) -> u8 {
        self.channel(Channel::Blue)
    }

    /// True when alpha is 255.
    pub const fn is_opaque(self) -> bool {
        self.alpha() == 0xFF
    }

    /// Convert to straight RGBA8 bytes.
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// Convert from straight RGBA8 bytes.
    pub const fn from_rgba8(px: [u8; 4]) -> Self {
        Self::pack(px[3] as i32, px[0] as i32, px[1] as i32, px[2] as i32)
    }
}

impl From<u32> for Color {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> Self {
        c.0
    }
}

/// Composite `src` over `dst`.
///
/// An opaque source replaces the destination exactly. Otherwise each color channel is
/// mixed by `t = alpha(src) / 255` and truncated, and the alphas are summed and capped at
/// 255 instead of using the Porter-Duff `src_a + dst_a * (1 - src_a)` law.
pub fn blend(dst: Color, src: Color) -> Color {
    let src_a = src.alpha();
    if src_a == 0xFF {
        return src;
    }

    let t = f64::from(src_a) / 255.0;
    let a = (u16::from(dst.alpha()) + u16::from(src_a)).min(0xFF);
    let r = mix_channel(src.red(), dst.red(), t);
    let g = mix_channel(src.green(), dst.green(), t);
    let b = mix_channel(src.blue(), dst.blue(), t);

    Color::pack(i32::from(a), i32::from(r), i32::from(g), i32::from(b))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/color.rs"]
mod tests;
