/// Flat 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const RAY_WHITE: Self = Self::from_rgb(245, 245, 245);
    pub const BLUE: Self = Self::from_rgb(0, 121, 241);
    pub const YELLOW: Self = Self::from_rgb(253, 249, 0);
    pub const RED: Self = Self::from_rgb(230, 41, 55);
    pub const PURPLE: Self = Self::from_rgb(200, 122, 255);
    pub const GREEN: Self = Self::from_rgb(0, 228, 48);

    /// Colors picked from when generating random worlds.
    pub const PALETTE: [Self; 5] = [
        Self::BLUE,
        Self::YELLOW,
        Self::RED,
        Self::PURPLE,
        Self::GREEN,
    ];

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Darken (`factor < 0`) or lighten (`factor > 0`) the color.
    ///
    /// `factor` is clamped to `[-1, 1]`, so -1 always yields black and 1 white.
    pub fn brightness(self, factor: f32) -> Self {
        let factor = factor.clamp(-1.0, 1.0);
        let adjust = |c: u8| -> u8 {
            let c = c as f32;
            let v = if factor < 0.0 {
                c * (1.0 + factor)
            } else {
                (255.0 - c) * factor + c
            };
            v.clamp(0.0, 255.0) as u8
        };
        Self {
            r: adjust(self.r),
            g: adjust(self.g),
            b: adjust(self.b),
        }
    }

    /// Packed as `0x00RRGGBB` (BGRA8 in little-endian memory), alpha at 0.
    #[inline]
    pub fn to_u32(self) -> u32 {
        (self.b as u32) | ((self.g as u32) << 8) | ((self.r as u32) << 16)
    }

    /// Sum of the channels, used to compare how light two colors are.
    pub fn luma_sum(self) -> u32 {
        self.r as u32 + self.g as u32 + self.b as u32
    }
}
