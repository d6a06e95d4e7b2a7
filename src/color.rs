// Simple color struct, created from an unsigned 32 representing RRGGBB00
// Alpha is supplied per draw call since links fade with distance

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    pub fn from_u32(num: u32) -> Color {
        let r = (num >> 24) as u8;
        let g = (num >> 16) as u8;
        let b = (num >> 8) as u8;

        Color { r, g, b }
    }

    // CSS string for fillStyle / strokeStyle, alpha is clamped to [0, 1]
    pub fn to_css(&self, alpha: f64) -> String {
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.max(0.0).min(1.0)
        };
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}
