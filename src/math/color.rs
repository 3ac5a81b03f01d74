/// Convert a packed 0xRRGGBB colour to normalized sRGB components
pub const fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Parse "#rrggbb" (leading '#' optional)
pub fn parse_hex(text: &str) -> Option<[f32; 3]> {
    let digits = text.strip_prefix('#').unwrap_or(text);
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(hex_to_rgb)
}

/// sRGB transfer function -> linear, per channel
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn rgb_to_linear(rgb: [f32; 3]) -> [f32; 3] {
    [
        srgb_to_linear(rgb[0]),
        srgb_to_linear(rgb[1]),
        srgb_to_linear(rgb[2]),
    ]
}

/// Linear colour gradient over [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<(f32, [f32; 3])>,
}

impl Gradient {
    /// Gradient with explicit (offset, colour) stops, sorted by offset
    pub fn from_stops(stops: &[(f32, [f32; 3])]) -> Self {
        let mut stops = stops.to_vec();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    /// Evenly spaced stops from "#rrggbb" strings; unparsable entries are skipped
    pub fn evenly(colors: &[&str]) -> Self {
        let parsed: Vec<[f32; 3]> = colors.iter().filter_map(|c| parse_hex(c)).collect();
        let last = parsed.len().saturating_sub(1).max(1) as f32;
        let stops: Vec<(f32, [f32; 3])> = parsed
            .into_iter()
            .enumerate()
            .map(|(i, c)| (i as f32 / last, c))
            .collect();
        Self { stops }
    }

    pub fn stops(&self) -> &[(f32, [f32; 3])] {
        &self.stops
    }

    /// Colour at offset `t` (clamped to the first/last stop)
    pub fn sample(&self, t: f32) -> [f32; 3] {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return [1.0, 1.0, 1.0],
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.0 && t <= b.0 {
                let span = (b.0 - a.0).max(f32::EPSILON);
                let f = (t - a.0) / span;
                return [
                    a.1[0] + (b.1[0] - a.1[0]) * f,
                    a.1[1] + (b.1[1] - a.1[1]) * f,
                    a.1[2] + (b.1[2] - a.1[2]) * f,
                ];
            }
        }
        last.1
    }

    /// Rasterize to an RGBA8 strip, texel 0 = offset 0
    pub fn to_rgba8(&self, width: u32) -> Vec<u8> {
        let width = width.max(2);
        let mut pixels = Vec::with_capacity(width as usize * 4);
        for x in 0..width {
            let c = self.sample(x as f32 / (width - 1) as f32);
            pixels.extend_from_slice(&[
                (c[0] * 255.0).round() as u8,
                (c[1] * 255.0).round() as u8,
                (c[2] * 255.0).round() as u8,
                255,
            ]);
        }
        pixels
    }
}
