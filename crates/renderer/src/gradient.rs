//! Colour ramps and value-to-pixel mapping.

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }
}

/// Linear color interpolation, `t` clamped to `[0, 1]`.
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    let mix = |a: u8, b: u8| ((a as f32 * t_inv) + (b as f32 * t)).round() as u8;
    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// A piecewise-linear colour ramp over normalized values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    /// Stops sorted by position
    stops: Vec<(f32, Color)>,
}

impl ColorRamp {
    /// Build a ramp from `(position, colour)` stops.
    ///
    /// Positions are sorted; an empty list yields a single grey stop.
    pub fn new(mut stops: Vec<(f32, Color)>) -> Self {
        if stops.is_empty() {
            stops.push((0.0, Color::opaque(128, 128, 128)));
        }
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    /// Perceptually ordered default (dark purple, blue, green, yellow).
    pub fn viridis() -> Self {
        Self::new(vec![
            (0.0, Color::opaque(68, 1, 84)),
            (0.25, Color::opaque(59, 82, 139)),
            (0.5, Color::opaque(33, 145, 140)),
            (0.75, Color::opaque(94, 201, 98)),
            (1.0, Color::opaque(253, 231, 37)),
        ])
    }

    /// Air temperature: purple through cyan and yellow to dark red.
    pub fn temperature() -> Self {
        Self::new(vec![
            (0.0, Color::opaque(25, 0, 76)),
            (0.2, Color::opaque(0, 0, 255)),
            (0.4, Color::opaque(0, 255, 255)),
            (0.55, Color::opaque(0, 255, 0)),
            (0.7, Color::opaque(255, 255, 0)),
            (0.85, Color::opaque(255, 0, 0)),
            (1.0, Color::opaque(139, 0, 0)),
        ])
    }

    /// Precipitation: white through blue to purple.
    pub fn precipitation() -> Self {
        Self::new(vec![
            (0.0, Color::opaque(247, 251, 255)),
            (0.3, Color::opaque(107, 174, 214)),
            (0.6, Color::opaque(8, 81, 156)),
            (1.0, Color::opaque(84, 39, 143)),
        ])
    }

    /// Pick a ramp for a forcing variable by name.
    pub fn for_field(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "T2D" => Self::temperature(),
            "RAINRATE" | "APCP" => Self::precipitation(),
            _ => Self::viridis(),
        }
    }

    /// Colour at normalized position `t`.
    pub fn color_at(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let first = self.stops[0];
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let span = p1 - p0;
                let local = if span > 0.0 { (t - p0) / span } else { 1.0 };
                return interpolate_color(c0, c1, local);
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::viridis()
    }
}

/// Minimum and maximum of the finite values, if any.
pub fn finite_range(data: &[f64]) -> Option<(f64, f64)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Render grid data as a gradient heatmap
///
/// # Arguments
/// - `data`: 2D grid of values (row-major order), NaN drawn transparent
/// - `width`: Number of columns
/// - `height`: Number of rows
/// - `min_val`, `max_val`: Value range mapped onto the ramp
/// - `ramp`: Colour ramp
///
/// # Returns
/// RGBA pixel data (4 bytes per pixel)
pub fn render_grid(
    data: &[f64],
    width: usize,
    height: usize,
    min_val: f64,
    max_val: f64,
    ramp: &ColorRamp,
) -> Vec<u8> {
    let mut pixels = vec![0u8; width * height * 4];

    let range = max_val - min_val;
    let range = if range.abs() < f64::EPSILON { 1.0 } else { range };

    for (idx, value) in data.iter().take(width * height).enumerate() {
        let color = if value.is_finite() {
            ramp.color_at(((value - min_val) / range) as f32)
        } else {
            Color::transparent()
        };
        let p = idx * 4;
        pixels[p..p + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_midpoint() {
        let c = interpolate_color(Color::opaque(0, 0, 0), Color::opaque(255, 255, 255), 0.5);
        assert_eq!(c, Color::opaque(128, 128, 128));
    }

    #[test]
    fn test_ramp_endpoints() {
        let ramp = ColorRamp::viridis();
        assert_eq!(ramp.color_at(0.0), Color::opaque(68, 1, 84));
        assert_eq!(ramp.color_at(1.0), Color::opaque(253, 231, 37));
        assert_eq!(ramp.color_at(-3.0), ramp.color_at(0.0));
        assert_eq!(ramp.color_at(7.0), ramp.color_at(1.0));
    }

    #[test]
    fn test_finite_range_skips_nan() {
        assert_eq!(finite_range(&[f64::NAN, 2.0, -1.0, f64::INFINITY]), Some((-1.0, 2.0)));
        assert_eq!(finite_range(&[f64::NAN]), None);
    }
}
