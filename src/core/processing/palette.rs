//! Fixed severity palette and the continuous inferno ramp used for delta renderings.
use crate::types::SeverityClass;

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
}

/// One color per severity code, approximating the USGS dNBR table.
pub const SEVERITY_PALETTE: [Rgb; 8] = [
    Rgb::BLACK,              // 0: background
    Rgb::new(122, 135, 55),  // 1: enhanced regrowth, high
    Rgb::new(172, 190, 77),  // 2: enhanced regrowth, low
    Rgb::new(0, 203, 0),     // 3: unburned
    Rgb::new(255, 255, 0),   // 4: low severity
    Rgb::new(245, 107, 0),   // 5: moderate-low severity
    Rgb::new(230, 55, 0),    // 6: moderate-high severity
    Rgb::new(122, 1, 119),   // 7: high severity
];

pub fn severity_color(class: SeverityClass) -> Rgb {
    SEVERITY_PALETTE[class.code() as usize]
}

#[derive(Debug, Clone, Copy)]
struct ColorStop {
    t: f64,
    color: Rgb,
}

impl ColorStop {
    const fn new(t: f64, r: u8, g: u8, b: u8) -> Self {
        Self {
            t,
            color: Rgb::new(r, g, b),
        }
    }
}

// Sampled from matplotlib's inferno at t = 0.0, 0.1, ..., 1.0
const INFERNO_STOPS: &[ColorStop] = &[
    ColorStop::new(0.0, 0, 0, 4),
    ColorStop::new(0.1, 22, 11, 57),
    ColorStop::new(0.2, 66, 10, 104),
    ColorStop::new(0.3, 106, 23, 110),
    ColorStop::new(0.4, 147, 38, 103),
    ColorStop::new(0.5, 188, 55, 84),
    ColorStop::new(0.6, 221, 81, 58),
    ColorStop::new(0.7, 243, 120, 25),
    ColorStop::new(0.8, 252, 165, 10),
    ColorStop::new(0.9, 246, 215, 70),
    ColorStop::new(1.0, 252, 255, 164),
];

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_color(c1: Rgb, c2: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp(c1.r as f64, c2.r as f64, t).round() as u8,
        lerp(c1.g as f64, c2.g as f64, t).round() as u8,
        lerp(c1.b as f64, c2.b as f64, t).round() as u8,
    )
}

fn multi_stop(stops: &[ColorStop], t: f64) -> Rgb {
    if t.is_nan() || t <= 0.0 {
        return stops[0].color;
    }
    if t >= 1.0 {
        return stops[stops.len() - 1].color;
    }
    for i in 1..stops.len() {
        if t <= stops[i].t {
            let ratio = (t - stops[i - 1].t) / (stops[i].t - stops[i - 1].t);
            return lerp_color(stops[i - 1].color, stops[i].color, ratio);
        }
    }
    stops[stops.len() - 1].color
}

/// Inferno ramp at normalized position `t`, clamped to [0, 1].
pub fn inferno(t: f64) -> Rgb {
    multi_stop(INFERNO_STOPS, t)
}
