//! Danger-weighted cluster color ramp

use crate::CategoryCounts;
use serde::{Deserialize, Serialize};

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Hex form, e.g. "#ef4444"
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

const GREEN: Rgb = Rgb { r: 0x22, g: 0xc5, b: 0x5e };
const YELLOW: Rgb = Rgb { r: 0xfa, g: 0xcc, b: 0x15 };
const RED: Rgb = Rgb { r: 0xef, g: 0x44, b: 0x44 };

fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let channel = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    Rgb {
        r: channel(a.r, b.r),
        g: channel(a.g, b.g),
        b: channel(a.b, b.b),
    }
}

/// Color for a cluster circle from its category counts
///
/// Intensity is a danger/caution-weighted ratio interpolated across a
/// three-stop green/yellow/red ramp. Pure and deterministic.
pub fn cluster_color(counts: CategoryCounts) -> Rgb {
    let total = counts.total();
    if total == 0 {
        return GREEN;
    }

    let danger_ratio = counts.danger as f64 / total as f64;
    let caution_ratio = counts.caution as f64 / total as f64;
    let intensity = ((danger_ratio * 6.0 + caution_ratio * 3.0) / 3.0).min(1.0);

    if intensity <= 0.33 {
        lerp(GREEN, YELLOW, intensity / 0.33)
    } else {
        lerp(YELLOW, RED, (intensity - 0.33) / 0.67)
    }
}
