//! Maps escape counts to colors.  Interior points are always black,
//! which is what draws the familiar silhouette of the set; escaping
//! points sweep the hue wheel five times between a count of zero and
//! the budget, at fixed saturation and full value, so neighboring
//! escape bands stay visually distinct even at deep zoom.

use num::clamp;

/// An 8-bit red, green, blue triple, in that order.  `Default` is
/// black, which is also what interior points render as.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

// How many times the hue wheel turns across the normalized count range.
const HUE_CYCLES: f64 = 5.0;
const SATURATION: f64 = 0.85;
const VALUE: f64 = 1.0;

/// Maps an escape count to a color under the given budget.  A count
/// at or past the budget is an interior point and comes back black;
/// anything lower lands somewhere on the five-cycle hue sweep.  Call
/// this with the budget in force when the count was produced — the
/// budget moves with the zoom level, and a stale one shifts every
/// band.
pub fn iterations_to_rgb(count: u32, budget: u32) -> Rgb {
    if count >= budget {
        return Rgb(0, 0, 0);
    }
    let t = (count as f64) / (budget as f64);
    let hue = (HUE_CYCLES * t) % 1.0 * 360.0;
    hsv_to_rgb(hue, SATURATION, VALUE)
}

// The standard six-sextant HSV to RGB conversion.  The hue arrives in
// degrees, already reduced to [0, 360).
fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    let chroma = value * saturation;
    let secondary = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let offset = value - chroma;
    let (r, g, b) = match (hue / 60.0) as u32 {
        0 => (chroma, secondary, 0.0),
        1 => (secondary, chroma, 0.0),
        2 => (0.0, chroma, secondary),
        3 => (0.0, secondary, chroma),
        4 => (secondary, 0.0, chroma),
        _ => (chroma, 0.0, secondary),
    };
    Rgb(
        channel(r + offset),
        channel(g + offset),
        channel(b + offset),
    )
}

fn channel(brightness: f64) -> u8 {
    clamp((brightness * 255.0).round(), 0.0, 255.0) as u8
}
