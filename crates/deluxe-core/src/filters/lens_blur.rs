use ndarray::Array2;

use crate::consts::EPSILON;

use super::{collect_rows, sample_clamped};

/// Highlight handling for [`lens_blur`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Highlights {
    /// Extra weight given to bright pixels, 0 disables the boost.
    pub factor: f32,
    /// Luminance where the boost starts ramping in.
    pub threshold_min: f32,
    /// Luminance where the boost is at full strength.
    pub threshold_max: f32,
    /// Clamp the result to [0, 1].
    pub clip: bool,
}

impl Default for Highlights {
    fn default() -> Self {
        Self {
            factor: 0.0,
            threshold_min: 0.9,
            threshold_max: 1.0,
            clip: true,
        }
    }
}

/// Disc offsets for a (possibly fractional) radius.
fn disc_offsets(radius: f32) -> Vec<(isize, isize)> {
    let reach = radius.ceil() as isize;
    let r2 = radius * radius;
    let mut offsets = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if (dy * dy + dx * dx) as f32 <= r2 {
                offsets.push((dy, dx));
            }
        }
    }
    offsets
}

/// Simulated out-of-focus blur with a flat circular aperture.
///
/// Each output pixel is a weighted mean over a disc of `radius` pixels. Pixels
/// whose luminance lies above `threshold_min` gain up to `1 + factor`
/// weight, so bright points bloom into bokeh discs. `luminance` drives the
/// weighting for every channel so colours bloom together.
pub fn lens_blur(
    channels: &[&Array2<f32>],
    luminance: &Array2<f32>,
    radius: f32,
    highlights: Highlights,
) -> Vec<Array2<f32>> {
    if radius < 0.5 || channels.is_empty() {
        return channels.iter().map(|c| (*c).clone()).collect();
    }

    let offsets = disc_offsets(radius);
    let span = (highlights.threshold_max - highlights.threshold_min).max(EPSILON);
    let weights = luminance.mapv(|l| {
        let t = ((l - highlights.threshold_min) / span).clamp(0.0, 1.0);
        1.0 + highlights.factor * t
    });

    channels
        .iter()
        .map(|ch| {
            let (h, w) = ch.dim();
            collect_rows(h, w, |row| {
                (0..w as isize)
                    .map(|col| {
                        let mut sum = 0.0f32;
                        let mut total = 0.0f32;
                        for &(dy, dx) in &offsets {
                            let (y, x) = (row as isize + dy, col + dx);
                            let weight = sample_clamped(&weights, y, x);
                            sum += sample_clamped(ch, y, x) * weight;
                            total += weight;
                        }
                        let v = sum / total;
                        if highlights.clip {
                            v.clamp(0.0, 1.0)
                        } else {
                            v
                        }
                    })
                    .collect()
            })
        })
        .collect()
}
