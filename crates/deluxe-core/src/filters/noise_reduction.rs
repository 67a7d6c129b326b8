use ndarray::Array2;

use super::{collect_rows, sample_clamped};

/// The eight neighbours as (dy, dx). Entry `i` and entry `7 - i` are point
/// symmetric, so the first four describe the four axes through the centre.
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const AXES: usize = 4;

#[inline]
fn metric(before: f32, center: f32, after: f32) -> f32 {
    let d = center * 2.0 - before - after;
    d * d
}

/// Anisotropic smoothing that never sharpens a ridge.
///
/// For every neighbour the midpoint between it and the centre is a candidate
/// value. A candidate is averaged in only if substituting it for the centre
/// does not raise the second-difference metric on any of the four axes.
pub fn noise_reduction_array(data: &Array2<f32>, iterations: usize) -> Array2<f32> {
    let mut current = data.clone();
    for _ in 0..iterations {
        current = reduction_step(&current);
    }
    current
}

fn reduction_step(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    collect_rows(h, w, |row| {
        let r = row as isize;
        (0..w as isize)
            .map(|c| {
                let at = |(dy, dx): (isize, isize)| sample_clamped(data, r + dy, c + dx);
                let center = at((0, 0));
                let mut sum = center;
                let mut count = 1.0f32;

                for &dir in &NEIGHBOURS {
                    let candidate = (at(dir) + center) * 0.5;
                    let keeps_shape = (0..AXES).all(|axis| {
                        let before = at(NEIGHBOURS[axis]);
                        let after = at(NEIGHBOURS[NEIGHBOURS.len() - axis - 1]);
                        metric(before, candidate, after) <= metric(before, center, after)
                    });
                    if keeps_shape {
                        sum += candidate;
                        count += 1.0;
                    }
                }
                sum / count
            })
            .collect()
    })
}
