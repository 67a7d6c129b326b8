use ndarray::Array2;

use super::collect_rows;

/// Smallest range sigma, reached at full edge preservation.
const MIN_RANGE_SIGMA: f32 = 1e-3;

/// Edge-aware smoothing by the recursive-filter domain transform
/// (Gastal & Oliveira, 2011).
///
/// `spatial_factor` is the spatial sigma in pixels. `edge_preservation` in
/// [0, 1] maps to a range sigma of `1 - edge_preservation`: the closer to one,
/// the more strongly edges stop the smoothing. All channels share one domain
/// transform so edges are respected consistently across colours.
pub fn domain_transform(
    channels: &[&Array2<f32>],
    iterations: usize,
    spatial_factor: f32,
    edge_preservation: f32,
) -> Vec<Array2<f32>> {
    let mut current: Vec<Array2<f32>> = channels.iter().map(|c| (*c).clone()).collect();
    if channels.is_empty() || iterations == 0 || spatial_factor <= 0.0 {
        return current;
    }

    let sigma_r = (1.0 - edge_preservation).max(MIN_RANGE_SIGMA);
    let ratio = spatial_factor / sigma_r;

    let dh = horizontal_derivative(channels, ratio);
    let transposed: Vec<Array2<f32>> = channels.iter().map(|c| c.t().to_owned()).collect();
    let transposed_refs: Vec<&Array2<f32>> = transposed.iter().collect();
    let dv = horizontal_derivative(&transposed_refs, ratio);

    let n = iterations as i32;
    let norm = (4.0f32.powi(n) - 1.0).sqrt();
    for i in 0..n {
        let sigma_i = spatial_factor * 3.0f32.sqrt() * 2.0f32.powi(n - i - 1) / norm;
        let a = (-(2.0f32.sqrt()) / sigma_i).exp();

        current = current
            .iter()
            .map(|ch| {
                let horizontal = recursive_rows(ch, &dh, a);
                recursive_rows(&horizontal.t().to_owned(), &dv, a)
                    .t()
                    .to_owned()
            })
            .collect();
    }
    current
}

/// `1 + ratio * sum_c |I_c(x) - I_c(x-1)|` along rows; column 0 uses 1.
fn horizontal_derivative(channels: &[&Array2<f32>], ratio: f32) -> Array2<f32> {
    let (h, w) = channels[0].dim();
    collect_rows(h, w, |row| {
        (0..w)
            .map(|col| {
                if col == 0 {
                    return 1.0;
                }
                let diff: f32 = channels
                    .iter()
                    .map(|ch| (ch[[row, col]] - ch[[row, col - 1]]).abs())
                    .sum();
                1.0 + ratio * diff
            })
            .collect()
    })
}

/// One left-to-right then right-to-left recursive pass per row.
fn recursive_rows(data: &Array2<f32>, derivative: &Array2<f32>, a: f32) -> Array2<f32> {
    let (h, w) = data.dim();
    collect_rows(h, w, |row| {
        let mut out: Vec<f32> = data.row(row).to_vec();
        let weight = |col: usize| a.powf(derivative[[row, col]]);
        for col in 1..w {
            let v = weight(col);
            out[col] += v * (out[col - 1] - out[col]);
        }
        for col in (0..w.saturating_sub(1)).rev() {
            let v = weight(col + 1);
            out[col] += v * (out[col + 1] - out[col]);
        }
        out
    })
}
