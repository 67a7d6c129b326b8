pub mod blend;
pub mod box_blur;
pub mod denoise_dct;
pub mod domain_transform;
pub mod gaussian_blur;
pub mod lens_blur;
pub mod mean_curvature;
pub mod median_blur;
pub mod noise_reduction;

use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Build an (h, w) array row by row. Rows are computed in parallel once the
/// image is large enough to amortise the thread hand-off.
pub(crate) fn collect_rows<F>(h: usize, w: usize, row_fn: F) -> Array2<f32>
where
    F: Fn(usize) -> Vec<f32> + Sync,
{
    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(&row_fn).collect()
    } else {
        (0..h).map(&row_fn).collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}

/// Clamp-to-edge sample.
#[inline]
pub(crate) fn sample_clamped(data: &Array2<f32>, row: isize, col: isize) -> f32 {
    let (h, w) = data.dim();
    let r = row.clamp(0, h as isize - 1) as usize;
    let c = col.clamp(0, w as isize - 1) as usize;
    data[[r, c]]
}
