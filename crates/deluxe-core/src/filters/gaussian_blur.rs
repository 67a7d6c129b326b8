use ndarray::Array2;

use crate::consts::GAUSSIAN_KERNEL_SIGMAS;

use super::collect_rows;

/// Apply an axis-aligned Gaussian blur with independent deviations.
///
/// A deviation of zero leaves that axis untouched.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma_x: f32, sigma_y: f32) -> Array2<f32> {
    let row_pass = match make_gaussian_kernel(sigma_x) {
        Some(kernel) => convolve_rows(data, &kernel),
        None => data.clone(),
    };
    match make_gaussian_kernel(sigma_y) {
        Some(kernel) => convolve_cols(&row_pass, &kernel),
        None => row_pass,
    }
}

fn make_gaussian_kernel(sigma: f32) -> Option<Vec<f32>> {
    if sigma <= 0.0 {
        return None;
    }
    let radius = (sigma * GAUSSIAN_KERNEL_SIGMAS).ceil() as usize;
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    Some(kernel)
}

fn convolve_rows(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    collect_rows(h, w, |row| {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_col = (col as isize + ki as isize - radius as isize)
                        .clamp(0, w as isize - 1) as usize;
                    sum += data[[row, src_col]] * kv;
                }
                sum
            })
            .collect()
    })
}

fn convolve_cols(data: &Array2<f32>, kernel: &[f32]) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    collect_rows(h, w, |row| {
        (0..w)
            .map(|col| {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let src_row = (row as isize + ki as isize - radius as isize)
                        .clamp(0, h as isize - 1) as usize;
                    sum += data[[src_row, col]] * kv;
                }
                sum
            })
            .collect()
    })
}
