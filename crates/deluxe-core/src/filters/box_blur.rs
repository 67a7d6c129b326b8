use ndarray::Array2;

use super::collect_rows;

/// Separable box blur with clamp-to-edge borders. Radius 0 is the identity,
/// as is any empty array.
pub fn box_blur_array(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    if radius == 0 || data.is_empty() {
        return data.clone();
    }
    let horizontal = running_mean_rows(data, radius);
    let transposed = horizontal.t().to_owned();
    running_mean_rows(&transposed, radius).t().to_owned()
}

/// Sliding-window mean along each row, O(w) per row regardless of radius.
fn running_mean_rows(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    let (h, w) = data.dim();
    let r = radius as isize;
    let norm = 1.0 / (2 * radius + 1) as f32;
    let last = w as isize - 1;

    collect_rows(h, w, |row| {
        let at = |col: isize| data[[row, col.clamp(0, last) as usize]];
        let mut sum: f32 = (-r..=r).map(at).sum();
        let mut out = Vec::with_capacity(w);
        for col in 0..w as isize {
            out.push(sum * norm);
            sum += at(col + r + 1) - at(col - r);
        }
        out
    })
}
