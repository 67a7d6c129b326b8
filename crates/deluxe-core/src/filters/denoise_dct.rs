use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use ndarray::{s, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::DCT_THRESHOLD_SIGMAS;
use crate::error::DeluxeError;

/// Side length of the DCT patches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchSize {
    #[default]
    #[serde(rename = "size8x8")]
    Size8,
    #[serde(rename = "size16x16")]
    Size16,
}

impl PatchSize {
    pub const ALL: [PatchSize; 2] = [Self::Size8, Self::Size16];

    pub fn side(self) -> usize {
        match self {
            Self::Size8 => 8,
            Self::Size16 => 16,
        }
    }

    pub fn nick(self) -> &'static str {
        match self {
            Self::Size8 => "size8x8",
            Self::Size16 => "size16x16",
        }
    }
}

impl fmt::Display for PatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.side())
    }
}

impl FromStr for PatchSize {
    type Err = DeluxeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.nick() == s)
            .ok_or_else(|| DeluxeError::UnknownEnumValue {
                name: "patch-size".to_string(),
                value: s.to_string(),
            })
    }
}

/// Orthonormal DCT-II basis; row k holds frequency k.
fn dct_basis(n: usize) -> Array2<f32> {
    Array2::from_shape_fn((n, n), |(k, i)| {
        let scale = if k == 0 {
            (1.0 / n as f32).sqrt()
        } else {
            (2.0 / n as f32).sqrt()
        };
        scale * (PI * (2 * i + 1) as f32 * k as f32 / (2 * n) as f32).cos()
    })
}

/// Sliding-window DCT denoising.
///
/// Every fully-contained patch is transformed, AC coefficients below
/// `3 * sigma / 255` are zeroed, and the inverse transforms of overlapping
/// patches are averaged. `sigma` is on the 8-bit scale.
pub fn denoise_dct_array(data: &Array2<f32>, sigma: f32, patch: PatchSize) -> Array2<f32> {
    let n = patch.side();
    let (h, w) = data.dim();
    if h < n || w < n || sigma <= 0.0 {
        return data.clone();
    }

    let threshold = DCT_THRESHOLD_SIGMAS * sigma / 255.0;
    let basis = dct_basis(n);
    let basis_t = basis.t().to_owned();

    let sum = (0..=h - n)
        .into_par_iter()
        .fold(
            || Array2::<f32>::zeros((h, w)),
            |mut acc, row| {
                for col in 0..=w - n {
                    let window = data.slice(s![row..row + n, col..col + n]);
                    let mut coeffs = basis.dot(&window).dot(&basis_t);
                    for ((k, l), c) in coeffs.indexed_iter_mut() {
                        if (k, l) != (0, 0) && c.abs() < threshold {
                            *c = 0.0;
                        }
                    }
                    let restored = basis_t.dot(&coeffs).dot(&basis);
                    let mut target = acc.slice_mut(s![row..row + n, col..col + n]);
                    target += &restored;
                }
                acc
            },
        )
        .reduce(|| Array2::<f32>::zeros((h, w)), |a, b| a + b);

    let row_cover = coverage(h, n);
    let col_cover = coverage(w, n);
    Array2::from_shape_fn((h, w), |(r, c)| sum[[r, c]] / (row_cover[r] * col_cover[c]) as f32)
}

/// How many patch origins along an axis of length `len` cover each index.
fn coverage(len: usize, n: usize) -> Vec<usize> {
    let last_origin = len - n;
    (0..len)
        .map(|i| {
            let first = i.saturating_sub(n - 1);
            let last = i.min(last_origin);
            last - first + 1
        })
        .collect()
}
