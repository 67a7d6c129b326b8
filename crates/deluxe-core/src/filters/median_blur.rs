use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::DeluxeError;

use super::{collect_rows, sample_clamped};

/// Shape of the median window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Neighborhood {
    Square,
    #[default]
    Circle,
    Diamond,
}

impl Neighborhood {
    pub const ALL: [Neighborhood; 3] = [Self::Square, Self::Circle, Self::Diamond];

    pub fn nick(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Circle => "circle",
            Self::Diamond => "diamond",
        }
    }

    fn contains(self, dx: isize, dy: isize, radius: isize) -> bool {
        match self {
            Self::Square => true,
            Self::Circle => dx * dx + dy * dy <= radius * radius,
            Self::Diamond => dx.abs() + dy.abs() <= radius,
        }
    }

    /// Offsets (dy, dx) covered by this shape at `radius`.
    pub fn offsets(self, radius: usize) -> Vec<(isize, isize)> {
        let r = radius as isize;
        let mut offsets = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if self.contains(dx, dy, r) {
                    offsets.push((dy, dx));
                }
            }
        }
        offsets
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Square => write!(f, "Square"),
            Self::Circle => write!(f, "Circle"),
            Self::Diamond => write!(f, "Diamond"),
        }
    }
}

impl FromStr for Neighborhood {
    type Err = DeluxeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.nick() == s)
            .ok_or_else(|| DeluxeError::UnknownEnumValue {
                name: "neighborhood".to_string(),
                value: s.to_string(),
            })
    }
}

/// Percentile filter over a shaped neighbourhood with clamp-to-edge borders.
///
/// `percentile` is in [0, 100]; 50 is the median. Radius 0 is the identity.
pub fn median_blur_array(
    data: &Array2<f32>,
    radius: usize,
    neighborhood: Neighborhood,
    percentile: f64,
) -> Array2<f32> {
    if radius == 0 {
        return data.clone();
    }
    let (h, w) = data.dim();
    let offsets = neighborhood.offsets(radius);
    let n = offsets.len();
    let rank = ((percentile.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64).round() as usize;

    collect_rows(h, w, |row| {
        let mut window = vec![0.0f32; n];
        (0..w)
            .map(|col| {
                for (slot, &(dy, dx)) in window.iter_mut().zip(&offsets) {
                    *slot = sample_clamped(data, row as isize + dy, col as isize + dx);
                }
                let (_, value, _) = window.select_nth_unstable_by(rank, f32::total_cmp);
                *value
            })
            .collect()
    })
}
