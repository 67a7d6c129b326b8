//! Layer-mode blending of two images.
//!
//! `input` is the backdrop, `aux` the layer on top. Pixel values are taken to
//! be perceptually (sRGB) encoded, which is how they come out of image files.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use crate::consts::GRAIN_PIVOT;
use crate::error::DeluxeError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerMode {
    #[default]
    Normal,
    Subtract,
    Difference,
    GrainExtract,
    GrainMerge,
}

impl LayerMode {
    pub const ALL: [LayerMode; 5] = [
        Self::Normal,
        Self::Subtract,
        Self::Difference,
        Self::GrainExtract,
        Self::GrainMerge,
    ];

    pub fn nick(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Subtract => "subtract",
            Self::Difference => "difference",
            Self::GrainExtract => "grain-extract",
            Self::GrainMerge => "grain-merge",
        }
    }

    #[inline]
    pub fn apply(self, input: f32, aux: f32) -> f32 {
        match self {
            Self::Normal => aux,
            Self::Subtract => input - aux,
            Self::Difference => (input - aux).abs(),
            Self::GrainExtract => input - aux + GRAIN_PIVOT,
            Self::GrainMerge => input + aux - GRAIN_PIVOT,
        }
    }
}

impl fmt::Display for LayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Subtract => write!(f, "Subtract"),
            Self::Difference => write!(f, "Difference"),
            Self::GrainExtract => write!(f, "Grain Extract"),
            Self::GrainMerge => write!(f, "Grain Merge"),
        }
    }
}

impl FromStr for LayerMode {
    type Err = DeluxeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.nick() == s)
            .ok_or_else(|| DeluxeError::UnknownEnumValue {
                name: "layer-mode".to_string(),
                value: s.to_string(),
            })
    }
}

/// Color space the blend formula is evaluated in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendSpace {
    RgbLinear,
    #[default]
    RgbPerceptual,
}

impl BlendSpace {
    pub const ALL: [BlendSpace; 2] = [Self::RgbLinear, Self::RgbPerceptual];

    pub fn nick(self) -> &'static str {
        match self {
            Self::RgbLinear => "rgb-linear",
            Self::RgbPerceptual => "rgb-perceptual",
        }
    }
}

impl fmt::Display for BlendSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RgbLinear => write!(f, "RGB (linear)"),
            Self::RgbPerceptual => write!(f, "RGB (perceptual)"),
        }
    }
}

impl FromStr for BlendSpace {
    type Err = DeluxeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.nick() == s)
            .ok_or_else(|| DeluxeError::UnknownEnumValue {
                name: "blend-space".to_string(),
                value: s.to_string(),
            })
    }
}

/// sRGB decode, extended symmetrically to negative values.
pub fn srgb_to_linear(v: f32) -> f32 {
    let a = v.abs();
    let l = if a <= 0.04045 {
        a / 12.92
    } else {
        ((a + 0.055) / 1.055).powf(2.4)
    };
    l.copysign(v)
}

/// sRGB encode, extended symmetrically to negative values.
pub fn linear_to_srgb(v: f32) -> f32 {
    let a = v.abs();
    let e = if a <= 0.003_130_8 {
        a * 12.92
    } else {
        1.055 * a.powf(1.0 / 2.4) - 0.055
    };
    e.copysign(v)
}

/// Blend one channel. Results are not clamped; grain modes legitimately
/// leave [0, 1] and clamping is left to whoever writes the image out.
pub fn blend_array(
    input: &Array2<f32>,
    aux: &Array2<f32>,
    mode: LayerMode,
    space: BlendSpace,
    opacity: f32,
) -> Array2<f32> {
    Zip::from(input).and(aux).map_collect(|&i, &a| {
        let blended = match space {
            BlendSpace::RgbPerceptual => mode.apply(i, a),
            BlendSpace::RgbLinear => {
                linear_to_srgb(mode.apply(srgb_to_linear(i), srgb_to_linear(a)))
            }
        };
        i + (blended - i) * opacity
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grain_extract_then_merge_round_trips() {
        let input = 0.7;
        let blurred = 0.4;
        let high_pass = LayerMode::GrainExtract.apply(input, blurred);
        assert!((high_pass - 0.8).abs() < 1e-6);
        let back = LayerMode::GrainMerge.apply(blurred, high_pass);
        assert!((back - input).abs() < 1e-6);
    }

    #[test]
    fn srgb_transfer_inverts() {
        for v in [0.0f32, 0.02, 0.2, 0.5, 0.9, 1.0] {
            assert!((linear_to_srgb(srgb_to_linear(v)) - v).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_opacity_keeps_backdrop() {
        let input = Array2::from_elem((2, 2), 0.3f32);
        let aux = Array2::from_elem((2, 2), 0.9f32);
        let out = blend_array(&input, &aux, LayerMode::Normal, BlendSpace::RgbPerceptual, 0.0);
        assert_eq!(out, input);
    }
}
