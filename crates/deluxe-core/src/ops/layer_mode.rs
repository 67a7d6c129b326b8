use tracing::debug;

use crate::error::Result;
use crate::filters::blend::{blend_array, BlendSpace, LayerMode};
use crate::frame::Image;
use crate::property::{EnumValue, PropertySpec, PropertyValues};

use super::{Operation, OperationInfo, PadInputs, AUX_PAD, INPUT_PAD};

pub const LAYER_MODE: OperationInfo = OperationInfo::new(
    "deluxe:layer-mode",
    "Layer Mode",
    "Composite the aux pad over the input pad using a layer blend mode.",
);

const LAYER_MODES: &[EnumValue] = &[
    EnumValue::new("normal", "Normal"),
    EnumValue::new("subtract", "Subtract"),
    EnumValue::new("difference", "Difference"),
    EnumValue::new("grain-extract", "Grain Extract"),
    EnumValue::new("grain-merge", "Grain Merge"),
];

const BLEND_SPACES: &[EnumValue] = &[
    EnumValue::new("rgb-linear", "RGB (linear)"),
    EnumValue::new("rgb-perceptual", "RGB (perceptual)"),
];

const LAYER_MODE_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::enumeration("layer-mode", "Layer mode", "normal", LAYER_MODES),
    PropertySpec::enumeration("blend-space", "Blend space", "rgb-perceptual", BLEND_SPACES),
    PropertySpec::double("opacity", "Opacity", 1.0, 0.0, 1.0),
];

const LAYER_MODE_PADS: &[&str] = &[INPUT_PAD, AUX_PAD];

/// Blend node. Without anything on `aux` the input passes through untouched.
#[derive(Clone, Debug)]
pub struct LayerModeOp {
    values: PropertyValues,
}

impl Default for LayerModeOp {
    fn default() -> Self {
        Self {
            values: PropertyValues::new(LAYER_MODE.name, LAYER_MODE_PROPERTIES),
        }
    }
}

impl Operation for LayerModeOp {
    fn info(&self) -> &'static OperationInfo {
        &LAYER_MODE
    }

    fn values(&self) -> &PropertyValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut PropertyValues {
        &mut self.values
    }

    fn input_pads(&self) -> &'static [&'static str] {
        LAYER_MODE_PADS
    }

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image> {
        let input = inputs.main()?;
        let Some(aux) = inputs.get(AUX_PAD) else {
            return Ok(input.clone());
        };
        let mode: LayerMode = self.values.enum_value("layer-mode")?;
        let space: BlendSpace = self.values.enum_value("blend-space")?;
        let opacity = self.values.double("opacity")? as f32;
        debug!(%mode, %space, opacity, "layer blend");
        input.zip_channels(aux, |i, a| blend_array(i, a, mode, space, opacity))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;
    use crate::frame::Frame;

    fn flat(value: f32) -> Image {
        Image::Mono(Frame::new(Array2::from_elem((4, 4), value), 8))
    }

    #[test]
    fn missing_aux_passes_input_through() {
        let op = LayerModeOp::default();
        let input = flat(0.25);
        let mut pads = PadInputs::new();
        pads.insert(INPUT_PAD, &input);
        let out = op.process(&pads).unwrap();
        assert_eq!(out.channels()[0], input.channels()[0]);
    }

    #[test]
    fn grain_extract_of_equal_images_is_mid_grey() {
        let mut op = LayerModeOp::default();
        op.set("layer-mode", "grain-extract".into()).unwrap();
        let input = flat(0.7);
        let aux = flat(0.7);
        let mut pads = PadInputs::new();
        pads.insert(INPUT_PAD, &input);
        pads.insert(AUX_PAD, &aux);
        let out = op.process(&pads).unwrap();
        assert!(out.channels()[0].iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }
}
