//! Graph operations: the filters wrapped with declared properties and pads.

pub mod blur;
pub mod layer_mode;
pub mod smooth;

use std::fmt::Debug;

use crate::error::{DeluxeError, Result};
use crate::frame::Image;
use crate::property::{PropertySpec, PropertyValues, Value};

pub const INPUT_PAD: &str = "input";
pub const AUX_PAD: &str = "aux";
pub const OUTPUT_PAD: &str = "output";

/// Registry keys describing an operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperationInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub reference_hash: Option<&'static str>,
    pub menu_path: Option<&'static str>,
    pub menu_label: Option<&'static str>,
}

impl OperationInfo {
    pub const fn new(name: &'static str, title: &'static str, description: &'static str) -> Self {
        Self {
            name,
            title,
            description,
            reference_hash: None,
            menu_path: None,
            menu_label: None,
        }
    }
}

/// Images arriving on an operation's input pads for one evaluation.
#[derive(Debug, Default)]
pub struct PadInputs<'a> {
    pads: Vec<(&'static str, &'a Image)>,
}

impl<'a> PadInputs<'a> {
    pub fn new() -> Self {
        Self { pads: Vec::new() }
    }

    pub fn insert(&mut self, pad: &'static str, image: &'a Image) {
        self.pads.push((pad, image));
    }

    pub fn get(&self, pad: &str) -> Option<&'a Image> {
        self.pads
            .iter()
            .find(|(name, _)| *name == pad)
            .map(|(_, image)| *image)
    }

    /// The primary `input` pad. The evaluator never calls `process` without it.
    pub fn main(&self) -> Result<&'a Image> {
        self.get(INPUT_PAD).ok_or(DeluxeError::NoSource)
    }
}

/// A node's behaviour: declared properties plus a pure `process` step.
pub trait Operation: Send + Sync + Debug {
    fn info(&self) -> &'static OperationInfo;

    fn values(&self) -> &PropertyValues;

    fn values_mut(&mut self) -> &mut PropertyValues;

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image>;

    /// Input pads in evaluation order. `input` is always required.
    fn input_pads(&self) -> &'static [&'static str] {
        &[INPUT_PAD]
    }

    fn name(&self) -> &'static str {
        self.info().name
    }

    fn properties(&self) -> &'static [PropertySpec] {
        self.values().specs()
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.values().get(name)
    }

    /// Validate and store a parameter, returning the stored value.
    fn set(&mut self, name: &str, value: Value) -> Result<Value> {
        self.values_mut().set(name, value)
    }
}

/// Names accepted by [`create_operation`].
pub fn operation_names() -> [&'static str; 9] {
    [
        blur::MEDIAN_BLUR.name,
        smooth::DENOISE_DCT.name,
        blur::BOX_BLUR.name,
        smooth::MEAN_CURVATURE_BLUR.name,
        smooth::DOMAIN_TRANSFORM.name,
        smooth::NOISE_REDUCTION.name,
        blur::LENS_BLUR.name,
        blur::GAUSSIAN_BLUR.name,
        layer_mode::LAYER_MODE.name,
    ]
}

/// Instantiate an operation by registry name with default parameters.
pub fn create_operation(name: &str) -> Result<Box<dyn Operation>> {
    let op: Box<dyn Operation> = match name {
        n if n == blur::MEDIAN_BLUR.name => Box::new(blur::MedianBlur::default()),
        n if n == blur::BOX_BLUR.name => Box::new(blur::BoxBlur::default()),
        n if n == blur::LENS_BLUR.name => Box::new(blur::LensBlur::default()),
        n if n == blur::GAUSSIAN_BLUR.name => Box::new(blur::GaussianBlur::default()),
        n if n == smooth::DENOISE_DCT.name => Box::new(smooth::DenoiseDct::default()),
        n if n == smooth::MEAN_CURVATURE_BLUR.name => {
            Box::new(smooth::MeanCurvatureBlur::default())
        }
        n if n == smooth::DOMAIN_TRANSFORM.name => Box::new(smooth::DomainTransform::default()),
        n if n == smooth::NOISE_REDUCTION.name => Box::new(smooth::NoiseReduction::default()),
        n if n == layer_mode::LAYER_MODE.name => Box::new(layer_mode::LayerModeOp::default()),
        _ => return Err(DeluxeError::UnknownOperation(name.to_string())),
    };
    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_name_creates() {
        for name in operation_names() {
            let op = create_operation(name).unwrap();
            assert_eq!(op.name(), name);
        }
    }

    #[test]
    fn unknown_name_fails() {
        assert!(matches!(
            create_operation("deluxe:nope"),
            Err(DeluxeError::UnknownOperation(_))
        ));
    }
}
