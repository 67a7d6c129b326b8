use tracing::debug;

use crate::error::Result;
use crate::filters::denoise_dct::{denoise_dct_array, PatchSize};
use crate::filters::domain_transform::domain_transform;
use crate::filters::mean_curvature::mean_curvature_blur_array;
use crate::filters::noise_reduction::noise_reduction_array;
use crate::frame::Image;
use crate::property::{EnumValue, PropertySpec, PropertyValues};

use super::{Operation, OperationInfo, PadInputs};

// ---------------------------------------------------------------------------
// DCT denoise
// ---------------------------------------------------------------------------

pub const DENOISE_DCT: OperationInfo = OperationInfo::new(
    "deluxe:denoise-dct",
    "Denoise DCT",
    "Denoising algorithm using a per-patch DCT thresholding",
);

const PATCH_SIZES: &[EnumValue] = &[
    EnumValue::new("size8x8", "8x8"),
    EnumValue::new("size16x16", "16x16"),
];

const DENOISE_DCT_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::enumeration("patch-size", "Patch size", "size8x8", PATCH_SIZES)
        .describe("Size of patches used to denoise"),
    PropertySpec::double("sigma", "Strength", 5.0, 1.0, 100.0)
        .describe("Noise standard deviation")
        .ui_range(1.0, 20.0),
];

#[derive(Clone, Debug)]
pub struct DenoiseDct {
    values: PropertyValues,
}

impl Default for DenoiseDct {
    fn default() -> Self {
        Self {
            values: PropertyValues::new(DENOISE_DCT.name, DENOISE_DCT_PROPERTIES),
        }
    }
}

impl Operation for DenoiseDct {
    fn info(&self) -> &'static OperationInfo {
        &DENOISE_DCT
    }

    fn values(&self) -> &PropertyValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut PropertyValues {
        &mut self.values
    }

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image> {
        let input = inputs.main()?;
        let sigma = self.values.double("sigma")? as f32;
        let patch: PatchSize = self.values.enum_value("patch-size")?;
        debug!(sigma, %patch, "dct denoise");
        Ok(input.map_channels(|ch| denoise_dct_array(ch, sigma, patch)))
    }
}

// ---------------------------------------------------------------------------
// Mean curvature blur
// ---------------------------------------------------------------------------

pub const MEAN_CURVATURE_BLUR: OperationInfo = OperationInfo::new(
    "deluxe:mean-curvature-blur",
    "Mean Curvature Blur",
    "Regularize geometry at a speed proportional to the local mean curvature value",
);

const MEAN_CURVATURE_BLUR_PROPERTIES: &[PropertySpec] = &[PropertySpec::int(
    "iterations",
    "Iterations",
    20,
    0,
    500,
)
.describe("Controls the number of iterations")
.ui_range(0.0, 60.0)];

#[derive(Clone, Debug)]
pub struct MeanCurvatureBlur {
    values: PropertyValues,
}

impl Default for MeanCurvatureBlur {
    fn default() -> Self {
        Self {
            values: PropertyValues::new(MEAN_CURVATURE_BLUR.name, MEAN_CURVATURE_BLUR_PROPERTIES),
        }
    }
}

impl Operation for MeanCurvatureBlur {
    fn info(&self) -> &'static OperationInfo {
        &MEAN_CURVATURE_BLUR
    }

    fn values(&self) -> &PropertyValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut PropertyValues {
        &mut self.values
    }

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image> {
        let input = inputs.main()?;
        let iterations = self.values.int("iterations")? as usize;
        debug!(iterations, "mean curvature blur");
        Ok(input.map_channels(|ch| mean_curvature_blur_array(ch, iterations)))
    }
}

// ---------------------------------------------------------------------------
// Domain transform
// ---------------------------------------------------------------------------

pub const DOMAIN_TRANSFORM: OperationInfo = OperationInfo::new(
    "deluxe:domain-transform",
    "Smooth by Domain Transform",
    "An edge-preserving smoothing filter implemented with the Domain Transform \
     recursive technique.",
);

const DOMAIN_TRANSFORM_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::int("n-iterations", "Quality", 3, 1, 5)
        .describe("Number of filtering iterations. A value between 2 and 4 is usually enough."),
    PropertySpec::double("spatial-factor", "Blur radius", 30.0, 0.0, 1000.0)
        .describe("Spatial standard deviation of the blur kernel, measured in pixels.")
        .ui_range(0.0, 100.0),
    PropertySpec::double("edge-preservation", "Edge preservation", 0.8, 0.0, 1.0)
        .describe("Amount of edge preservation"),
];

#[derive(Clone, Debug)]
pub struct DomainTransform {
    values: PropertyValues,
}

impl Default for DomainTransform {
    fn default() -> Self {
        Self {
            values: PropertyValues::new(DOMAIN_TRANSFORM.name, DOMAIN_TRANSFORM_PROPERTIES),
        }
    }
}

impl Operation for DomainTransform {
    fn info(&self) -> &'static OperationInfo {
        &DOMAIN_TRANSFORM
    }

    fn values(&self) -> &PropertyValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut PropertyValues {
        &mut self.values
    }

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image> {
        let input = inputs.main()?;
        let iterations = self.values.int("n-iterations")? as usize;
        let spatial_factor = self.values.double("spatial-factor")? as f32;
        let edge_preservation = self.values.double("edge-preservation")? as f32;
        debug!(iterations, spatial_factor, edge_preservation, "domain transform");
        let channels = domain_transform(
            &input.channels(),
            iterations,
            spatial_factor,
            edge_preservation,
        );
        Ok(input.from_channels_like(channels))
    }
}

// ---------------------------------------------------------------------------
// Noise reduction
// ---------------------------------------------------------------------------

pub const NOISE_REDUCTION: OperationInfo = OperationInfo::new(
    "deluxe:noise-reduction",
    "Noise Reduction",
    "Anisotropic smoothing operation",
);

const NOISE_REDUCTION_PROPERTIES: &[PropertySpec] = &[PropertySpec::int(
    "iterations",
    "Strength",
    4,
    0,
    32,
)
.describe("Controls the number of iterations; lower values give less plastic results")
.ui_range(0.0, 8.0)];

#[derive(Clone, Debug)]
pub struct NoiseReduction {
    values: PropertyValues,
}

impl Default for NoiseReduction {
    fn default() -> Self {
        Self {
            values: PropertyValues::new(NOISE_REDUCTION.name, NOISE_REDUCTION_PROPERTIES),
        }
    }
}

impl Operation for NoiseReduction {
    fn info(&self) -> &'static OperationInfo {
        &NOISE_REDUCTION
    }

    fn values(&self) -> &PropertyValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut PropertyValues {
        &mut self.values
    }

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image> {
        let input = inputs.main()?;
        let iterations = self.values.int("iterations")? as usize;
        debug!(iterations, "noise reduction");
        Ok(input.map_channels(|ch| noise_reduction_array(ch, iterations)))
    }
}
