use tracing::debug;

use crate::error::Result;
use crate::filters::box_blur::box_blur_array;
use crate::filters::gaussian_blur::gaussian_blur_array;
use crate::filters::lens_blur::{lens_blur, Highlights};
use crate::filters::median_blur::{median_blur_array, Neighborhood};
use crate::frame::Image;
use crate::property::{EnumValue, PropertySpec, PropertyValues};

use super::{Operation, OperationInfo, PadInputs};

// ---------------------------------------------------------------------------
// Median blur
// ---------------------------------------------------------------------------

pub const MEDIAN_BLUR: OperationInfo = OperationInfo::new(
    "deluxe:median-blur",
    "Median Blur",
    "Blur resulting from computing the median color in the neighborhood of each pixel.",
);

const NEIGHBORHOODS: &[EnumValue] = &[
    EnumValue::new("square", "Square"),
    EnumValue::new("circle", "Circle"),
    EnumValue::new("diamond", "Diamond"),
];

const MEDIAN_BLUR_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::enumeration("neighborhood", "Neighborhood", "circle", NEIGHBORHOODS)
        .describe("Neighborhood type"),
    PropertySpec::int("radius", "Radius", 3, 0, 400)
        .describe("Neighborhood radius")
        .ui_range(0.0, 100.0)
        .unit("pixel-distance"),
    PropertySpec::double("percentile", "Percentile", 50.0, 0.0, 100.0)
        .describe("Neighborhood color percentile"),
    PropertySpec::double("alpha-percentile", "Alpha percentile", 50.0, 0.0, 100.0)
        .describe("Neighborhood alpha percentile, used only by images with alpha"),
];

#[derive(Clone, Debug)]
pub struct MedianBlur {
    values: PropertyValues,
}

impl Default for MedianBlur {
    fn default() -> Self {
        Self {
            values: PropertyValues::new(MEDIAN_BLUR.name, MEDIAN_BLUR_PROPERTIES),
        }
    }
}

impl Operation for MedianBlur {
    fn info(&self) -> &'static OperationInfo {
        &MEDIAN_BLUR
    }

    fn values(&self) -> &PropertyValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut PropertyValues {
        &mut self.values
    }

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image> {
        let input = inputs.main()?;
        let radius = self.values.int("radius")? as usize;
        let shape: Neighborhood = self.values.enum_value("neighborhood")?;
        let percentile = self.values.double("percentile")?;
        debug!(radius, %shape, percentile, "median blur");
        Ok(input.map_channels(|ch| median_blur_array(ch, radius, shape, percentile)))
    }
}

// ---------------------------------------------------------------------------
// Box blur
// ---------------------------------------------------------------------------

pub const BOX_BLUR: OperationInfo = OperationInfo::new(
    "deluxe:box-blur",
    "Box Blur",
    "Blur resulting from averaging the colors of a square neighborhood.",
);

const BOX_BLUR_PROPERTIES: &[PropertySpec] = &[PropertySpec::int("radius", "Radius", 4, 0, 1000)
    .describe("Radius of square pixel region, (width and height will be radius*2+1)")
    .ui_range(0.0, 100.0)
    .unit("pixel-distance")];

#[derive(Clone, Debug)]
pub struct BoxBlur {
    values: PropertyValues,
}

impl Default for BoxBlur {
    fn default() -> Self {
        Self {
            values: PropertyValues::new(BOX_BLUR.name, BOX_BLUR_PROPERTIES),
        }
    }
}

impl Operation for BoxBlur {
    fn info(&self) -> &'static OperationInfo {
        &BOX_BLUR
    }

    fn values(&self) -> &PropertyValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut PropertyValues {
        &mut self.values
    }

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image> {
        let input = inputs.main()?;
        let radius = self.values.int("radius")? as usize;
        debug!(radius, "box blur");
        Ok(input.map_channels(|ch| box_blur_array(ch, radius)))
    }
}

// ---------------------------------------------------------------------------
// Lens blur
// ---------------------------------------------------------------------------

pub const LENS_BLUR: OperationInfo = OperationInfo::new(
    "deluxe:lens-blur",
    "Lens Blur",
    "Simulate out-of-focus lens blur.",
);

const LENS_BLUR_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::double("radius", "Radius", 10.0, 0.0, 1500.0)
        .describe("Blur radius")
        .ui_range(0.0, 100.0)
        .ui_gamma(2.0)
        .unit("pixel-distance"),
    PropertySpec::double("highlight-factor", "Highlight factor", 0.0, 0.0, 1.0)
        .describe("Relative highlight strength"),
    PropertySpec::double("highlight-threshold-min", "Highlight threshold (low)", 0.9, 0.0, 1.0),
    PropertySpec::double("highlight-threshold-max", "Highlight threshold (high)", 1.0, 0.0, 1.0),
    PropertySpec::boolean("clip", "Clip to input extents", true)
        .describe("Clip output values to the [0, 1] range"),
];

#[derive(Clone, Debug)]
pub struct LensBlur {
    values: PropertyValues,
}

impl Default for LensBlur {
    fn default() -> Self {
        Self {
            values: PropertyValues::new(LENS_BLUR.name, LENS_BLUR_PROPERTIES),
        }
    }
}

impl Operation for LensBlur {
    fn info(&self) -> &'static OperationInfo {
        &LENS_BLUR
    }

    fn values(&self) -> &PropertyValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut PropertyValues {
        &mut self.values
    }

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image> {
        let input = inputs.main()?;
        let radius = self.values.double("radius")? as f32;
        let highlights = Highlights {
            factor: self.values.double("highlight-factor")? as f32,
            threshold_min: self.values.double("highlight-threshold-min")? as f32,
            threshold_max: self.values.double("highlight-threshold-max")? as f32,
            clip: self.values.boolean("clip")?,
        };
        debug!(radius, ?highlights, "lens blur");
        let luminance = input.to_mono();
        let channels = lens_blur(&input.channels(), &luminance.data, radius, highlights);
        Ok(input.from_channels_like(channels))
    }
}

// ---------------------------------------------------------------------------
// Gaussian blur
// ---------------------------------------------------------------------------

pub const GAUSSIAN_BLUR: OperationInfo = OperationInfo::new(
    "deluxe:gaussian-blur",
    "Gaussian Blur",
    "Performs an averaging of neighboring pixels with the normal distribution as weighting.",
);

const GAUSSIAN_BLUR_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::double("std-dev-x", "Size X", 1.5, 0.0, 1500.0)
        .describe("Standard deviation for the horizontal axis")
        .ui_range(0.0, 100.0)
        .ui_gamma(3.0)
        .unit("pixel-distance"),
    PropertySpec::double("std-dev-y", "Size Y", 1.5, 0.0, 1500.0)
        .describe("Standard deviation for the vertical axis")
        .ui_range(0.0, 100.0)
        .ui_gamma(3.0)
        .unit("pixel-distance"),
];

#[derive(Clone, Debug)]
pub struct GaussianBlur {
    values: PropertyValues,
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self {
            values: PropertyValues::new(GAUSSIAN_BLUR.name, GAUSSIAN_BLUR_PROPERTIES),
        }
    }
}

impl Operation for GaussianBlur {
    fn info(&self) -> &'static OperationInfo {
        &GAUSSIAN_BLUR
    }

    fn values(&self) -> &PropertyValues {
        &self.values
    }

    fn values_mut(&mut self) -> &mut PropertyValues {
        &mut self.values
    }

    fn process(&self, inputs: &PadInputs<'_>) -> Result<Image> {
        let input = inputs.main()?;
        let sigma_x = self.values.double("std-dev-x")? as f32;
        let sigma_y = self.values.double("std-dev-y")? as f32;
        debug!(sigma_x, sigma_y, "gaussian blur");
        Ok(input.map_channels(|ch| gaussian_blur_array(ch, sigma_x, sigma_y)))
    }
}
