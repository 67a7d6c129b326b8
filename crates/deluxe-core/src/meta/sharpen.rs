//! Sharpen Deluxe: a high-pass sharpen built from one of eight blurs.
//!
//! The meta-node owns one child per technique plus a grain-extract blend.
//! Only the selected technique is wired in:
//!
//! ```text
//! input ──────────────► blend.input
//! input ─► technique ─► blend.aux
//!                       blend.output ─► output
//! ```
//!
//! The result is the input minus its blurred copy, offset to mid grey.
//! Grain-merging it back onto the image sharpens it.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DeluxeError, Result};
use crate::frame::Image;
use crate::graph::{Graph, NodeId};
use crate::ops::blur::{BOX_BLUR, GAUSSIAN_BLUR, LENS_BLUR, MEDIAN_BLUR};
use crate::ops::layer_mode::LAYER_MODE;
use crate::ops::smooth::{DENOISE_DCT, DOMAIN_TRANSFORM, MEAN_CURVATURE_BLUR, NOISE_REDUCTION};
use crate::ops::{OperationInfo, AUX_PAD, INPUT_PAD, OUTPUT_PAD};
use crate::property::{EnumValue, PropertySpec, PropertyValues, Value};

use super::{MetaContext, MetaOperation};

pub const SHARPEN_DELUXE: OperationInfo = OperationInfo {
    name: "lb:sharpen-deluxe",
    title: "Sharpen Deluxe",
    description: "Sharpen images using different techniques. This filter requires using \
                  blend modes. Grain Merge is a true sharpen, but experiment with other blend \
                  modes and the opacity slider. Technically the sharpen works by grain \
                  extracting the listed filters.",
    reference_hash: Some("535233dashacpen"),
    menu_path: Some("<Image>/Filters/Enhance"),
    menu_label: Some("Sharpen Deluxe..."),
};

/// Blur or smoothing filter whose grain extract forms the high pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technique {
    #[default]
    #[serde(rename = "median")]
    Median,
    #[serde(rename = "denoise")]
    Denoise,
    #[serde(rename = "box")]
    Box,
    #[serde(rename = "mcb")]
    MeanCurvature,
    #[serde(rename = "ds")]
    DomainSmooth,
    #[serde(rename = "nr")]
    NoiseReduction,
    #[serde(rename = "lens")]
    Lens,
    #[serde(rename = "gaussian")]
    Gaussian,
}

impl Technique {
    pub const ALL: [Technique; 8] = [
        Self::Median,
        Self::Denoise,
        Self::Box,
        Self::MeanCurvature,
        Self::DomainSmooth,
        Self::NoiseReduction,
        Self::Lens,
        Self::Gaussian,
    ];

    pub fn nick(self) -> &'static str {
        match self {
            Self::Median => "median",
            Self::Denoise => "denoise",
            Self::Box => "box",
            Self::MeanCurvature => "mcb",
            Self::DomainSmooth => "ds",
            Self::NoiseReduction => "nr",
            Self::Lens => "lens",
            Self::Gaussian => "gaussian",
        }
    }

    /// Label of the child node built for this technique.
    pub fn node_label(self) -> &'static str {
        match self {
            Self::Median => "median",
            Self::Denoise => "denoise",
            Self::Box => "box",
            Self::MeanCurvature => "meanCurvature",
            Self::DomainSmooth => "domainSmooth",
            Self::NoiseReduction => "noiseReduction",
            Self::Lens => "lens",
            Self::Gaussian => "gaussian",
        }
    }

    /// Registry name of the child operation.
    pub fn operation(self) -> &'static str {
        match self {
            Self::Median => MEDIAN_BLUR.name,
            Self::Denoise => DENOISE_DCT.name,
            Self::Box => BOX_BLUR.name,
            Self::MeanCurvature => MEAN_CURVATURE_BLUR.name,
            Self::DomainSmooth => DOMAIN_TRANSFORM.name,
            Self::NoiseReduction => NOISE_REDUCTION.name,
            Self::Lens => LENS_BLUR.name,
            Self::Gaussian => GAUSSIAN_BLUR.name,
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Median => write!(f, "Median"),
            Self::Denoise => write!(f, "Denoise"),
            Self::Box => write!(f, "Box"),
            Self::MeanCurvature => write!(f, "Mean Curvature"),
            Self::DomainSmooth => write!(f, "Domain Smooth"),
            Self::NoiseReduction => write!(f, "Noise Reduction"),
            Self::Lens => write!(f, "Lens"),
            Self::Gaussian => write!(f, "Gaussian"),
        }
    }
}

impl FromStr for Technique {
    type Err = DeluxeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.nick() == s)
            .ok_or_else(|| DeluxeError::UnknownEnumValue {
                name: "type".to_string(),
                value: s.to_string(),
            })
    }
}

/// One child node per technique, indexed by [`Technique`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TechniqueNodes([NodeId; 8]);

impl TechniqueNodes {
    pub fn iter(&self) -> impl Iterator<Item = (Technique, NodeId)> + '_ {
        Technique::ALL.into_iter().zip(self.0.iter().copied())
    }
}

impl Index<Technique> for TechniqueNodes {
    type Output = NodeId;

    fn index(&self, technique: Technique) -> &NodeId {
        &self.0[technique as usize]
    }
}

const TECHNIQUES: &[EnumValue] = &[
    EnumValue::new("median", "Median"),
    EnumValue::new("denoise", "Denoise"),
    EnumValue::new("box", "Box"),
    EnumValue::new("mcb", "Mean Curvature"),
    EnumValue::new("ds", "Domain Smooth"),
    EnumValue::new("nr", "Noise Reduction"),
    EnumValue::new("lens", "Lens"),
    EnumValue::new("gaussian", "Gaussian"),
];

const MEDIAN_SHAPES: &[EnumValue] = &[
    EnumValue::new("square", "Square"),
    EnumValue::new("circle", "Circle"),
    EnumValue::new("diamond", "Diamond"),
];

pub const SHARPEN_DELUXE_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::enumeration("type", "Type of Sharpen", "median", TECHNIQUES).describe(
        "Choose a sharpen mask. The filter selected is 'grain extracted' to make it a high \
         pass sharpen mask.",
    ),
    PropertySpec::int("median", "Median Sharpen", 11, 0, 35)
        .describe("Median High Pass")
        .ui_range(0.0, 35.0)
        .unit("pixel-distance")
        .visible_when("type", &["median"]),
    PropertySpec::enumeration("medianshape", "Median Shape", "circle", MEDIAN_SHAPES)
        .describe("Base shape of Median")
        .visible_when("type", &["median"]),
    PropertySpec::int("box", "Box Sharpen", 3, 0, 11)
        .describe("Box Blur High Pass")
        .visible_when("type", &["box"]),
    PropertySpec::double("denoise", "Denoise Sharpen", 40.0, 20.0, 60.0)
        .describe("Denoise High Pass")
        .visible_when("type", &["denoise"]),
    PropertySpec::double("mcb", "Mean Curvature Sharpen", 30.0, 5.0, 80.0)
        .describe("Mean Curvature High Pass")
        .visible_when("type", &["mcb"]),
    PropertySpec::double("ds", "Domain Smooth Sharpen (reverse direction)", 0.8, 0.5, 0.9)
        .describe("Domain Smooth High Pass")
        .visible_when("type", &["ds"]),
    PropertySpec::double("nr", "Noise Reduction Sharpen", 25.0, 15.0, 30.0)
        .describe("Noise Reduction High Pass. This mode barely makes noticeable changes.")
        .visible_when("type", &["nr"]),
    PropertySpec::double("lens", "Lens Blur Sharpen", 11.0, 0.0, 11.0)
        .describe("Lens Blur High Pass")
        .ui_range(0.0, 11.0)
        .ui_gamma(2.0)
        .visible_when("type", &["lens"]),
    PropertySpec::double("gaussian", "Gaussian Blur Sharpen (default high pass)", 5.0, 0.0, 10.0)
        .describe("Gaussian Blur High Pass. Much the same as a classic high pass filter.")
        .ui_range(0.0, 10.0)
        .ui_gamma(2.0)
        .visible_when("type", &["gaussian"]),
];

#[derive(Clone, Copy, Debug)]
struct Children {
    input: NodeId,
    output: NodeId,
    blend: NodeId,
    techniques: TechniqueNodes,
}

/// The Sharpen Deluxe meta-operation. Host it in a
/// [`MetaNode`](super::MetaNode).
#[derive(Clone, Debug, Default)]
pub struct SharpenDeluxe {
    children: Option<Children>,
}

impl SharpenDeluxe {
    pub fn new() -> Self {
        Self::default()
    }

    /// The grain-extract blend node, once attached.
    pub fn blend(&self) -> Option<NodeId> {
        self.children.map(|c| c.blend)
    }

    /// The technique nodes, once attached.
    pub fn techniques(&self) -> Option<&TechniqueNodes> {
        self.children.as_ref().map(|c| &c.techniques)
    }
}

impl MetaOperation for SharpenDeluxe {
    fn info(&self) -> &'static OperationInfo {
        &SHARPEN_DELUXE
    }

    fn properties(&self) -> &'static [PropertySpec] {
        SHARPEN_DELUXE_PROPERTIES
    }

    fn attach(&mut self, ctx: &mut MetaContext<'_>) -> Result<()> {
        if self.children.is_some() {
            return Err(DeluxeError::AlreadyAttached);
        }

        let blend = ctx.new_child(
            "blend",
            LAYER_MODE.name,
            &[
                ("layer-mode", Value::from("grain-extract")),
                ("blend-space", Value::from("rgb-perceptual")),
            ],
        )?;

        let mut ids = [ctx.input(); 8];
        for technique in Technique::ALL {
            let params = match technique {
                Technique::Median => vec![
                    ("alpha-percentile", Value::Double(100.0)),
                    ("percentile", Value::Double(50.0)),
                ],
                Technique::DomainSmooth => vec![("spatial-factor", Value::Double(100.0))],
                _ => Vec::new(),
            };
            ids[technique as usize] =
                ctx.new_child(technique.node_label(), technique.operation(), &params)?;
        }
        let techniques = TechniqueNodes(ids);

        ctx.redirect("box", techniques[Technique::Box], "radius")?;
        ctx.redirect("median", techniques[Technique::Median], "radius")?;
        ctx.redirect("medianshape", techniques[Technique::Median], "neighborhood")?;
        ctx.redirect("denoise", techniques[Technique::Denoise], "sigma")?;
        ctx.redirect("mcb", techniques[Technique::MeanCurvature], "iterations")?;
        ctx.redirect("ds", techniques[Technique::DomainSmooth], "edge-preservation")?;
        ctx.redirect("nr", techniques[Technique::NoiseReduction], "iterations")?;
        ctx.redirect("lens", techniques[Technique::Lens], "radius")?;
        ctx.redirect("gaussian", techniques[Technique::Gaussian], "std-dev-x")?;
        ctx.redirect("gaussian", techniques[Technique::Gaussian], "std-dev-y")?;

        self.children = Some(Children {
            input: ctx.input(),
            output: ctx.output(),
            blend,
            techniques,
        });
        Ok(())
    }

    fn update(&self, graph: &mut Graph, values: &PropertyValues) -> Result<()> {
        let children = self.children.ok_or(DeluxeError::NotAttached)?;
        let technique: Technique = values.enum_value("type")?;
        let active = children.techniques[technique];

        graph.connect(children.input, OUTPUT_PAD, children.blend, INPUT_PAD)?;
        graph.connect(children.blend, OUTPUT_PAD, children.output, INPUT_PAD)?;
        graph.connect(children.input, OUTPUT_PAD, active, INPUT_PAD)?;
        graph.connect(active, OUTPUT_PAD, children.blend, AUX_PAD)?;

        for (other, node) in children.techniques.iter() {
            if other != technique {
                graph.disconnect(node, INPUT_PAD)?;
            }
        }

        debug!(%technique, node = %active, "Sharpen pipeline wired");
        Ok(())
    }
}

/// Grain-merge a high pass back onto `image` at `opacity`, which is the
/// sharpened result the high pass is meant for.
pub fn grain_merge(image: Image, high_pass: Image, opacity: f64) -> Result<Image> {
    let mut graph = Graph::new();
    let base = graph.add_input();
    let detail = graph.add_input();
    let merge = graph.add_node(
        LAYER_MODE.name,
        &[
            ("layer-mode", Value::from("grain-merge")),
            ("blend-space", Value::from("rgb-perceptual")),
            ("opacity", Value::Double(opacity)),
        ],
    )?;
    graph.set_label(merge, "merge")?;
    graph.connect(base, OUTPUT_PAD, merge, INPUT_PAD)?;
    graph.connect(detail, OUTPUT_PAD, merge, AUX_PAD)?;
    graph.set_source(base, image)?;
    graph.set_source(detail, high_pass)?;
    graph.process(merge)
}
