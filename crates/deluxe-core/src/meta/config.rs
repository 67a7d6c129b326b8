use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filters::median_blur::Neighborhood;
use crate::property::Value;

use super::sharpen::{SharpenDeluxe, Technique};
use super::MetaNode;

/// Sharpen Deluxe settings as stored in a TOML file.
///
/// Field names follow the meta-node property names; defaults match the
/// property defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpenConfig {
    #[serde(rename = "type")]
    pub technique: Technique,
    pub median: i64,
    #[serde(rename = "medianshape")]
    pub median_shape: Neighborhood,
    #[serde(rename = "box")]
    pub box_radius: i64,
    pub denoise: f64,
    pub mcb: f64,
    pub ds: f64,
    pub nr: f64,
    pub lens: f64,
    pub gaussian: f64,
    /// Grain-merge the high pass back onto the input.
    pub merge: Option<MergeConfig>,
}

impl Default for SharpenConfig {
    fn default() -> Self {
        Self {
            technique: Technique::Median,
            median: 11,
            median_shape: Neighborhood::Circle,
            box_radius: 3,
            denoise: 40.0,
            mcb: 30.0,
            ds: 0.8,
            nr: 25.0,
            lens: 11.0,
            gaussian: 5.0,
            merge: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Opacity of the merged high pass (0.0..1.0).
    pub opacity: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self { opacity: 1.0 }
    }
}

impl SharpenConfig {
    /// Property writes in the order they are applied.
    pub fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("median", Value::Int(self.median)),
            ("medianshape", Value::from(self.median_shape.nick())),
            ("box", Value::Int(self.box_radius)),
            ("denoise", Value::Double(self.denoise)),
            ("mcb", Value::Double(self.mcb)),
            ("ds", Value::Double(self.ds)),
            ("nr", Value::Double(self.nr)),
            ("lens", Value::Double(self.lens)),
            ("gaussian", Value::Double(self.gaussian)),
            ("type", Value::from(self.technique.nick())),
        ]
    }

    /// Write every setting onto `node`. Stops at the first rejected value.
    pub fn apply_to(&self, node: &mut MetaNode<SharpenDeluxe>) -> Result<()> {
        for (name, value) in self.properties() {
            node.set_property(name, value)?;
        }
        Ok(())
    }
}
