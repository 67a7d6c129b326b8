mod common;

use std::collections::BTreeSet;

use approx::assert_relative_eq;
use deluxe_core::error::{DeluxeError, Result};
use deluxe_core::frame::{Frame, Image};
use deluxe_core::graph::Graph;
use deluxe_core::meta::sharpen::{grain_merge, SharpenDeluxe, Technique, SHARPEN_DELUXE};
use deluxe_core::meta::{MetaContext, MetaNode, MetaOperation};
use deluxe_core::ops::OperationInfo;
use deluxe_core::property::{PropertySpec, PropertyValues, Value};
use ndarray::Array2;

use common::*;

// ---------------------------------------------------------------------------
// Attach
// ---------------------------------------------------------------------------

#[test]
fn test_attach_creates_fixed_pool() {
    let node = attached_sharpen();
    // input, output, blend and eight techniques
    assert_eq!(node.graph().len(), 11);
    assert_eq!(node.redirects().len(), 10);
    assert!(node.is_attached());

    let blend = blend_node(&node);
    assert_eq!(node.graph().kind_name(blend).unwrap(), "deluxe:layer-mode");
    assert_eq!(
        node.graph().param(blend, "layer-mode").unwrap(),
        &Value::from("grain-extract")
    );
    assert_eq!(
        node.graph().param(blend, "blend-space").unwrap(),
        &Value::from("rgb-perceptual")
    );

    for technique in Technique::ALL {
        let id = technique_node(&node, technique);
        assert_eq!(node.graph().kind_name(id).unwrap(), technique.operation());
        assert_eq!(node.graph().label(id).unwrap(), technique.node_label());
    }
}

#[test]
fn test_attach_intrinsic_configuration() {
    let node = attached_sharpen();
    let median = technique_node(&node, Technique::Median);
    assert_eq!(
        node.graph().param(median, "alpha-percentile").unwrap(),
        &Value::Double(100.0)
    );
    assert_eq!(
        node.graph().param(median, "percentile").unwrap(),
        &Value::Double(50.0)
    );
    let ds = technique_node(&node, Technique::DomainSmooth);
    assert_eq!(
        node.graph().param(ds, "spatial-factor").unwrap(),
        &Value::Double(100.0)
    );
}

#[test]
fn test_attach_pushes_defaults_through_redirects() {
    let node = attached_sharpen();
    let graph = node.graph();
    let param = |t: Technique, name: &str| graph.param(technique_node(&node, t), name).unwrap();

    assert_eq!(param(Technique::Median, "radius"), &Value::Int(11));
    assert_eq!(param(Technique::Median, "neighborhood"), &Value::from("circle"));
    assert_eq!(param(Technique::Box, "radius"), &Value::Int(3));
    assert_eq!(param(Technique::Denoise, "sigma"), &Value::Double(40.0));
    assert_eq!(param(Technique::MeanCurvature, "iterations"), &Value::Int(30));
    assert_eq!(
        param(Technique::DomainSmooth, "edge-preservation"),
        &Value::Double(0.8)
    );
    assert_eq!(param(Technique::NoiseReduction, "iterations"), &Value::Int(25));
    assert_eq!(param(Technique::Lens, "radius"), &Value::Double(11.0));
    assert_eq!(param(Technique::Gaussian, "std-dev-x"), &Value::Double(5.0));
    assert_eq!(param(Technique::Gaussian, "std-dev-y"), &Value::Double(5.0));
}

#[test]
fn test_attach_twice_fails() {
    let mut node = attached_sharpen();
    assert!(matches!(node.attach(), Err(DeluxeError::AlreadyAttached)));
    assert_eq!(node.graph().len(), 11);
}

#[test]
fn test_detached_node_refuses_work() {
    let mut node = MetaNode::new(SharpenDeluxe::new());
    assert!(!node.is_attached());
    assert!(matches!(node.update(), Err(DeluxeError::NotAttached)));
    assert!(matches!(
        node.process(make_mono(4, 4, 0.5)),
        Err(DeluxeError::NotAttached)
    ));
    // Writes before attach are kept and forwarded at attach time.
    node.set_property("box", Value::Int(7)).unwrap();
    node.attach().unwrap();
    let box_node = technique_node(&node, Technique::Box);
    assert_eq!(node.graph().param(box_node, "radius").unwrap(), &Value::Int(7));
}

/// A meta operation whose second child names an operation that does not exist.
#[derive(Debug)]
struct BrokenChildren;

const BROKEN_CHILDREN: OperationInfo =
    OperationInfo::new("test:broken-children", "Broken", "Fails while attaching");

impl MetaOperation for BrokenChildren {
    fn info(&self) -> &'static OperationInfo {
        &BROKEN_CHILDREN
    }

    fn properties(&self) -> &'static [PropertySpec] {
        &[]
    }

    fn attach(&mut self, ctx: &mut MetaContext<'_>) -> Result<()> {
        ctx.new_child("blur", "deluxe:box-blur", &[])?;
        ctx.new_child("missing", "deluxe:nope", &[])?;
        Ok(())
    }

    fn update(&self, _graph: &mut Graph, _values: &PropertyValues) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_failed_attach_leaves_node_unusable() {
    let mut node = MetaNode::new(BrokenChildren);
    assert!(matches!(
        node.attach(),
        Err(DeluxeError::UnknownOperation(name)) if name == "deluxe:nope"
    ));
    assert!(!node.is_attached());
    assert!(matches!(node.update(), Err(DeluxeError::NotAttached)));
    assert!(matches!(
        node.process(make_mono(4, 4, 0.5)),
        Err(DeluxeError::NotAttached)
    ));
    assert!(matches!(node.attach(), Err(DeluxeError::AlreadyAttached)));
}

#[test]
fn test_operation_keys() {
    assert_eq!(SHARPEN_DELUXE.name, "lb:sharpen-deluxe");
    assert_eq!(SHARPEN_DELUXE.title, "Sharpen Deluxe");
    assert_eq!(SHARPEN_DELUXE.reference_hash, Some("535233dashacpen"));
    assert_eq!(SHARPEN_DELUXE.menu_path, Some("<Image>/Filters/Enhance"));
    assert_eq!(SHARPEN_DELUXE.menu_label, Some("Sharpen Deluxe..."));
}

// ---------------------------------------------------------------------------
// Topology
// ---------------------------------------------------------------------------

#[test]
fn test_topology_for_every_technique() {
    let mut node = attached_sharpen();
    for technique in Technique::ALL {
        node.set_property("type", Value::from(technique.nick())).unwrap();
        assert_eq!(
            node.graph().edges(),
            expected_edges(&node, technique),
            "edges for {technique}"
        );

        let live = node.graph().reachable_from(node.output());
        let expected: BTreeSet<_> = [
            node.output(),
            blend_node(&node),
            technique_node(&node, technique),
            node.input(),
        ]
        .into_iter()
        .collect();
        assert_eq!(live, expected, "reachable set for {technique}");
    }
}

#[test]
fn test_default_topology_is_median() {
    let node = attached_sharpen();
    assert_eq!(node.graph().edges(), expected_edges(&node, Technique::Median));
}

#[test]
fn test_update_is_idempotent() {
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("lens")).unwrap();
    let before = node.graph().edges();
    node.update().unwrap();
    node.update().unwrap();
    assert_eq!(node.graph().edges(), before);
}

#[test]
fn test_switching_detaches_previous_technique() {
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("box")).unwrap();
    node.set_property("box", Value::Int(9)).unwrap();
    node.set_property("type", Value::from("denoise")).unwrap();

    let blend = blend_node(&node);
    let box_node = technique_node(&node, Technique::Box);
    let denoise = technique_node(&node, Technique::Denoise);
    assert_eq!(node.graph().source_of(blend, "aux"), Some(denoise));
    assert_eq!(node.graph().source_of(box_node, "input"), None);
    assert!(!node.graph().reachable_from(node.output()).contains(&box_node));

    // The idle node keeps its allocation and its last parameters.
    assert_eq!(node.graph().param(box_node, "radius").unwrap(), &Value::Int(9));
}

#[test]
fn test_unknown_technique_changes_nothing() {
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("gaussian")).unwrap();
    let before = node.graph().edges();

    let err = node.set_property("type", Value::from("unsharp")).unwrap_err();
    assert!(matches!(err, DeluxeError::UnknownEnumValue { .. }));
    assert_eq!(node.property("type").unwrap(), &Value::from("gaussian"));
    assert_eq!(node.graph().edges(), before);
}

#[test]
fn test_technique_nicks_parse() {
    for technique in Technique::ALL {
        assert_eq!(technique.nick().parse::<Technique>().unwrap(), technique);
    }
    assert!("Median".parse::<Technique>().is_err());
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_median_scenario() {
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("median")).unwrap();
    node.set_property("median", Value::Int(11)).unwrap();
    node.set_property("medianshape", Value::from("circle")).unwrap();

    let median = technique_node(&node, Technique::Median);
    assert_eq!(node.graph().param(median, "radius").unwrap(), &Value::Int(11));
    assert_eq!(
        node.graph().param(median, "neighborhood").unwrap(),
        &Value::from("circle")
    );
    assert_eq!(node.graph().source_of(blend_node(&node), "aux"), Some(median));
}

#[test]
fn test_gaussian_scenario() {
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("gaussian")).unwrap();
    node.set_property("gaussian", Value::Double(5.0)).unwrap();

    let gaussian = technique_node(&node, Technique::Gaussian);
    assert_eq!(
        node.graph().param(gaussian, "std-dev-x").unwrap(),
        &Value::Double(5.0)
    );
    assert_eq!(
        node.graph().param(gaussian, "std-dev-y").unwrap(),
        &Value::Double(5.0)
    );
    assert_eq!(
        node.graph().source_of(blend_node(&node), "aux"),
        Some(gaussian)
    );
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[test]
fn test_flat_image_high_pass_is_mid_grey() {
    let mut node = attached_sharpen();
    for technique in Technique::ALL {
        node.set_property("type", Value::from(technique.nick())).unwrap();
        // Small values keep the slow techniques quick.
        let out = node.process(make_mono(12, 12, 0.3)).unwrap();
        assert_eq!(out.dim(), (12, 12));
        for v in out.channels()[0].iter() {
            assert_relative_eq!(*v, 0.5, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_color_high_pass_keeps_channels() {
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("gaussian")).unwrap();
    let out = node.process(make_color(10, 10, 0.2, 0.4, 0.6)).unwrap();
    assert_eq!(out.channel_count(), 3);
    for channel in out.channels() {
        for v in channel.iter() {
            assert_relative_eq!(*v, 0.5, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_high_pass_highlights_edges() {
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("box")).unwrap();
    node.set_property("box", Value::Int(2)).unwrap();
    let image = make_square(16, 16);
    let out = node.process(image).unwrap();
    let data = out.channels()[0];
    // Just inside the bright square the input exceeds its blur.
    assert!(data[[4, 8]] > 0.5);
    // Just outside it falls below.
    assert!(data[[3, 8]] < 0.5);
    // Far from the edge there is nothing to extract.
    assert_relative_eq!(data[[8, 8]], 0.5, epsilon = 1e-5);
}

#[test]
fn test_zero_radius_box_is_identity_high_pass() {
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("box")).unwrap();
    node.set_property("box", Value::Int(0)).unwrap();
    let out = node.process(make_ramp(8, 8)).unwrap();
    for v in out.channels()[0].iter() {
        assert_relative_eq!(*v, 0.5, epsilon = 1e-6);
    }
}

#[test]
fn test_process_leaves_no_image_behind() {
    let mut node = attached_sharpen();
    node.process(make_mono(6, 6, 0.5)).unwrap();
    // The source is cleared after each run, so evaluating the graph directly fails.
    assert!(matches!(
        node.graph().process(node.output()),
        Err(DeluxeError::NoSource)
    ));
}

// ---------------------------------------------------------------------------
// Grain merge
// ---------------------------------------------------------------------------

#[test]
fn test_flat_high_pass_merges_to_input() {
    let image = make_ramp(8, 8);
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("box")).unwrap();
    node.set_property("box", Value::Int(0)).unwrap();
    let high_pass = node.process(image.clone()).unwrap();
    let merged = grain_merge(image.clone(), high_pass, 1.0).unwrap();
    assert!(max_abs_diff(&image, &merged) < 1e-6);
}

#[test]
fn test_merge_sharpens_edges() {
    let image = make_square(16, 16);
    let mut node = attached_sharpen();
    node.set_property("type", Value::from("gaussian")).unwrap();
    node.set_property("gaussian", Value::Double(1.0)).unwrap();
    let high_pass = node.process(image.clone()).unwrap();

    let full = grain_merge(image.clone(), high_pass.clone(), 1.0).unwrap();
    let none = grain_merge(image.clone(), high_pass, 0.0).unwrap();
    let sharpened = full.channels()[0];
    // Overshoot on both sides of the edge.
    assert!(sharpened[[4, 8]] > 0.8);
    assert!(sharpened[[3, 8]] < 0.2);
    assert!(max_abs_diff(&image, &none) < 1e-6);
}

// ---------------------------------------------------------------------------
// Degenerate input
// ---------------------------------------------------------------------------

#[test]
fn test_empty_image_rejected_for_every_technique() {
    let mut node = attached_sharpen();
    for technique in Technique::ALL {
        node.set_property("type", Value::from(technique.nick())).unwrap();
        for shape in [(4, 0), (0, 4)] {
            let empty = Image::Mono(Frame::new(Array2::zeros(shape), 8));
            assert!(
                matches!(node.process(empty), Err(DeluxeError::InvalidDimensions { .. })),
                "{technique} with {shape:?}"
            );
        }
    }
}

#[test]
fn test_single_pixel_for_every_technique() {
    let mut node = attached_sharpen();
    for technique in Technique::ALL {
        node.set_property("type", Value::from(technique.nick())).unwrap();
        let out = node.process(make_mono(1, 1, 0.4)).unwrap();
        assert_relative_eq!(out.channels()[0][[0, 0]], 0.5, epsilon = 1e-4);
    }
}
