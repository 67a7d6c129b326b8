mod common;

use deluxe_core::error::DeluxeError;
use deluxe_core::filters::median_blur::Neighborhood;
use deluxe_core::meta::config::{MergeConfig, SharpenConfig};
use deluxe_core::meta::sharpen::Technique;
use deluxe_core::property::Value;

use common::*;

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn test_default_matches_property_defaults() {
    let config = SharpenConfig::default();
    let node = attached_sharpen();
    for (name, value) in config.properties() {
        let current = node.property(name).unwrap();
        match (current, &value) {
            (Value::Int(a), Value::Int(b)) => assert_eq!(a, b, "{name}"),
            (Value::Double(a), Value::Double(b)) => assert_eq!(a, b, "{name}"),
            (Value::Enum(a), Value::Enum(b)) => assert_eq!(a, b, "{name}"),
            other => panic!("{name}: unexpected pair {other:?}"),
        }
    }
}

#[test]
fn test_toml_round_trip() {
    let config = SharpenConfig {
        technique: Technique::DomainSmooth,
        ds: 0.6,
        merge: Some(MergeConfig { opacity: 0.5 }),
        ..Default::default()
    };
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("type = \"ds\""));
    assert!(text.contains("[merge]"));
    let parsed: SharpenConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let text = r#"
        type = "gaussian"
        medianshape = "square"
        gaussian = 2.5
    "#;
    let config: SharpenConfig = toml::from_str(text).unwrap();
    assert_eq!(config.technique, Technique::Gaussian);
    assert_eq!(config.median_shape, Neighborhood::Square);
    assert_eq!(config.gaussian, 2.5);
    assert_eq!(config.median, 11);
    assert_eq!(config.merge, None);
}

#[test]
fn test_empty_merge_section_uses_full_opacity() {
    let config: SharpenConfig = toml::from_str("[merge]\n").unwrap();
    assert_eq!(config.merge, Some(MergeConfig { opacity: 1.0 }));
}

#[test]
fn test_unknown_technique_fails_to_parse() {
    assert!(toml::from_str::<SharpenConfig>("type = \"unsharp\"").is_err());
}

#[test]
fn test_json_uses_property_names() {
    let json = serde_json::to_value(SharpenConfig::default()).unwrap();
    assert_eq!(json["type"], "median");
    assert_eq!(json["medianshape"], "circle");
    assert_eq!(json["box"], 3);
    assert!(json["merge"].is_null());
}

// ---------------------------------------------------------------------------
// Applying to a meta node
// ---------------------------------------------------------------------------

#[test]
fn test_apply_sets_values_and_topology() {
    let config = SharpenConfig {
        technique: Technique::Gaussian,
        gaussian: 2.5,
        mcb: 42.9,
        ..Default::default()
    };
    let mut node = attached_sharpen();
    config.apply_to(&mut node).unwrap();

    let gaussian = technique_node(&node, Technique::Gaussian);
    assert_eq!(node.graph().param(gaussian, "std-dev-x").unwrap(), &Value::Double(2.5));
    assert_eq!(node.graph().param(gaussian, "std-dev-y").unwrap(), &Value::Double(2.5));
    let mcb = technique_node(&node, Technique::MeanCurvature);
    assert_eq!(node.graph().param(mcb, "iterations").unwrap(), &Value::Int(42));
    assert_eq!(node.graph().edges(), expected_edges(&node, Technique::Gaussian));
}

#[test]
fn test_apply_rejects_out_of_range() {
    let config = SharpenConfig {
        technique: Technique::Box,
        box_radius: 12,
        ..Default::default()
    };
    let mut node = attached_sharpen();
    assert!(matches!(
        config.apply_to(&mut node),
        Err(DeluxeError::ParameterOutOfRange { .. })
    ));
    assert_eq!(node.property("box").unwrap(), &Value::Int(3));
    assert_eq!(node.graph().edges(), expected_edges(&node, Technique::Median));
}
