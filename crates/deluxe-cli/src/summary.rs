use std::path::Path;

use console::Style;
use deluxe_core::frame::Image;
use deluxe_core::meta::config::SharpenConfig;
use deluxe_core::meta::sharpen::Technique;
use deluxe_core::ops::OperationInfo;
use deluxe_core::property::{PropertyKind, PropertySpec, Visibility};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_apply_summary(config: &SharpenConfig, input: &Path, output: &Path, image: &Image) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Sharpen Deluxe"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(14)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Image"),
        s.value.apply_to(format!(
            "{}x{}, {} channel(s), {}-bit",
            image.width(),
            image.height(),
            image.channel_count(),
            image.bit_depth()
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("High Pass"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Technique"),
        s.method.apply_to(config.technique)
    );
    let (name, value) = technique_setting(config);
    println!("    {:<12}{}", s.label.apply_to(name), s.value.apply_to(value));
    println!();

    match config.merge {
        Some(ref merge) => println!(
            "  {:<14}{}",
            s.header.apply_to("Grain Merge"),
            s.value.apply_to(format!("opacity {:.2}", merge.opacity))
        ),
        None => println!(
            "  {:<14}{}",
            s.header.apply_to("Grain Merge"),
            s.disabled.apply_to("off (saving high pass)")
        ),
    }
    println!();
}

/// The one tunable that matters for the selected technique.
fn technique_setting(config: &SharpenConfig) -> (&'static str, String) {
    match config.technique {
        Technique::Median => (
            "Radius",
            format!("{} ({})", config.median, config.median_shape),
        ),
        Technique::Denoise => ("Sigma", config.denoise.to_string()),
        Technique::Box => ("Radius", config.box_radius.to_string()),
        Technique::MeanCurvature => ("Iterations", config.mcb.to_string()),
        Technique::DomainSmooth => ("Edges", config.ds.to_string()),
        Technique::NoiseReduction => ("Iterations", config.nr.to_string()),
        Technique::Lens => ("Radius", config.lens.to_string()),
        Technique::Gaussian => ("Std dev", config.gaussian.to_string()),
    }
}

pub fn print_operation_keys(info: &OperationInfo) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(info.title));
    println!();
    println!("  {:<14}{}", s.label.apply_to("Name"), s.value.apply_to(info.name));
    if let Some(hash) = info.reference_hash {
        println!("  {:<14}{}", s.label.apply_to("Reference"), s.value.apply_to(hash));
    }
    if let Some(path) = info.menu_path {
        let label = info.menu_label.unwrap_or(info.title);
        println!(
            "  {:<14}{}",
            s.label.apply_to("Menu"),
            s.method.apply_to(format!("{path}/{label}"))
        );
    }
    println!("  {:<14}{}", s.label.apply_to("Description"), info.description);
    println!();
}

pub fn print_property_table(title: &str, specs: &[PropertySpec]) {
    let s = Styles::new();

    println!("  {}", s.header.apply_to(title));
    for spec in specs {
        println!(
            "    {:<14}{:<8}{}",
            s.value.apply_to(spec.name),
            s.label.apply_to(kind_name(&spec.kind)),
            spec.label
        );
        println!("    {:<22}{}", "", s.method.apply_to(domain(&spec.kind)));
        if let Some(hints) = ui_hints(spec) {
            println!("    {:<22}{}", "", s.label.apply_to(hints));
        }
        if let Visibility::When { .. } = spec.ui.visible {
            println!(
                "    {:<22}{}",
                "",
                s.disabled.apply_to(format!("visible: {}", spec.ui.visible))
            );
        }
    }
    println!();
}

fn kind_name(kind: &PropertyKind) -> &'static str {
    match kind {
        PropertyKind::Bool { .. } => "bool",
        PropertyKind::Int { .. } => "int",
        PropertyKind::Double { .. } => "double",
        PropertyKind::Enum { .. } => "enum",
    }
}

fn domain(kind: &PropertyKind) -> String {
    match kind {
        PropertyKind::Bool { default } => format!("default {default}"),
        PropertyKind::Int { default, min, max } => format!("default {default}, {min}..={max}"),
        PropertyKind::Double { default, min, max } => {
            format!("default {default}, {min}..={max}")
        }
        PropertyKind::Enum { default, values } => {
            let nicks: Vec<&str> = values.iter().map(|v| v.nick).collect();
            format!("default {default}, one of {}", nicks.join(" / "))
        }
    }
}

fn ui_hints(spec: &PropertySpec) -> Option<String> {
    let mut parts = Vec::new();
    if let Some((lo, hi)) = spec.ui.range {
        parts.push(format!("ui {lo}..{hi}"));
    }
    if let Some(gamma) = spec.ui.gamma {
        parts.push(format!("gamma {gamma}"));
    }
    if let Some(unit) = spec.ui.unit {
        parts.push(unit.to_string());
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}
