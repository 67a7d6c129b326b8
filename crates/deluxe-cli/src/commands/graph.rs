use anyhow::{Context, Result};
use clap::Args;
use deluxe_core::meta::sharpen::{SharpenDeluxe, Technique};
use deluxe_core::meta::MetaNode;
use deluxe_core::property::Value;

use super::TechniqueArg;

#[derive(Args)]
pub struct GraphArgs {
    /// Technique to wire
    #[arg(long, value_enum, default_value = "median")]
    pub technique: TechniqueArg,
}

pub fn run(args: &GraphArgs) -> Result<()> {
    let technique = Technique::from(args.technique);
    let mut node = MetaNode::attached(SharpenDeluxe::new())?;
    node.set_property("type", Value::from(technique.nick()))
        .context("Failed to select technique")?;

    println!("{technique}:");
    for line in node.graph().describe().lines() {
        println!("  {line}");
    }

    let graph = node.graph();
    let live = graph.reachable_from(node.output());
    let idle: Vec<&str> = node
        .operation()
        .techniques()
        .into_iter()
        .flat_map(|nodes| nodes.iter())
        .filter(|(_, id)| !live.contains(id))
        .filter_map(|(_, id)| graph.label(id).ok())
        .collect();
    println!("Idle: {}", idle.join(", "));

    Ok(())
}
