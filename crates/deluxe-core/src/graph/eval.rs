use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{DeluxeError, Result};
use crate::frame::Image;
use crate::ops::{PadInputs, INPUT_PAD};

use super::progress::{NoOpReporter, ProgressReporter};
use super::{Graph, NodeId, NodeKind};

/// Per-run evaluation state. Each node runs at most once per run.
struct Evaluation<'g> {
    graph: &'g Graph,
    reporter: &'g dyn ProgressReporter,
    memo: HashMap<NodeId, Image>,
    done: usize,
}

impl Graph {
    /// Pull the image produced by `node`.
    pub fn process(&self, node: NodeId) -> Result<Image> {
        self.process_reported(node, &NoOpReporter)
    }

    /// Pull the image produced by `node`, reporting per-node progress.
    pub fn process_reported(&self, node: NodeId, reporter: &dyn ProgressReporter) -> Result<Image> {
        let total = self
            .reachable_from(node)
            .into_iter()
            .filter(|id| {
                self.nodes
                    .get(id.0)
                    .is_some_and(|n| matches!(n.kind, NodeKind::Operation(_)))
            })
            .count();
        info!(target = %node, operations = total, "Evaluating graph");
        reporter.begin(total);

        let mut run = Evaluation {
            graph: self,
            reporter,
            memo: HashMap::new(),
            done: 0,
        };
        run.evaluate(node)?;
        reporter.finish();

        run.memo
            .remove(&node)
            .ok_or(DeluxeError::UnknownNode(node.0))
    }
}

impl Evaluation<'_> {
    fn evaluate(&mut self, id: NodeId) -> Result<()> {
        if self.memo.contains_key(&id) {
            return Ok(());
        }
        let graph = self.graph;
        let node = graph.node(id)?;

        let image = match &node.kind {
            NodeKind::Input(image) => image.clone().ok_or(DeluxeError::NoSource)?,
            NodeKind::Output => {
                let source = self.required_source(id, INPUT_PAD)?;
                self.evaluate(source)?;
                self.memo[&source].clone()
            }
            NodeKind::Operation(op) => {
                let mut sources = Vec::with_capacity(op.input_pads().len());
                for &pad in op.input_pads() {
                    match graph.source_of(id, pad) {
                        Some(source) => {
                            self.evaluate(source)?;
                            sources.push((pad, source));
                        }
                        None if pad == INPUT_PAD => {
                            return Err(self.missing_input(id, pad));
                        }
                        None => {}
                    }
                }

                self.reporter.node_started(&node.label);
                let start = Instant::now();
                let output = {
                    let mut inputs = PadInputs::new();
                    for &(pad, source) in &sources {
                        inputs.insert(pad, &self.memo[&source]);
                    }
                    op.process(&inputs)?
                };
                debug!(
                    node = %id,
                    label = %node.label,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Node processed"
                );
                self.done += 1;
                self.reporter.advance(self.done);
                output
            }
        };

        self.memo.insert(id, image);
        Ok(())
    }

    fn required_source(&self, id: NodeId, pad: &'static str) -> Result<NodeId> {
        self.graph
            .source_of(id, pad)
            .ok_or_else(|| self.missing_input(id, pad))
    }

    fn missing_input(&self, id: NodeId, pad: &str) -> DeluxeError {
        DeluxeError::MissingInput {
            node: id.0,
            operation: self
                .graph
                .kind_name(id)
                .unwrap_or("unknown")
                .to_string(),
            pad: pad.to_string(),
        }
    }
}
