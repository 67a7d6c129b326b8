//! A small node graph: an arena of nodes joined by named-pad edges.
//!
//! Every node produces a single `output` pad. Consumers name the input pad
//! an edge lands on, and each input pad has at most one source, so
//! connecting a new source to a pad replaces whatever fed it before.

mod eval;
mod progress;

pub use progress::ProgressReporter;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::trace;

use crate::error::{DeluxeError, Result};
use crate::frame::Image;
use crate::ops::{create_operation, Operation, INPUT_PAD, OUTPUT_PAD};
use crate::property::Value;

/// Index of a node in its [`Graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
enum NodeKind {
    /// External input. Holds the image fed in from outside.
    Input(Option<Image>),
    /// External output. Passes through whatever is on its `input` pad.
    Output,
    Operation(Box<dyn Operation>),
}

#[derive(Debug)]
struct Node {
    label: String,
    kind: NodeKind,
}

impl Node {
    fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Input(_) => "input",
            NodeKind::Output => "output",
            NodeKind::Operation(op) => op.name(),
        }
    }

    fn input_pads(&self) -> &'static [&'static str] {
        match &self.kind {
            NodeKind::Input(_) => &[],
            NodeKind::Output => &[INPUT_PAD],
            NodeKind::Operation(op) => op.input_pads(),
        }
    }
}

/// One connection, `source.output -> sink.sink_pad`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Edge {
    pub source: NodeId,
    pub sink: NodeId,
    pub sink_pad: &'static str,
}

#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    /// (consumer, input pad) -> producer
    edges: BTreeMap<(NodeId, &'static str), NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create an operation node by registry name and apply `params` in order.
    pub fn add_node(&mut self, operation: &str, params: &[(&str, Value)]) -> Result<NodeId> {
        let mut op = create_operation(operation)?;
        for (name, value) in params {
            op.set(name, value.clone())?;
        }
        Ok(self.push(op.name().to_string(), NodeKind::Operation(op)))
    }

    pub fn add_input(&mut self) -> NodeId {
        self.push("input".to_string(), NodeKind::Input(None))
    }

    pub fn add_output(&mut self) -> NodeId {
        self.push("output".to_string(), NodeKind::Output)
    }

    fn push(&mut self, label: String, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { label, kind });
        trace!(node = %id, label = %self.nodes[id.0].label, "node added");
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(DeluxeError::UnknownNode(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(DeluxeError::UnknownNode(id.0))
    }

    /// Human-readable name used by [`Graph::describe`] and progress output.
    pub fn label(&self, id: NodeId) -> Result<&str> {
        Ok(self.node(id)?.label.as_str())
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.label = label.into();
        Ok(())
    }

    /// Registry name of an operation node, or `input`/`output` for proxies.
    pub fn kind_name(&self, id: NodeId) -> Result<&'static str> {
        Ok(self.node(id)?.kind_name())
    }

    pub fn operation(&self, id: NodeId) -> Result<&dyn Operation> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Operation(op) => Ok(op.as_ref()),
            _ => Err(DeluxeError::UnknownOperation(node.kind_name().to_string())),
        }
    }

    fn operation_mut(&mut self, id: NodeId) -> Result<&mut Box<dyn Operation>> {
        let node = self.node_mut(id)?;
        let name = node.kind_name();
        match &mut node.kind {
            NodeKind::Operation(op) => Ok(op),
            _ => Err(DeluxeError::UnknownOperation(name.to_string())),
        }
    }

    pub fn set_param(&mut self, id: NodeId, name: &str, value: Value) -> Result<Value> {
        let stored = self.operation_mut(id)?.set(name, value)?;
        trace!(node = %id, name, value = %stored, "parameter set");
        Ok(stored)
    }

    pub fn param(&self, id: NodeId, name: &str) -> Result<&Value> {
        let op = self.operation(id)?;
        op.get(name).ok_or_else(|| DeluxeError::UnknownParameter {
            operation: op.name().to_string(),
            name: name.to_string(),
        })
    }

    /// Feed an image into an input proxy.
    pub fn set_source(&mut self, id: NodeId, image: Image) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Input(slot) => {
                *slot = Some(image);
                Ok(())
            }
            _ => Err(DeluxeError::NotAnInput(id.0)),
        }
    }

    /// Drop the image held by an input proxy.
    pub fn clear_source(&mut self, id: NodeId) -> Result<()> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Input(slot) => {
                *slot = None;
                Ok(())
            }
            _ => Err(DeluxeError::NotAnInput(id.0)),
        }
    }

    fn sink_pad(&self, id: NodeId, pad: &str) -> Result<&'static str> {
        let node = self.node(id)?;
        node.input_pads()
            .iter()
            .copied()
            .find(|p| *p == pad)
            .ok_or_else(|| DeluxeError::UnknownPad {
                node: id.0,
                operation: node.kind_name().to_string(),
                pad: pad.to_string(),
            })
    }

    fn check_source_pad(&self, id: NodeId, pad: &str) -> Result<()> {
        let node = self.node(id)?;
        if pad == OUTPUT_PAD && !matches!(node.kind, NodeKind::Output) {
            Ok(())
        } else {
            Err(DeluxeError::UnknownPad {
                node: id.0,
                operation: node.kind_name().to_string(),
                pad: pad.to_string(),
            })
        }
    }

    /// Connect `source.source_pad` to `sink.sink_pad`, replacing any edge
    /// already landing on that input pad.
    pub fn connect(
        &mut self,
        source: NodeId,
        source_pad: &str,
        sink: NodeId,
        sink_pad: &str,
    ) -> Result<()> {
        self.check_source_pad(source, source_pad)?;
        let sink_pad = self.sink_pad(sink, sink_pad)?;
        if self.upstream_of(source).contains(&sink) {
            return Err(DeluxeError::Cycle {
                source_node: source.0,
                sink: sink.0,
            });
        }
        let previous = self.edges.insert((sink, sink_pad), source);
        trace!(%source, %sink, pad = sink_pad, ?previous, "connected");
        Ok(())
    }

    /// Chain nodes `output -> input` in the order given.
    pub fn link_many(&mut self, nodes: &[NodeId]) -> Result<()> {
        for pair in nodes.windows(2) {
            self.connect(pair[0], OUTPUT_PAD, pair[1], INPUT_PAD)?;
        }
        Ok(())
    }

    /// Remove whatever feeds `sink.sink_pad`, returning the old source.
    pub fn disconnect(&mut self, sink: NodeId, sink_pad: &str) -> Result<Option<NodeId>> {
        let sink_pad = self.sink_pad(sink, sink_pad)?;
        Ok(self.edges.remove(&(sink, sink_pad)))
    }

    pub fn source_of(&self, sink: NodeId, sink_pad: &str) -> Option<NodeId> {
        // Narrow the key lifetime so a borrowed pad name can be looked up.
        let edges: &BTreeMap<(NodeId, &str), NodeId> = &self.edges;
        edges.get(&(sink, sink_pad)).copied()
    }

    /// All edges, ordered by consumer then pad.
    pub fn edges(&self) -> Vec<Edge> {
        self.edges
            .iter()
            .map(|(&(sink, sink_pad), &source)| Edge {
                source,
                sink,
                sink_pad,
            })
            .collect()
    }

    /// `node` and every node it (transitively) pulls pixels from.
    pub fn reachable_from(&self, node: NodeId) -> BTreeSet<NodeId> {
        self.upstream_of(node)
    }

    fn upstream_of(&self, node: NodeId) -> BTreeSet<NodeId> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            stack.extend(
                self.edges
                    .iter()
                    .filter(|((sink, _), _)| *sink == current)
                    .map(|(_, source)| *source),
            );
        }
        seen
    }

    /// One line per edge, `source.output -> sink.pad`, using node labels.
    pub fn describe(&self) -> String {
        self.edges()
            .iter()
            .map(|edge| {
                let source = self.label(edge.source).unwrap_or("?");
                let sink = self.label(edge.sink).unwrap_or("?");
                format!("{source}.{OUTPUT_PAD} -> {sink}.{}", edge.sink_pad)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::AUX_PAD;

    #[test]
    fn reconnecting_a_pad_replaces_the_edge() {
        let mut graph = Graph::new();
        let input = graph.add_input();
        let a = graph.add_node("deluxe:box-blur", &[]).unwrap();
        let b = graph.add_node("deluxe:gaussian-blur", &[]).unwrap();
        let blend = graph.add_node("deluxe:layer-mode", &[]).unwrap();
        graph.connect(a, OUTPUT_PAD, blend, AUX_PAD).unwrap();
        graph.connect(b, OUTPUT_PAD, blend, AUX_PAD).unwrap();
        graph.connect(input, OUTPUT_PAD, blend, INPUT_PAD).unwrap();
        assert_eq!(graph.source_of(blend, AUX_PAD), Some(b));
        let pad = String::from("aux");
        assert_eq!(graph.source_of(blend, &pad), Some(b));
        assert_eq!(graph.source_of(a, INPUT_PAD), None);
        assert_eq!(graph.edges().len(), 2);
    }

    #[test]
    fn unknown_pad_is_rejected() {
        let mut graph = Graph::new();
        let input = graph.add_input();
        let blur = graph.add_node("deluxe:box-blur", &[]).unwrap();
        assert!(matches!(
            graph.connect(input, OUTPUT_PAD, blur, AUX_PAD),
            Err(DeluxeError::UnknownPad { .. })
        ));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut graph = Graph::new();
        let a = graph.add_node("deluxe:box-blur", &[]).unwrap();
        let b = graph.add_node("deluxe:box-blur", &[]).unwrap();
        graph.link_many(&[a, b]).unwrap();
        assert!(matches!(
            graph.connect(b, OUTPUT_PAD, a, INPUT_PAD),
            Err(DeluxeError::Cycle { .. })
        ));
    }

    #[test]
    fn initial_params_are_validated() {
        let mut graph = Graph::new();
        assert!(matches!(
            graph.add_node("deluxe:box-blur", &[("radius", Value::Int(-1))]),
            Err(DeluxeError::ParameterOutOfRange { .. })
        ));
        assert!(matches!(
            graph.add_node("deluxe:sharpen", &[]),
            Err(DeluxeError::UnknownOperation(_))
        ));
    }
}
