//! Meta-operations: nodes whose behaviour is a subgraph of other nodes.
//!
//! A [`MetaNode`] owns a private [`Graph`] with an input and an output proxy.
//! At attach time the wrapped [`MetaOperation`] creates its children through a
//! [`MetaContext`] and declares which of its own properties are redirected
//! onto child parameters. Every property write afterwards is forwarded along
//! those redirects and followed by a call to [`MetaOperation::update`], which
//! is free to rewire the subgraph.

pub mod config;
pub mod sharpen;

use std::fmt::Debug;

use tracing::{debug, info};

use crate::error::{DeluxeError, Result};
use crate::frame::Image;
use crate::graph::{Graph, NodeId, ProgressReporter};
use crate::ops::OperationInfo;
use crate::property::{PropertySpec, PropertyValues, Value};

/// A meta property forwarded onto one child parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub property: &'static str,
    pub node: NodeId,
    pub param: &'static str,
}

pub trait MetaOperation: Debug {
    fn info(&self) -> &'static OperationInfo;

    fn properties(&self) -> &'static [PropertySpec];

    /// Create the child nodes and register redirects. Called once.
    fn attach(&mut self, ctx: &mut MetaContext<'_>) -> Result<()>;

    /// Rewire the subgraph for the current property values. Must be
    /// idempotent.
    fn update(&self, graph: &mut Graph, values: &PropertyValues) -> Result<()>;
}

/// What a meta-operation sees while attaching.
pub struct MetaContext<'a> {
    graph: &'a mut Graph,
    redirects: &'a mut Vec<Redirect>,
    input: NodeId,
    output: NodeId,
}

impl MetaContext<'_> {
    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Create a labelled child node with initial parameters.
    pub fn new_child(
        &mut self,
        label: &str,
        operation: &str,
        params: &[(&str, Value)],
    ) -> Result<NodeId> {
        let id = self.graph.add_node(operation, params)?;
        self.graph.set_label(id, label)?;
        Ok(id)
    }

    /// Forward writes of meta property `property` to `node.param`. A property
    /// may be redirected to several child parameters.
    pub fn redirect(
        &mut self,
        property: &'static str,
        node: NodeId,
        param: &'static str,
    ) -> Result<()> {
        // Fail now rather than on the first write.
        self.graph.param(node, param)?;
        self.redirects.push(Redirect {
            property,
            node,
            param,
        });
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AttachState {
    Detached,
    Attached,
    /// `attach` failed part-way; the subgraph is unusable.
    Failed,
}

/// Host for a [`MetaOperation`]: owns its subgraph, property values and
/// redirect table.
#[derive(Debug)]
pub struct MetaNode<M: MetaOperation> {
    operation: M,
    graph: Graph,
    values: PropertyValues,
    redirects: Vec<Redirect>,
    input: NodeId,
    output: NodeId,
    state: AttachState,
}

impl<M: MetaOperation> MetaNode<M> {
    /// Wrap `operation` with default property values. Nothing is created in
    /// the subgraph until [`MetaNode::attach`].
    pub fn new(operation: M) -> Self {
        let mut graph = Graph::new();
        let input = graph.add_input();
        let output = graph.add_output();
        let info = operation.info();
        let values = PropertyValues::new(info.name, operation.properties());
        Self {
            operation,
            graph,
            values,
            redirects: Vec::new(),
            input,
            output,
            state: AttachState::Detached,
        }
    }

    /// `new` followed by `attach`.
    pub fn attached(operation: M) -> Result<Self> {
        let mut node = Self::new(operation);
        node.attach()?;
        Ok(node)
    }

    /// Build the subgraph, push current values through the redirects and
    /// wire it for the first time.
    pub fn attach(&mut self) -> Result<()> {
        if self.state != AttachState::Detached {
            return Err(DeluxeError::AlreadyAttached);
        }
        self.state = AttachState::Failed;

        let mut ctx = MetaContext {
            graph: &mut self.graph,
            redirects: &mut self.redirects,
            input: self.input,
            output: self.output,
        };
        self.operation.attach(&mut ctx)?;

        for redirect in &self.redirects {
            if let Some(value) = self.values.get(redirect.property) {
                self.graph
                    .set_param(redirect.node, redirect.param, value.clone())?;
            }
        }
        self.operation.update(&mut self.graph, &self.values)?;

        self.state = AttachState::Attached;
        info!(
            operation = self.operation.info().name,
            nodes = self.graph.len(),
            redirects = self.redirects.len(),
            "Meta operation attached"
        );
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        self.state == AttachState::Attached
    }

    fn require_attached(&self) -> Result<()> {
        match self.state {
            AttachState::Attached => Ok(()),
            _ => Err(DeluxeError::NotAttached),
        }
    }

    /// Validate and store a meta property. Once attached the value is also
    /// forwarded to every redirected child parameter and the subgraph is
    /// rewired. A rejected write changes nothing.
    pub fn set_property(&mut self, name: &str, value: Value) -> Result<Value> {
        let spec = self.values.spec(name)?;
        let stored = spec.validate(value)?;

        if self.is_attached() {
            for redirect in self.redirects.iter().filter(|r| r.property == spec.name) {
                self.graph
                    .set_param(redirect.node, redirect.param, stored.clone())?;
            }
        }
        self.values.set(spec.name, stored.clone())?;
        debug!(property = spec.name, value = %stored, "Meta property set");

        if self.is_attached() {
            self.update()?;
        }
        Ok(stored)
    }

    pub fn property(&self, name: &str) -> Result<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| DeluxeError::UnknownParameter {
                operation: self.operation.info().name.to_string(),
                name: name.to_string(),
            })
    }

    pub fn values(&self) -> &PropertyValues {
        &self.values
    }

    /// Re-derive the subgraph wiring from the current values.
    pub fn update(&mut self) -> Result<()> {
        self.require_attached()?;
        self.operation.update(&mut self.graph, &self.values)
    }

    /// Run the subgraph on `image`.
    pub fn process(&mut self, image: Image) -> Result<Image> {
        self.process_with(image, None)
    }

    pub fn process_reported(
        &mut self,
        image: Image,
        reporter: &dyn ProgressReporter,
    ) -> Result<Image> {
        self.process_with(image, Some(reporter))
    }

    fn process_with(
        &mut self,
        image: Image,
        reporter: Option<&dyn ProgressReporter>,
    ) -> Result<Image> {
        self.require_attached()?;
        let (height, width) = image.dim();
        if width == 0 || height == 0 {
            return Err(DeluxeError::InvalidDimensions { width, height });
        }
        self.graph.set_source(self.input, image)?;
        let result = match reporter {
            Some(reporter) => self.graph.process_reported(self.output, reporter),
            None => self.graph.process(self.output),
        };
        self.graph.clear_source(self.input)?;
        result
    }

    pub fn operation(&self) -> &M {
        &self.operation
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn redirects(&self) -> &[Redirect] {
        &self.redirects
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn output(&self) -> NodeId {
        self.output
    }
}
