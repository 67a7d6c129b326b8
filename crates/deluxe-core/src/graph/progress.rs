/// Thread-safe progress reporting for graph evaluation.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// Evaluation is starting. `total_nodes` counts the operation nodes that
    /// will run.
    fn begin(&self, _total_nodes: usize) {}

    /// An operation node is about to run.
    fn node_started(&self, _label: &str) {}

    /// One more operation node has finished.
    fn advance(&self, _nodes_done: usize) {}

    /// Evaluation is finished.
    fn finish(&self) {}
}

/// No-op progress reporter, used when `process` delegates.
pub(crate) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
