use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeluxeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Operation {operation} has no parameter '{name}'")]
    UnknownParameter { operation: String, name: String },

    #[error("Parameter '{name}' expects {expected}, got {got}")]
    ParameterType {
        name: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Parameter '{name}' value {value} outside [{min}, {max}]")]
    ParameterOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("'{value}' is not a valid value for '{name}'")]
    UnknownEnumValue { name: String, value: String },

    #[error("Node {0} does not exist")]
    UnknownNode(usize),

    #[error("Node {node} ({operation}) has no pad '{pad}'")]
    UnknownPad {
        node: usize,
        operation: String,
        pad: String,
    },

    #[error("Node {node} ({operation}) has nothing connected to '{pad}'")]
    MissingInput {
        node: usize,
        operation: String,
        pad: String,
    },

    #[error("Connecting node {source_node} to node {sink} would create a cycle")]
    Cycle { source_node: usize, sink: usize },

    #[error("Node {0} is not an input proxy")]
    NotAnInput(usize),

    #[error("Input proxy has no image set")]
    NoSource,

    #[error("Meta operation is not attached")]
    NotAttached,

    #[error("Meta operation is already attached")]
    AlreadyAttached,

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Cannot blend a {main}-channel image with a {aux}-channel image")]
    ChannelMismatch { main: usize, aux: usize },
}

pub type Result<T> = std::result::Result<T, DeluxeError>;
