pub mod consts;
pub mod error;
pub mod filters;
pub mod frame;
pub mod graph;
pub mod io;
pub mod meta;
pub mod ops;
pub mod property;
