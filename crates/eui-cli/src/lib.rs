//! CLI library components for the EUI mapping pipeline.

pub mod logging;
pub mod paths;
pub mod pipeline;
