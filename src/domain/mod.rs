// Domain layer: survey records, aggregate tables and the ports the pipeline talks through.

pub mod model;
pub mod ports;
