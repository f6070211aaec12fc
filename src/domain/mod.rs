// Domain layer: core models and ports (interfaces).

pub mod columns;
pub mod model;
pub mod ports;
