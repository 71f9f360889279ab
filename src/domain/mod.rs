// Domain layer: core models, record rules and ports (interfaces). No I/O lives here.

pub mod model;
pub mod ports;
pub mod validation;
