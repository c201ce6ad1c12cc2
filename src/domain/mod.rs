// Domain layer: relay models and the traits the relay is built against.

pub mod model;
pub mod ports;
