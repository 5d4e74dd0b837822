//! digest: order-sensitive content digest over the encoder's output.

pub mod types;
pub mod accumulator;

pub use types::*;
pub use accumulator::*;
