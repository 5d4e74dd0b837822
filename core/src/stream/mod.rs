//! stream: demand-driven bridge from a frame-push decoder to a byte-pull encoder.
//!
//! Layers, leaves first:
//! - `queue`: FIFO byte buffer owned by the adapter
//! - `serializer`: strips row padding and appends a frame's planes to the queue
//! - `pull`: the `ByteSource` contract, decoding more frames only when a read needs them
//! - `io`: normalized input sources for file- or memory-backed collaborators

pub mod queue;
pub mod serializer;
pub mod pull;
pub mod io;

pub use queue::{ByteQueue, QueueError};
pub use serializer::PlaneSerializer;
pub use pull::{ByteSource, Pull, PullAdapter};
pub use io::{InputSource, open_input, read_exact_or_eof};
