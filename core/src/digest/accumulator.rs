//! digest/accumulator.rs
//! Running digest over encoder output, in emission order.
//!
//! A layer contributes the concatenation of its chunks; chunk boundaries do
//! not affect the result. `finalize` consumes the accumulator, so nothing can
//! be submitted after it.

use crate::digest::types::{Digest, DigestAlg, DigestState};
use crate::media::encoder::{EncodedLayer, EncodedLayerSet};

pub struct HashAccumulator {
    alg: DigestAlg,
    state: DigestState,
    bytes: u64,
}

impl HashAccumulator {
    /// Create a new accumulator.
    #[inline]
    pub fn new(alg: DigestAlg) -> Self {
        Self {
            alg,
            state: DigestState::new(alg),
            bytes: 0,
        }
    }

    pub fn alg(&self) -> DigestAlg {
        self.alg
    }

    /// Bytes folded in so far.
    pub fn bytes_hashed(&self) -> u64 {
        self.bytes
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
        self.bytes += data.len() as u64;
    }

    /// Feed one layer: every chunk in order, each at its full length.
    pub fn submit_layer(&mut self, layer: &EncodedLayer) {
        for chunk in layer.chunks() {
            self.update(chunk);
        }
    }

    /// Feed one encoder output unit, layer by layer.
    pub fn submit_layer_set(&mut self, set: &EncodedLayerSet) {
        for layer in &set.layers {
            self.submit_layer(layer);
        }
    }

    /// Finalize and return the digest.
    #[inline]
    pub fn finalize(self) -> Digest {
        Digest::from_state(self.alg, self.state)
    }
}
