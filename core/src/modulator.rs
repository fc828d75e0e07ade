use crate::protocol::Protocol;
use crate::{Block, BITS_PER_BLOCK, PEAK_AMPLITUDE};
use std::f64::consts::PI;

/// Whether bit `bit` of `block` is set
///
/// Bits are numbered byte-major: bit 0 is the LSB of byte 0, bit 8 the LSB of byte 1.
pub fn bit_is_set(block: &Block, bit: usize) -> bool {
    (block[bit / 8] >> (bit % 8)) & 1 == 1
}

/// Indices of all set bits, ascending
pub fn set_bits(block: &Block) -> impl Iterator<Item = usize> + '_ {
    (0..BITS_PER_BLOCK).filter(move |&bit| bit_is_set(block, bit))
}

/// Block modulator - turns one 4-byte block into a tone burst plus silence
///
/// Every set bit contributes a unit sine at its own frequency. The sum is scaled so
/// its largest excursion lands on full 16-bit scale, then truncated to i16.
pub struct BlockModulator {
    protocol: Protocol,
}

impl BlockModulator {
    pub fn new(protocol: Protocol) -> Self {
        Self { protocol }
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Tone burst for `block` without the trailing silence
    pub fn tone(&self, block: &Block) -> Vec<i16> {
        let tone_samples = self.protocol.tone_samples();
        let sample_rate = self.protocol.sample_rate as f64;
        let mut buffer = vec![0.0f64; tone_samples];

        for bit in set_bits(block) {
            let freq = self.protocol.bit_frequency(bit);
            for (s, sample) in buffer.iter_mut().enumerate() {
                *sample += (2.0 * PI * freq * s as f64 / sample_rate).sin();
            }
        }

        let peak = buffer.iter().fold(0.0f64, |max, &v| max.max(v.abs()));
        if peak > 0.0 {
            for sample in buffer.iter_mut() {
                *sample = *sample / peak * PEAK_AMPLITUDE;
            }
        }

        // `as` truncates toward zero; rounding here would change the wire format
        buffer.into_iter().map(|v| v as i16).collect()
    }

    /// Full block segment: tone burst followed by the silence gap
    pub fn modulate_block(&self, block: &Block) -> Vec<i16> {
        let mut segment = self.tone(block);
        segment.resize(self.protocol.block_samples(), 0);
        segment
    }

    /// Modulate consecutive blocks into one sample stream
    pub fn modulate(&self, blocks: &[Block]) -> Vec<i16> {
        let mut samples = Vec::with_capacity(blocks.len() * self.protocol.block_samples());
        for block in blocks {
            samples.extend_from_slice(&self.modulate_block(block));
        }
        samples
    }
}

impl Default for BlockModulator {
    fn default() -> Self {
        Self::new(Protocol::default())
    }
}
