use crate::error::Result;
use crate::framing::split_blocks;
use crate::modulator::BlockModulator;
use crate::protocol::Protocol;
use crate::wav::write_wav;
use log::debug;
use std::io::{Seek, Write};

/// Encoder - turns binary data into a tone-burst waveform
///
/// Output layout: one fixed-length segment (tone + silence) per 4-byte block, no
/// preamble, no delimiters. An empty input encodes to an empty waveform.
pub struct Encoder {
    modulator: BlockModulator,
}

impl Encoder {
    pub fn new(protocol: Protocol) -> Result<Self> {
        protocol.validate()?;
        Ok(Self {
            modulator: BlockModulator::new(protocol),
        })
    }

    pub fn protocol(&self) -> &Protocol {
        self.modulator.protocol()
    }

    /// Encode binary data into 16-bit samples
    pub fn encode(&mut self, data: &[u8]) -> Vec<i16> {
        let blocks = split_blocks(data);
        debug!(
            "Encoding {} bytes as {} blocks of {} samples",
            data.len(),
            blocks.len(),
            self.protocol().block_samples()
        );
        self.modulator.modulate(&blocks)
    }

    /// Encode binary data straight into a WAV stream
    ///
    /// The writer must be seekable so the header lengths can be patched once
    /// all samples are written.
    pub fn encode_to_wav<W: Write + Seek>(&mut self, data: &[u8], writer: &mut W) -> Result<usize> {
        let samples = self.encode(data);
        write_wav(writer, &samples, self.protocol().sample_rate)?;
        Ok(samples.len())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            modulator: BlockModulator::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::decode_wav;
    use crate::ProtocolVersion;
    use std::io::Cursor;

    #[test]
    fn test_rejects_invalid_protocol() {
        assert!(Encoder::new(Protocol::with_freq_step(0.0)).is_err());
    }

    #[test]
    fn test_empty_input_encodes_to_nothing() {
        let mut encoder = Encoder::default();
        assert!(encoder.encode(&[]).is_empty());
    }

    #[test]
    fn test_length_rounds_up_to_whole_blocks() {
        let mut encoder = Encoder::new(Protocol::new(ProtocolVersion::V1)).unwrap();
        assert_eq!(encoder.encode(&[1]).len(), 6615);
        assert_eq!(encoder.encode(&[1, 2, 3, 4]).len(), 6615);
        assert_eq!(encoder.encode(&[1, 2, 3, 4, 5]).len(), 2 * 6615);
    }

    #[test]
    fn test_encode_to_wav() {
        let mut encoder = Encoder::default();
        let mut cursor = Cursor::new(Vec::new());
        let sample_count = encoder.encode_to_wav(b"Hi!", &mut cursor).unwrap();
        assert_eq!(sample_count, 6615);

        let bytes = cursor.into_inner();
        assert_eq!(bytes.len(), 44 + 2 * 6615);

        let waveform = decode_wav(&bytes).unwrap();
        assert_eq!(waveform.samples, encoder.encode(b"Hi!"));
    }
}
