use crate::demodulator::SpectralDemodulator;
use crate::error::Result;
use crate::framing::{block_count, normalize_window, tone_windows};
use crate::protocol::Protocol;
use crate::wav::{read_wav, Waveform};
use crate::BLOCK_BYTES;
use log::{debug, warn};
use std::io::Read;

/// Decoder - recovers binary data from a tone-burst waveform
///
/// Windows are taken at a fixed stride from the first sample; there is no
/// synchronization search. Output length is always a multiple of 4 bytes.
pub struct Decoder {
    demodulator: SpectralDemodulator,
}

impl Decoder {
    pub fn new(protocol: Protocol) -> Result<Self> {
        protocol.validate()?;
        Ok(Self {
            demodulator: SpectralDemodulator::new(protocol),
        })
    }

    pub fn protocol(&self) -> &Protocol {
        self.demodulator.protocol()
    }

    /// Decode 16-bit samples back to binary data
    pub fn decode(&mut self, samples: &[i16]) -> Vec<u8> {
        let protocol = *self.protocol();
        let blocks = block_count(samples.len(), &protocol);
        let leftover = samples.len() - blocks * protocol.block_stride();
        if leftover > 0 {
            debug!("Ignoring {} trailing samples after the last full block", leftover);
        }

        let mut data = Vec::with_capacity(blocks * BLOCK_BYTES);
        for window in tone_windows(samples, &protocol) {
            let block = self.demodulator.demodulate_window(&normalize_window(window));
            data.extend_from_slice(&block);
        }

        debug!("Decoded {} blocks into {} bytes", blocks, data.len());
        data
    }

    /// Decode the samples of a parsed WAV container
    ///
    /// Channel count and sample rate mismatches are reported but not acted on: the
    /// samples are always framed with the protocol's own sample rate.
    pub fn decode_waveform(&mut self, waveform: &Waveform) -> Vec<u8> {
        if waveform.channels != 1 {
            warn!(
                "Waveform has {} channels; samples are decoded as a single mono stream",
                waveform.channels
            );
        }
        if waveform.sample_rate != self.protocol().sample_rate {
            warn!(
                "Waveform sample rate is {} Hz but the protocol expects {} Hz",
                waveform.sample_rate,
                self.protocol().sample_rate
            );
        }
        self.decode(&waveform.samples)
    }

    /// Parse a WAV stream and decode its samples
    pub fn decode_from_wav<R: Read>(&mut self, reader: &mut R) -> Result<Vec<u8>> {
        let waveform = read_wav(reader)?;
        Ok(self.decode_waveform(&waveform))
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            demodulator: SpectralDemodulator::default(),
        }
    }
}
