use crate::protocol::Protocol;
use crate::{Block, BITS_PER_BLOCK, BLOCK_BYTES};
use rustfft::{num_complex::Complex, FftPlanner};

/// Spectral demodulator - recovers a block from one tone window
///
/// The window is zero-padded to the next power of two and run through an
/// unnormalized forward FFT. A bit counts as set when the magnitude of the bin
/// nearest below its frequency exceeds the protocol threshold. Detection is purely
/// additive: there is no margin or hysteresis around the threshold.
pub struct SpectralDemodulator {
    protocol: Protocol,
    fft_planner: FftPlanner<f64>,
}

impl SpectralDemodulator {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            fft_planner: FftPlanner::new(),
        }
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Transform length used for a window of `window_len` samples
    pub fn fft_size(window_len: usize) -> usize {
        window_len.next_power_of_two()
    }

    /// Magnitudes of the non-negative-frequency half of the padded spectrum
    ///
    /// `window` holds samples scaled to [-1, 1]. The result has `fft_size / 2` entries.
    pub fn magnitudes(&mut self, window: &[f64]) -> Vec<f64> {
        if window.is_empty() {
            return Vec::new();
        }

        let fft_size = Self::fft_size(window.len());
        let mut spectrum = vec![Complex::new(0.0, 0.0); fft_size];
        for (bin, &sample) in spectrum.iter_mut().zip(window.iter()) {
            *bin = Complex::new(sample, 0.0);
        }

        let fft = self.fft_planner.plan_fft_forward(fft_size);
        fft.process(&mut spectrum);

        spectrum[..fft_size / 2].iter().map(|c| c.norm()).collect()
    }

    /// Magnitude read for each of the 32 bit positions
    pub fn bit_magnitudes(&mut self, window: &[f64]) -> [f64; BITS_PER_BLOCK] {
        let fft_size = Self::fft_size(window.len());
        let magnitudes = self.magnitudes(window);

        let mut per_bit = [0.0f64; BITS_PER_BLOCK];
        for (bit, magnitude) in per_bit.iter_mut().enumerate() {
            let idx = self.protocol.bin_index(bit, fft_size);
            *magnitude = magnitudes.get(idx).copied().unwrap_or(0.0);
        }
        per_bit
    }

    /// Decode one tone window into a block
    pub fn demodulate_window(&mut self, window: &[f64]) -> Block {
        let threshold = self.protocol.threshold;
        let mut bytes = [0u8; BLOCK_BYTES];

        for (bit, &magnitude) in self.bit_magnitudes(window).iter().enumerate() {
            if magnitude > threshold {
                bytes[bit / 8] |= 1 << (bit % 8);
            }
        }

        bytes
    }
}

impl Default for SpectralDemodulator {
    fn default() -> Self {
        Self::new(Protocol::default())
    }
}
