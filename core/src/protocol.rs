use crate::error::{FfttError, Result};
use crate::{
    BASE_FREQUENCY, BITS_PER_BLOCK, DETECTION_THRESHOLD, FREQ_STEP_V1, FREQ_STEP_V2, SAMPLE_RATE,
    SILENCE_DURATION_SECS, TONE_DURATION_SECS,
};
use std::fmt;
use std::str::FromStr;

/// Known bit-spacing variants of the tone protocol
///
/// The two variants share every constant except the spacing between adjacent
/// bit frequencies. They are not interchangeable: a waveform encoded with one
/// decodes to wrong bits (without any error) under the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolVersion {
    /// 20 Hz spacing, bits span 500-1120 Hz
    V1,
    /// 75 Hz spacing, bits span 500-2825 Hz
    #[default]
    V2,
}

impl ProtocolVersion {
    pub fn freq_step(self) -> f64 {
        match self {
            ProtocolVersion::V1 => FREQ_STEP_V1,
            ProtocolVersion::V2 => FREQ_STEP_V2,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::V1 => write!(f, "v1"),
            ProtocolVersion::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = FfttError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ProtocolVersion::V1),
            "v2" | "2" => Ok(ProtocolVersion::V2),
            other => Err(FfttError::InvalidConfig(format!(
                "unknown protocol version '{}'",
                other
            ))),
        }
    }
}

/// Parameters shared out of band by encoder and decoder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Protocol {
    pub sample_rate: u32,
    pub tone_duration: f64,
    pub silence_duration: f64,
    pub base_freq: f64,
    pub freq_step: f64,
    pub threshold: f64,
}

impl Protocol {
    pub fn new(version: ProtocolVersion) -> Self {
        Self::with_freq_step(version.freq_step())
    }

    /// Standard constants with a caller-chosen bit spacing
    pub fn with_freq_step(freq_step: f64) -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            tone_duration: TONE_DURATION_SECS,
            silence_duration: SILENCE_DURATION_SECS,
            base_freq: BASE_FREQUENCY,
            freq_step,
            threshold: DETECTION_THRESHOLD,
        }
    }

    /// Frequency carrying `bit` (0 = LSB of the first byte)
    /// freq_hz = base_freq + bit * freq_step
    pub fn bit_frequency(&self, bit: usize) -> f64 {
        self.base_freq + bit as f64 * self.freq_step
    }

    /// Samples in one tone burst, truncated toward zero
    pub fn tone_samples(&self) -> usize {
        (self.sample_rate as f64 * self.tone_duration) as usize
    }

    /// Samples in one silence gap, truncated toward zero
    pub fn silence_samples(&self) -> usize {
        (self.sample_rate as f64 * self.silence_duration) as usize
    }

    /// Length of one encoded block segment (tone + silence)
    pub fn block_samples(&self) -> usize {
        self.tone_samples() + self.silence_samples()
    }

    /// Distance between consecutive tone windows on the receive side
    ///
    /// Truncates the summed duration rather than adding the two segment lengths;
    /// `validate` rejects parameter sets where the two disagree.
    pub fn block_stride(&self) -> usize {
        (self.sample_rate as f64 * (self.tone_duration + self.silence_duration)) as usize
    }

    /// FFT bin inspected for `bit` in a transform of `fft_size` points
    pub fn bin_index(&self, bit: usize, fft_size: usize) -> usize {
        (self.bit_frequency(bit) / self.sample_rate as f64 * fft_size as f64) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(FfttError::InvalidConfig("sample rate must be positive".into()));
        }
        if !(self.base_freq.is_finite() && self.base_freq > 0.0) {
            return Err(FfttError::InvalidConfig(format!(
                "base frequency must be positive, got {}",
                self.base_freq
            )));
        }
        if !(self.freq_step.is_finite() && self.freq_step > 0.0) {
            return Err(FfttError::InvalidConfig(format!(
                "frequency step must be positive, got {}",
                self.freq_step
            )));
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(FfttError::InvalidConfig(format!(
                "detection threshold must be non-negative, got {}",
                self.threshold
            )));
        }

        let nyquist = self.sample_rate as f64 / 2.0;
        let highest = self.bit_frequency(BITS_PER_BLOCK - 1);
        if highest >= nyquist {
            return Err(FfttError::InvalidConfig(format!(
                "highest bit frequency {} Hz is not below Nyquist ({} Hz)",
                highest, nyquist
            )));
        }

        if self.tone_samples() == 0 {
            return Err(FfttError::InvalidConfig("tone segment would be empty".into()));
        }
        if self.block_stride() != self.block_samples() {
            return Err(FfttError::InvalidConfig(format!(
                "receive stride {} does not match segment length {}",
                self.block_stride(),
                self.block_samples()
            )));
        }

        Ok(())
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Self::new(ProtocolVersion::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_lengths() {
        let protocol = Protocol::default();
        assert_eq!(protocol.tone_samples(), 4410);
        assert_eq!(protocol.silence_samples(), 2205);
        assert_eq!(protocol.block_samples(), 6615);
        assert_eq!(protocol.block_stride(), 6615);
    }

    #[test]
    fn test_bit_frequency() {
        let v1 = Protocol::new(ProtocolVersion::V1);
        assert_eq!(v1.bit_frequency(0), 500.0);
        assert_eq!(v1.bit_frequency(1), 520.0);
        assert_eq!(v1.bit_frequency(31), 1120.0);

        let v2 = Protocol::new(ProtocolVersion::V2);
        assert_eq!(v2.bit_frequency(31), 2825.0);
    }

    #[test]
    fn test_bin_index_truncates() {
        let v1 = Protocol::new(ProtocolVersion::V1);
        // 500 / 44100 * 8192 = 92.88...
        assert_eq!(v1.bin_index(0, 8192), 92);
        assert_eq!(v1.bin_index(1, 8192), 96);
        assert_eq!(v1.bin_index(31, 8192), 208);

        let v2 = Protocol::new(ProtocolVersion::V2);
        assert_eq!(v2.bin_index(1, 8192), 106);
        assert_eq!(v2.bin_index(31, 8192), 524);
    }

    #[test]
    fn test_default_versions_validate() {
        assert!(Protocol::new(ProtocolVersion::V1).validate().is_ok());
        assert!(Protocol::new(ProtocolVersion::V2).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_step() {
        assert!(Protocol::with_freq_step(0.0).validate().is_err());
        assert!(Protocol::with_freq_step(-20.0).validate().is_err());
        assert!(Protocol::with_freq_step(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_rejects_frequencies_above_nyquist() {
        // 500 + 31 * 800 = 25300 Hz > 22050 Hz
        let err = Protocol::with_freq_step(800.0).validate().unwrap_err();
        assert!(err.to_string().contains("Nyquist"));
    }

    #[test]
    fn test_rejects_empty_tone() {
        let mut protocol = Protocol::default();
        protocol.tone_duration = 0.0;
        assert!(protocol.validate().is_err());
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!("v1".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V1);
        assert_eq!("V2".parse::<ProtocolVersion>().unwrap(), ProtocolVersion::V2);
        assert!("v3".parse::<ProtocolVersion>().is_err());
        assert_eq!(ProtocolVersion::V1.to_string(), "v1");
    }
}
