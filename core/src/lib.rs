//! Data-over-sound modem: files become sequences of multi-tone bursts
//!
//! Every 4-byte block is sent as one tone burst where each set bit adds a sine
//! at its own frequency, followed by a fixed silence gap. The receiver slices the
//! waveform at a fixed stride and detects set bits by FFT magnitude thresholding.

pub mod error;
pub mod protocol;
pub mod wav;
pub mod modulator;
pub mod demodulator;
pub mod framing;
pub mod encoder;
pub mod decoder;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{FfttError, Result};
pub use protocol::{Protocol, ProtocolVersion};
pub use wav::Waveform;

// Wire constants
pub const SAMPLE_RATE: u32 = 44100;
pub const TONE_DURATION_SECS: f64 = 0.1; // 100 ms burst
pub const SILENCE_DURATION_SECS: f64 = 0.05; // 50 ms gap
pub const BASE_FREQUENCY: f64 = 500.0; // Hz, bit 0

// Bit spacing per protocol version
pub const FREQ_STEP_V1: f64 = 20.0; // Hz
pub const FREQ_STEP_V2: f64 = 75.0; // Hz

// Block configuration
pub const BLOCK_BYTES: usize = 4;
pub const BITS_PER_BLOCK: usize = BLOCK_BYTES * 8; // 32

/// Raw (unnormalized) FFT magnitude above which a bit counts as set
pub const DETECTION_THRESHOLD: f64 = 50.0;

/// Full-scale value used for tone normalization
pub const PEAK_AMPLITUDE: f64 = i16::MAX as f64; // 32767

/// Divisor mapping i16 samples into [-1, 1) before analysis
pub const SAMPLE_SCALE: f64 = 32768.0;

/// One transmission unit
pub type Block = [u8; BLOCK_BYTES];
