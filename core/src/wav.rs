//! Minimal RIFF/WAVE codec for mono 16-bit PCM
//!
//! Writing goes through `hound`. The reader walks chunks by ID and length,
//! takes the format fields from `fmt `, and stops at the first `data` chunk.
//! Payload bytes are always read as i16 pairs, whatever bit depth the header
//! declares, which is why reading does not use `hound`.

use crate::error::{FfttError, Result};
use crate::SAMPLE_RATE;
use hound::{SampleFormat, WavSpec, WavWriter};
use log::{debug, warn};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

const HEADER_LEN: u32 = 44;
const FMT_CHUNK_LEN: u32 = 16;
const MONO: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: u16 = BITS_PER_SAMPLE / 8;

/// Decoded container contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    pub samples: Vec<i16>,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl Waveform {
    /// Mono 16-bit waveform at `sample_rate`
    pub fn mono(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: MONO,
            sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }
}

fn wav_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: MONO,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// RIFF size field is a u32 counting everything after the first 8 bytes
fn check_payload_len(samples: &[i16]) -> Result<()> {
    samples
        .len()
        .checked_mul(BYTES_PER_SAMPLE as usize)
        .and_then(|len| u32::try_from(len).ok())
        .and_then(|len| len.checked_add(HEADER_LEN - 8))
        .map(|_| ())
        .ok_or(FfttError::PayloadTooLarge(samples.len()))
}

/// Serialize `samples` as a mono 16-bit PCM WAV stream
///
/// 16-bit mono output from hound is the canonical 44-byte header followed by
/// little-endian samples.
pub fn write_wav<W: Write + Seek>(writer: W, samples: &[i16], sample_rate: u32) -> Result<()> {
    check_payload_len(samples)?;

    let mut writer = WavWriter::new(writer, wav_spec(sample_rate))?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}

/// Serialize into an in-memory byte vector
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::with_capacity(
        HEADER_LEN as usize + samples.len() * BYTES_PER_SAMPLE as usize,
    ));
    write_wav(&mut cursor, samples, sample_rate)?;
    Ok(cursor.into_inner())
}

/// Create (or truncate) `path` and write a WAV file into it
pub fn write_wav_file<P: AsRef<Path>>(path: P, samples: &[i16], sample_rate: u32) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_wav(BufWriter::new(file), samples, sample_rate)?;
    debug!(
        "Wrote {} samples at {} Hz to {}",
        samples.len(),
        sample_rate,
        path.as_ref().display()
    );
    Ok(())
}

/// Parse a WAV stream, returning the samples of its first `data` chunk
pub fn read_wav<R: Read>(reader: &mut R) -> Result<Waveform> {
    let riff = read_tag(reader)?.ok_or_else(|| malformed("stream is empty"))?;
    if &riff != b"RIFF" {
        return Err(malformed("missing RIFF tag"));
    }
    read_u32(reader)?.ok_or_else(|| malformed("truncated RIFF header"))?;
    let wave = read_tag(reader)?.ok_or_else(|| malformed("truncated RIFF header"))?;
    if &wave != b"WAVE" {
        return Err(malformed("missing WAVE tag"));
    }

    let mut channels = MONO;
    let mut sample_rate = SAMPLE_RATE;
    let mut bits_per_sample = BITS_PER_SAMPLE;
    let mut payload = None;

    loop {
        let Some(chunk_id) = read_tag(reader)? else {
            break;
        };
        let Some(chunk_len) = read_u32(reader)? else {
            break;
        };

        match &chunk_id {
            b"fmt " => {
                if chunk_len < FMT_CHUNK_LEN {
                    return Err(malformed(&format!(
                        "fmt chunk is {} bytes, expected at least {}",
                        chunk_len, FMT_CHUNK_LEN
                    )));
                }
                let mut fmt = [0u8; FMT_CHUNK_LEN as usize];
                reader
                    .read_exact(&mut fmt)
                    .map_err(|_| malformed("truncated fmt chunk"))?;
                // audio format (0..2), byte rate (8..12) and block align (12..14) are not needed
                channels = u16::from_le_bytes([fmt[2], fmt[3]]);
                sample_rate = u32::from_le_bytes([fmt[4], fmt[5], fmt[6], fmt[7]]);
                bits_per_sample = u16::from_le_bytes([fmt[14], fmt[15]]);
                skip(reader, (chunk_len - FMT_CHUNK_LEN) as u64)?;
            }
            b"data" => {
                let mut bytes = Vec::new();
                reader.by_ref().take(chunk_len as u64).read_to_end(&mut bytes)?;
                if bytes.len() < chunk_len as usize {
                    warn!(
                        "data chunk declares {} bytes but only {} are present",
                        chunk_len,
                        bytes.len()
                    );
                }
                payload = Some(bytes);
                break;
            }
            other => {
                debug!(
                    "Skipping chunk '{}' ({} bytes)",
                    String::from_utf8_lossy(other),
                    chunk_len
                );
                skip(reader, chunk_len as u64)?;
            }
        }
    }

    let payload = payload.ok_or_else(|| malformed("no data chunk found"))?;

    if bits_per_sample != BITS_PER_SAMPLE {
        warn!(
            "WAV declares {} bits per sample; payload is read as 16-bit anyway",
            bits_per_sample
        );
    }

    // A trailing odd byte cannot form a sample and is dropped
    let samples = payload
        .chunks_exact(BYTES_PER_SAMPLE as usize)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();

    Ok(Waveform {
        samples,
        channels,
        sample_rate,
        bits_per_sample,
    })
}

/// Parse an in-memory WAV image
pub fn decode_wav(bytes: &[u8]) -> Result<Waveform> {
    let mut cursor = bytes;
    read_wav(&mut cursor)
}

pub fn read_wav_file<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);
    let waveform = read_wav(&mut reader)?;
    debug!(
        "Read {} samples ({} ch, {} Hz, {} bits) from {}",
        waveform.samples.len(),
        waveform.channels,
        waveform.sample_rate,
        waveform.bits_per_sample,
        path.as_ref().display()
    );
    Ok(waveform)
}

fn malformed(reason: &str) -> FfttError {
    FfttError::MalformedContainer(reason.to_string())
}

/// Next 4 bytes of the stream, or `None` once fewer than 4 remain
fn read_tag<R: Read>(reader: &mut R) -> Result<Option<[u8; 4]>> {
    let mut tag = [0u8; 4];
    match reader.read_exact(&mut tag) {
        Ok(()) => Ok(Some(tag)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_u32<R: Read>(reader: &mut R) -> Result<Option<u32>> {
    Ok(read_tag(reader)?.map(u32::from_le_bytes))
}

fn skip<R: Read>(reader: &mut R, len: u64) -> Result<()> {
    io::copy(&mut reader.by_ref().take(len), &mut io::sink())?;
    Ok(())
}
