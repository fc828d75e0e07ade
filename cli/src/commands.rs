use crate::config::AppConfig;
use crate::error::Result;
use fftt_core::{wav, Decoder, Encoder, FfttError, ProtocolVersion, BLOCK_BYTES};
use log::info;
use std::path::Path;

fn ensure_input_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(FfttError::MissingInputFile(path.to_path_buf()).into());
    }
    Ok(())
}

pub fn encode_command(input_path: &Path, output_path: &Path, config: &AppConfig) -> Result<()> {
    ensure_input_exists(input_path)?;

    // Read input binary file
    let data = std::fs::read(input_path)?;
    println!("Read {} bytes from {}", data.len(), input_path.display());

    let mut encoder = Encoder::new(config.protocol())?;
    let samples = encoder.encode(&data);
    println!(
        "Encoded {} blocks to {} audio samples (protocol {})",
        data.len().div_ceil(BLOCK_BYTES),
        samples.len(),
        ProtocolVersion::from(config.protocol)
    );

    wav::write_wav_file(output_path, &samples, encoder.protocol().sample_rate)?;
    info!(
        "Encoded {} -> {} ({:.2}s of audio)",
        input_path.display(),
        output_path.display(),
        samples.len() as f64 / encoder.protocol().sample_rate as f64
    );
    println!("Encoded to {}", output_path.display());

    Ok(())
}

pub fn decode_command(input_path: &Path, output_path: &Path, config: &AppConfig) -> Result<()> {
    ensure_input_exists(input_path)?;

    let waveform = wav::read_wav_file(input_path)?;
    println!(
        "Read WAV: {} Hz, {} channels, {} bits, {} samples ({:.2}s)",
        waveform.sample_rate,
        waveform.channels,
        waveform.bits_per_sample,
        waveform.samples.len(),
        waveform.duration_secs()
    );

    let mut decoder = Decoder::new(config.protocol())?;
    let data = decoder.decode_waveform(&waveform);
    println!("Decoded {} bytes", data.len());

    std::fs::write(output_path, &data)?;
    info!("Decoded {} -> {}", input_path.display(), output_path.display());
    println!("Decoded to {}", output_path.display());

    Ok(())
}
