use crate::protocol::Protocol;
use crate::{Block, BLOCK_BYTES, SAMPLE_SCALE};

/// Split `data` into consecutive blocks, zero-padding the final partial block
pub fn split_blocks(data: &[u8]) -> Vec<Block> {
    data.chunks(BLOCK_BYTES)
        .map(|chunk| {
            let mut block = [0u8; BLOCK_BYTES];
            block[..chunk.len()].copy_from_slice(chunk);
            block
        })
        .collect()
}

/// Number of whole block strides contained in `sample_count` samples
pub fn block_count(sample_count: usize, protocol: &Protocol) -> usize {
    match protocol.block_stride() {
        0 => 0,
        stride => sample_count / stride,
    }
}

/// Tone windows of a received waveform, one per complete block stride
///
/// Window `i` covers `[i * stride, i * stride + tone)`. Samples after the last
/// complete stride are ignored.
pub fn tone_windows<'a>(
    samples: &'a [i16],
    protocol: &Protocol,
) -> impl Iterator<Item = &'a [i16]> + 'a {
    let stride = protocol.block_stride();
    let tone = protocol.tone_samples().min(stride);
    (0..block_count(samples.len(), protocol)).map(move |i| {
        let pos = i * stride;
        &samples[pos..pos + tone]
    })
}

/// Scale i16 samples into [-1, 1) for spectral analysis
pub fn normalize_window(window: &[i16]) -> Vec<f64> {
    window.iter().map(|&s| s as f64 / SAMPLE_SCALE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exact_multiple() {
        let blocks = split_blocks(b"abcdefgh");
        assert_eq!(blocks, vec![*b"abcd", *b"efgh"]);
    }

    #[test]
    fn test_split_pads_final_block() {
        let blocks = split_blocks(&[1, 2, 3, 4, 5]);
        assert_eq!(blocks, vec![[1, 2, 3, 4], [5, 0, 0, 0]]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_blocks(&[]).is_empty());
    }

    #[test]
    fn test_windows_follow_stride() {
        let protocol = Protocol::default();
        let stride = protocol.block_stride();
        let samples: Vec<i16> = (0..stride * 3).map(|i| (i % 1000) as i16).collect();

        let windows: Vec<&[i16]> = tone_windows(&samples, &protocol).collect();
        assert_eq!(windows.len(), 3);
        for (i, window) in windows.iter().enumerate() {
            assert_eq!(window.len(), protocol.tone_samples());
            assert_eq!(window[0], ((i * stride) % 1000) as i16);
        }
    }

    #[test]
    fn test_trailing_partial_block_is_dropped() {
        let protocol = Protocol::default();
        let stride = protocol.block_stride();
        let samples = vec![0i16; stride * 2 + stride - 1];
        assert_eq!(tone_windows(&samples, &protocol).count(), 2);
        assert_eq!(block_count(stride - 1, &protocol), 0);
        assert_eq!(tone_windows(&[], &protocol).count(), 0);
    }

    #[test]
    fn test_normalize_window() {
        let normalized = normalize_window(&[0, 16384, -32768, 32767]);
        assert_eq!(normalized[0], 0.0);
        assert_eq!(normalized[1], 0.5);
        assert_eq!(normalized[2], -1.0);
        assert!(normalized[3] < 1.0);
    }
}
