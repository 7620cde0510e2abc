//! Per-tile gzip compression.
//!
//! Every tile is compressed into its own complete gzip member so it can be
//! decompressed from its byte range alone. Both functions are pure and hold
//! no shared state, so they can run concurrently across tiles and images.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::CompressionError;

/// Compress one tile's raw bytes into a self-contained gzip member.
pub fn compress_tile(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let buffer = Vec::with_capacity(data.len() / 2 + 64);
    let mut encoder = GzEncoder::new(buffer, Compression::default());
    encoder.write_all(data).map_err(CompressionError::Encode)?;
    encoder.finish().map_err(CompressionError::Encode)
}

/// Decompress one gzip member produced by [`compress_tile`].
pub fn decompress_tile(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::with_capacity(data.len() * 2);
    decoder
        .read_to_end(&mut out)
        .map_err(CompressionError::Decode)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_has_gzip_magic() {
        let compressed = compress_tile(b"tile bytes").unwrap();
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_roundtrip() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let compressed = compress_tile(&data).unwrap();
        assert_eq!(decompress_tile(&compressed).unwrap(), data);
    }

    #[test]
    fn test_empty_input_is_valid_member() {
        let compressed = compress_tile(&[]).unwrap();
        assert!(!compressed.is_empty());
        assert!(decompress_tile(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_members_are_independent() {
        let a = compress_tile(b"first tile").unwrap();
        let b = compress_tile(b"second tile").unwrap();
        let mut joined = a.clone();
        joined.extend_from_slice(&b);

        assert_eq!(decompress_tile(&joined[a.len()..]).unwrap(), b"second tile");
        assert_eq!(decompress_tile(&joined[..a.len()]).unwrap(), b"first tile");
    }

    #[test]
    fn test_decompress_garbage_fails() {
        let err = decompress_tile(b"definitely not gzip").unwrap_err();
        assert!(matches!(err, CompressionError::Decode(_)));
    }
}
