// Whole-file compression of result streams
//
// Blob layout: uncompressed length (u32, big-endian) followed by a zlib stream.

use crate::core::constants::BLOB_PREFIX_SIZE;
use crate::core::error::{ResultsError, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

pub fn compress(data: &[u8], level: Compression) -> Result<Vec<u8>> {
    let len = u32::try_from(data.len()).map_err(|_| {
        ResultsError::CorruptedData(format!("{} bytes exceed the blob size limit", data.len()))
    })?;

    let mut out = Vec::with_capacity(BLOB_PREFIX_SIZE + data.len() / 2);
    out.extend_from_slice(&len.to_be_bytes());

    let mut encoder = ZlibEncoder::new(out, level);
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < BLOB_PREFIX_SIZE {
        return Err(ResultsError::DecompressionFailed(format!(
            "blob of {} bytes is too short",
            data.len()
        )));
    }

    let (prefix, payload) = data.split_at(BLOB_PREFIX_SIZE);
    let expected = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;

    // never inflate more than one byte past the announced length
    let mut decoder = ZlibDecoder::new(payload).take(expected as u64 + 1);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| ResultsError::DecompressionFailed(format!("Zlib: {}", e)))?;

    if decompressed.len() != expected {
        return Err(ResultsError::DecompressionFailed(format!(
            "Expected {} bytes, got {}",
            expected,
            decompressed.len()
        )));
    }

    Ok(decompressed)
}
