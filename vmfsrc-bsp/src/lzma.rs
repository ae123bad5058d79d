//! Valve's LZMA lump envelope.
//!
//! Compressed lumps carry a 17-byte little-endian header in front of a raw
//! LZMA stream: the `LZMA` magic, the uncompressed size, the stream size and
//! the five LZMA property bytes. The header is little-endian even in
//! big-endian files.

use crate::error::{BspError, Result};

/// Size of the envelope header in front of the LZMA stream.
pub const HEADER_SIZE: usize = 17;

const MAGIC: &[u8; 4] = b"LZMA";

/// Size of a standard `.lzma` stream header (props + unpacked size).
const LZMA_STREAM_HEADER: usize = 13;

/// A lump is compressed iff its buffer starts with the envelope magic.
pub fn is_compressed(buf: &[u8]) -> bool {
    buf.len() >= MAGIC.len() && &buf[..MAGIC.len()] == MAGIC
}

/// Unpack an enveloped lump buffer.
pub fn uncompress(buf: &[u8]) -> Result<Vec<u8>> {
    if !is_compressed(buf) {
        return Err(BspError::Compression("missing LZMA magic".to_string()));
    }
    if buf.len() < HEADER_SIZE {
        return Err(BspError::Compression("envelope header truncated".to_string()));
    }

    let actual_size = u32::from_le_bytes(buf[4..8].try_into().unwrap()) as usize;
    let lzma_size = u32::from_le_bytes(buf[8..12].try_into().unwrap()) as usize;
    let props = &buf[12..HEADER_SIZE];

    if HEADER_SIZE + lzma_size > buf.len() {
        return Err(BspError::Compression("LZMA stream truncated".to_string()));
    }

    // Splice the envelope fields back into a standard .lzma header so the
    // decoder can consume it unmodified.
    let mut stream = Vec::with_capacity(LZMA_STREAM_HEADER + lzma_size);
    stream.extend_from_slice(props);
    stream.extend_from_slice(&(actual_size as u64).to_le_bytes());
    stream.extend_from_slice(&buf[HEADER_SIZE..HEADER_SIZE + lzma_size]);

    let mut out = Vec::with_capacity(actual_size);
    lzma_rs::lzma_decompress(&mut &stream[..], &mut out)
        .map_err(|e| BspError::Compression(e.to_string()))?;

    if out.len() != actual_size {
        return Err(BspError::Compression(format!(
            "expected {} uncompressed bytes, got {}",
            actual_size,
            out.len()
        )));
    }

    Ok(out)
}

/// Pack a lump buffer into the envelope.
pub fn compress(buf: &[u8]) -> Result<Vec<u8>> {
    let mut stream = Vec::new();
    lzma_rs::lzma_compress(&mut &buf[..], &mut stream)?;

    if stream.len() < LZMA_STREAM_HEADER {
        return Err(BspError::Compression("encoder produced no stream".to_string()));
    }

    let payload = &stream[LZMA_STREAM_HEADER..];

    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&(buf.len() as u32).to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&stream[..5]);
    out.extend_from_slice(payload);

    Ok(out)
}
