//! Gzip decompression for zboot payloads.
//!
//! The zboot header's 32-byte compression tag names the algorithm; "gzip"
//! (padded with zeros) is the only one the format is known to ship. The
//! decoder error is returned as-is — flate2's messages ("invalid gzip
//! header", "corrupt deflate stream", ...) are directly diagnostic.

use flate2::read::GzDecoder;
use std::io::{self, Read};

/// Decompress a complete gzip stream into a fresh buffer.
pub fn decompress(compressed: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(compressed).read_to_end(&mut out)?;
    Ok(out)
}
