//! Unpacker for the EFI "zboot" container format.
//!
//! A zboot file is a self-extracting EFI stub: a fixed 64-byte header
//! followed by a (usually gzip-compressed) kernel image. This crate decodes
//! the header, validates its magic fields and payload bounds, extracts the
//! payload, and can decompress it and confirm the result is a recognized
//! ARM64 or RISC-V kernel image.
//!
//! ```no_run
//! use zboot_unpack::{read_info, unpack, ReadConfig, UnpackConfig};
//!
//! # fn main() -> zboot_unpack::Result<()> {
//! let data = std::fs::read("vmlinuz.efi").map_err(zboot_unpack::Error::Io)?;
//! let info = read_info(&data, ReadConfig { parse_body: true, ..Default::default() })?;
//! let mut out = Vec::new();
//! unpack(&info, &mut out, UnpackConfig { decompress: true, ..Default::default() })?;
//! # Ok(())
//! # }
//! ```

mod gzip;
mod header;
mod magic;
mod zboot;

pub use header::{Header, HEADER_LEN};
pub use magic::{Datum, ARM64, GZIP, LINUX_MAGIC, MSDOS_MAGIC, RISCV, ZIMG};
pub use zboot::{
    decompress, read_info, sniff, unpack, unpack_with, ArchKind, BootInfo, Decompressor,
    ARCH_MAGIC_OFFSET, DECOMPRESSORS,
};

use thiserror::Error as ThisError;

/// Everything that can go wrong while decoding or unpacking a zboot image.
/// All variants are terminal for the invocation; none indicate a transient
/// condition worth retrying.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The input ends before the fixed header does.
    #[error("truncated input: header needs {needed} bytes, got {actual}")]
    TruncatedInput { needed: usize, actual: usize },

    /// A magic field holds the wrong bytes. Both sequences are rendered in
    /// debug form so control bytes are visible.
    #[error("{field} invalid data: {observed:?} != {expected:?}")]
    ContentMismatch {
        field: &'static str,
        observed: Vec<u8>,
        expected: Vec<u8>,
    },

    /// Payload offset/size is zero, or the region extends past the buffer.
    #[error("invalid payload bounds: offset {offset}, size {size}, buffer length {buffer_len}")]
    InvalidPayloadBounds {
        offset: u32,
        size: u32,
        buffer_len: usize,
    },

    /// Extraction could not deliver the length the header promised.
    #[error("short read: requested {requested} bytes, {available} available")]
    ShortRead { requested: usize, available: usize },

    /// The compression-type tag matches no registered algorithm.
    #[error("unknown compression type: {tag:?}")]
    UnknownCompressionType { tag: Vec<u8> },

    /// The decompressed payload ends before the architecture signature.
    #[error("invalid response payload: {len}")]
    PayloadTooShort { len: usize },

    /// The architecture signature matches neither ARM64 nor RISC-V.
    #[error("unknown payload type: {observed:?}")]
    UnknownArchitecture { observed: [u8; 4] },

    /// Unpack was asked to write a [`BootInfo`] decoded without a body.
    #[error("no body")]
    EmptyBody,

    /// An underlying I/O or decompression failure, surfaced verbatim.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Options for [`read_info`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadConfig {
    /// Extract the payload body along with the header.
    pub parse_body: bool,
    /// Emit debug logging for the decoded header and read sizes.
    pub debug: bool,
}

/// Options for [`unpack`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnpackConfig {
    /// Decompress the payload (and verify its architecture) before writing.
    pub decompress: bool,
    /// Emit debug logging for per-stage byte counts.
    pub debug: bool,
}
