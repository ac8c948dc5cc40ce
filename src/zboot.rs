//! The zboot unpack pipeline.
//!
//! Stages, in order: decode the fixed header, validate its magics and
//! payload bounds, slice out the payload, then (when requested) decompress
//! it, sniff the kernel architecture, and write the result. Every stage
//! short-circuits on failure; nothing is retried.

use log::debug;
use std::io::{self, Write};

use crate::gzip;
use crate::header::Header;
use crate::magic::{self, Check, Datum};
use crate::{Error, ReadConfig, Result, UnpackConfig};

/// Offset of the 4-byte architecture signature inside a decompressed
/// kernel image.
pub const ARCH_MAGIC_OFFSET: usize = 56;

/// Architecture identified from a decompressed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchKind {
    Arm64,
    RiscV,
}

// ── Reading ──────────────────────────────────────────────

/// Decoded header plus, when [`ReadConfig::parse_body`] was set, the exact
/// payload byte range `[payload_offset, payload_offset + payload_size)`.
#[derive(Debug, Clone)]
pub struct BootInfo {
    header: Header,
    body: Option<Vec<u8>>,
    config: ReadConfig,
}

impl BootInfo {
    /// The decoded zboot header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The extracted payload, absent unless body parsing was requested.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The configuration this info was decoded with.
    pub fn config(&self) -> ReadConfig {
        self.config
    }
}

/// Decode and validate boot information from a complete zboot image.
///
/// The buffer must hold the whole container; on success the returned
/// [`BootInfo`] is independent of `buf`.
pub fn read_info(buf: &[u8], cfg: ReadConfig) -> Result<BootInfo> {
    let header = Header::decode(buf)?;
    if cfg.debug {
        debug!("header: {header:?}");
    }
    validate(&header, buf.len())?;

    let body = if cfg.parse_body {
        let body = extract(buf, &header)?;
        if cfg.debug {
            debug!("read: {} bytes at offset {}", body.len(), header.payload_offset);
        }
        Some(body)
    } else {
        None
    };
    Ok(BootInfo { header, body, config: cfg })
}

/// Structural validation of a decoded header against the buffer it came
/// from. Magic checks run before bounds checks so non-zboot input is
/// reported as a content mismatch, not a misleading bounds error.
fn validate(hdr: &Header, buffer_len: usize) -> Result<()> {
    // Check order is DOS magic, Linux magic, zimg tag; the first mismatch
    // wins, which decides the error reported for multiply-corrupted input.
    for check in [
        Check { observed: &hdr.msdos_magic, expected: magic::MSDOS_MAGIC },
        Check { observed: &hdr.linux_magic, expected: magic::LINUX_MAGIC },
        Check { observed: &hdr.zimg, expected: magic::ZIMG },
    ] {
        check.verify()?;
    }

    if hdr.payload_offset == 0 || hdr.payload_size == 0 {
        return Err(Error::InvalidPayloadBounds {
            offset: hdr.payload_offset,
            size: hdr.payload_size,
            buffer_len,
        });
    }
    // Widen both operands before adding; two u32s cannot overflow a u64.
    let end = u64::from(hdr.payload_offset) + u64::from(hdr.payload_size);
    if end > buffer_len as u64 {
        return Err(Error::InvalidPayloadBounds {
            offset: hdr.payload_offset,
            size: hdr.payload_size,
            buffer_len,
        });
    }
    Ok(())
}

/// Copy the payload region out of the buffer. Validation has already
/// bounds-checked the range; this re-checks defensively and insists on a
/// non-empty result.
fn extract(buf: &[u8], hdr: &Header) -> Result<Vec<u8>> {
    let start = hdr.payload_offset as usize;
    let requested = hdr.payload_size as usize;
    let short = || Error::ShortRead {
        requested,
        available: buf.len().saturating_sub(start),
    };
    let end = start.checked_add(requested).ok_or_else(short)?;
    let body = buf.get(start..end).ok_or_else(short)?;
    if body.is_empty() {
        return Err(short());
    }
    Ok(body.to_vec())
}

// ── Decompression ────────────────────────────────────────

/// One registered compression algorithm: a header tag and its decoder.
/// Decoder errors are surfaced verbatim; their messages are diagnostic
/// on their own.
pub struct Decompressor {
    pub tag: Datum,
    pub decode: fn(&[u8]) -> io::Result<Vec<u8>>,
}

/// Algorithms shipped by default, consulted in order. Gzip is the only
/// compression the zboot format is known to use.
pub const DECOMPRESSORS: &[Decompressor] =
    &[Decompressor { tag: magic::GZIP, decode: gzip::decompress }];

/// Look up `tag` (the full 32-byte header field, padding included) in the
/// registry and run the matching decoder over `payload`.
pub fn decompress(registry: &[Decompressor], tag: &[u8; 32], payload: &[u8]) -> Result<Vec<u8>> {
    for entry in registry {
        if tag[..] == *entry.tag.data() {
            return Ok((entry.decode)(payload)?);
        }
    }
    Err(Error::UnknownCompressionType { tag: tag.to_vec() })
}

// ── Architecture sniffing ────────────────────────────────

const ARCH_SIGNATURES: &[(Datum, ArchKind)] =
    &[(magic::ARM64, ArchKind::Arm64), (magic::RISCV, ArchKind::RiscV)];

/// Identify the kernel architecture from a decompressed payload by the
/// 4-byte signature at [`ARCH_MAGIC_OFFSET`]. ARM is tried before RISC;
/// the first exact match wins.
pub fn sniff(payload: &[u8]) -> Result<ArchKind> {
    let sig = payload
        .get(ARCH_MAGIC_OFFSET..ARCH_MAGIC_OFFSET + 4)
        .ok_or(Error::PayloadTooShort { len: payload.len() })?;
    for (datum, kind) in ARCH_SIGNATURES {
        if sig == datum.data() {
            return Ok(*kind);
        }
    }
    Err(Error::UnknownArchitecture {
        observed: [sig[0], sig[1], sig[2], sig[3]],
    })
}

// ── Unpacking ────────────────────────────────────────────

/// Write the payload of `src` to `dst`, decompressing first when
/// [`UnpackConfig::decompress`] is set. Uses the default decompressor
/// registry.
pub fn unpack<W: Write>(src: &BootInfo, dst: &mut W, cfg: UnpackConfig) -> Result<()> {
    unpack_with(src, dst, cfg, DECOMPRESSORS)
}

/// [`unpack`] with a caller-supplied decompressor registry, so additional
/// algorithms can be plugged in without touching the pipeline.
///
/// When decompression is requested the payload is also checked to be a
/// recognized kernel image (ARM64 or RISC-V signature at offset 56); raw
/// extraction skips that check, since the offset convention only holds for
/// decompressed images.
pub fn unpack_with<W: Write>(
    src: &BootInfo,
    dst: &mut W,
    cfg: UnpackConfig,
    registry: &[Decompressor],
) -> Result<()> {
    let body = match src.body() {
        Some(body) if !body.is_empty() => body,
        _ => return Err(Error::EmptyBody),
    };

    if cfg.decompress {
        let data = decompress(registry, &src.header().compression_type, body)?;
        if cfg.debug {
            debug!("decompressed: {} -> {} bytes", body.len(), data.len());
        }
        let arch = sniff(&data)?;
        if cfg.debug {
            debug!("found type: {arch:?}");
        }
        dst.write_all(&data)?;
    } else {
        dst.write_all(body)?;
    }
    Ok(())
}
