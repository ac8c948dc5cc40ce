//! Magic-byte registry for the zboot container format.
//!
//! Every fixed byte pattern the unpacker cares about — header magics,
//! compression tags, architecture signatures — is described by a [`Datum`].
//! A datum's canonical bytes come in one of three shapes:
//!   - a literal raw sequence (the Linux magic),
//!   - a printable string zero-padded to a fixed width (the gzip tag),
//!   - a printable string with one extra trailing byte (the arch signatures).
//!
//! All derived sequences are built at compile time into `static` tables, so
//! `Datum::data()` is a plain slice read: deterministic, never recomputed,
//! no mutable state.

use crate::{Error, Result};

/// A named magic byte pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datum {
    name: &'static str,
    bytes: &'static [u8],
}

impl Datum {
    /// Printable name, used in mismatch errors ("msdos magic", "gzip", ...).
    pub const fn value(&self) -> &'static str {
        self.name
    }

    /// Canonical byte sequence for this datum.
    pub const fn data(&self) -> &'static [u8] {
        self.bytes
    }
}

/// Zero-pad the bytes of `s` up to width `N`.
const fn zero_pad<const N: usize>(s: &str) -> [u8; N] {
    let src = s.as_bytes();
    assert!(src.len() <= N);
    let mut out = [0u8; N];
    let mut i = 0;
    while i < src.len() {
        out[i] = src[i];
        i += 1;
    }
    out
}

/// The bytes of `s` followed by a single trailing byte, filling width `N`.
const fn with_trailer<const N: usize>(s: &str, trailer: u8) -> [u8; N] {
    assert!(s.len() + 1 == N);
    let mut out = zero_pad::<N>(s);
    out[N - 1] = trailer;
    out
}

static GZIP_TAG: [u8; 32] = zero_pad("gzip");
static ARM64_SIG: [u8; 4] = with_trailer("ARM", 0x64);
static RISCV_SIG: [u8; 4] = with_trailer("RSC", 0x05);

/// "MZ" DOS stub magic at offset 0.
pub const MSDOS_MAGIC: Datum = Datum { name: "msdos magic", bytes: b"MZ" };
/// "zimg" tag at offset 4.
pub const ZIMG: Datum = Datum { name: "zimg", bytes: b"zimg" };
/// Linux kernel-image magic at offset 56 of the header, `\xcd\x23\x82\x81`.
pub const LINUX_MAGIC: Datum = Datum { name: "linux magic", bytes: &[0xCD, 0x23, 0x82, 0x81] };
/// Gzip compression tag: "gzip" padded with zeros to the 32-byte field width.
pub const GZIP: Datum = Datum { name: "gzip", bytes: &GZIP_TAG };
/// ARM64 architecture signature: "ARM" + 0x64.
pub const ARM64: Datum = Datum { name: "arm", bytes: &ARM64_SIG };
/// RISC-V architecture signature: "RSC" + 0x05.
pub const RISCV: Datum = Datum { name: "risc", bytes: &RISCV_SIG };

/// One observed-vs-expected comparison against a registry datum.
pub(crate) struct Check<'a> {
    pub observed: &'a [u8],
    pub expected: Datum,
}

impl Check<'_> {
    /// Byte-for-byte comparison; mismatch reports the datum name and both
    /// sequences in debug form so control bytes stay visible.
    pub fn verify(&self) -> Result<()> {
        if self.observed != self.expected.data() {
            return Err(Error::ContentMismatch {
                field: self.expected.value(),
                observed: self.observed.to_vec(),
                expected: self.expected.data().to_vec(),
            });
        }
        Ok(())
    }
}
