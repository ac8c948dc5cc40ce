//! Fixed-layout zboot header decoding.
//!
//! The container starts with a 64-byte little-endian record:
//!
//! | offset | size | field                |
//! |--------|------|----------------------|
//! | 0      | 2    | MS-DOS magic ("MZ")  |
//! | 2      | 2    | reserved             |
//! | 4      | 4    | "zimg" tag           |
//! | 8      | 4    | payload offset (u32) |
//! | 12     | 4    | payload size (u32)   |
//! | 16     | 8    | reserved             |
//! | 24     | 32   | compression type tag |
//! | 56     | 4    | Linux magic          |
//! | 60     | 4    | PE header offset     |

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;
use std::io::{Cursor, Read};

use crate::{Error, Result};

/// Total size of the fixed header record.
pub const HEADER_LEN: usize = 64;

/// Parsed zboot header. Fields appear in declaration order with no implicit
/// padding; integers are little-endian.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Header {
    pub msdos_magic: [u8; 2],
    pub reserved0: [u8; 2],
    pub zimg: [u8; 4],
    pub payload_offset: u32,
    pub payload_size: u32,
    pub reserved1: [u8; 8],
    pub compression_type: [u8; 32],
    pub linux_magic: [u8; 4],
    pub pe_header_offset: u32,
}

impl Header {
    /// Decode the header from the front of `buf`.
    ///
    /// Fails with [`Error::TruncatedInput`] when fewer than [`HEADER_LEN`]
    /// bytes are available. Does not validate field contents; that is the
    /// job of the structural checks in [`crate::read_info`].
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(Error::TruncatedInput { needed: HEADER_LEN, actual: buf.len() });
        }

        let mut cur = Cursor::new(buf);
        let mut hdr = Header {
            msdos_magic: [0; 2],
            reserved0: [0; 2],
            zimg: [0; 4],
            payload_offset: 0,
            payload_size: 0,
            reserved1: [0; 8],
            compression_type: [0; 32],
            linux_magic: [0; 4],
            pe_header_offset: 0,
        };
        cur.read_exact(&mut hdr.msdos_magic)?;
        cur.read_exact(&mut hdr.reserved0)?;
        cur.read_exact(&mut hdr.zimg)?;
        hdr.payload_offset = cur.read_u32::<LittleEndian>()?;
        hdr.payload_size = cur.read_u32::<LittleEndian>()?;
        cur.read_exact(&mut hdr.reserved1)?;
        cur.read_exact(&mut hdr.compression_type)?;
        cur.read_exact(&mut hdr.linux_magic)?;
        hdr.pe_header_offset = cur.read_u32::<LittleEndian>()?;
        Ok(hdr)
    }
}
