//! File control header of an indexed data file.
//!
//! Only three fields are read and they are used for diagnostics. Nothing in
//! the record scanners trusts them.

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Seek, SeekFrom};

/// Size of the leading block holding the file control record
pub const HEADER_BLOCK_SIZE: usize = 512;

const KEY_COUNT_OFFSET: u64 = 0x14;
const RECORD_COUNT_OFFSET: u64 = 0x1C;
const MIN_HEADER_LEN: usize = 0x20;

/// Coarse metadata from the first block of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// First two bytes of the file
    pub signature: [u8; 2],
    /// Declared number of records
    pub record_count: u32,
    /// Declared number of keys
    pub key_count: u16,
}

impl FileHeader {
    /// Parses the header from the start of a file's bytes
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_HEADER_LEN {
            return Err(Error::truncated_header(data.len(), MIN_HEADER_LEN));
        }

        let block = &data[..data.len().min(HEADER_BLOCK_SIZE)];
        let mut cursor = Cursor::new(block);

        let signature = [block[0], block[1]];

        cursor
            .seek(SeekFrom::Start(KEY_COUNT_OFFSET))
            .map_err(|e| Error::internal(e.to_string()))?;
        let key_count = cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| Error::truncated_header(data.len(), MIN_HEADER_LEN))?;

        cursor
            .seek(SeekFrom::Start(RECORD_COUNT_OFFSET))
            .map_err(|e| Error::internal(e.to_string()))?;
        let record_count = cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| Error::truncated_header(data.len(), MIN_HEADER_LEN))?;

        Ok(Self {
            signature,
            record_count,
            key_count,
        })
    }

    /// Signature rendered as hex, e.g. `46 43`
    pub fn signature_hex(&self) -> String {
        format!("{:02X} {:02X}", self.signature[0], self.signature[1])
    }
}
