// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::core::{raw, raw_deref};
use crate::error::Result;
use crate::utils::{read_u16, read_u32, write_u16, write_u32};

use std::io::Write;

pub const SIGNATURE: u32 = 0x06054b50;

/// The length of the fixed portion of the record, excluding its signature.
pub const LENGTH: usize = 18;

/// The maximum length of the trailing ZIP file comment.
pub const MAX_COMMENT_LENGTH: usize = u16::MAX as usize;

raw! {
    RawEndOfCentralDirectoryRecord {
        // number of this disk - 2 bytes
        number_of_this_disk, u16, read_u16, write_u16,
        // number of the disk with the start of the central directory - 2 bytes
        disk_with_start_of_cd, u16, read_u16, write_u16,
        // total number of entries in the central directory on this disk - 2 bytes
        total_entries_in_cd_on_this_disk, u16, read_u16, write_u16,
        // total number of entries in the central directory - 2 bytes
        total_entries_in_cd, u16, read_u16, write_u16,
        // size of the central directory - 4 bytes
        size_of_cd, u32, read_u32, write_u32,
        // offset of start of central directory with respect to the starting disk number - 4 bytes
        offset_start_of_cd, u32, read_u32, write_u32,
        // .ZIP file comment length - 2 bytes
        zip_file_comment_length, u16, read_u16, write_u16
    }
}

impl RawEndOfCentralDirectoryRecord {
    /// Returns whether any field holds the sentinel value deferring to the ZIP64 end of central directory record.
    pub fn has_zip64_sentinel(&self) -> bool {
        self.total_entries_in_cd == u16::MAX
            || self.total_entries_in_cd_on_this_disk == u16::MAX
            || self.size_of_cd == u32::MAX
            || self.offset_start_of_cd == u32::MAX
    }
}

#[derive(Clone, Debug)]
pub struct EndOfCentralDirectoryRecord {
    pub raw: RawEndOfCentralDirectoryRecord,
    pub zip_file_comment: Vec<u8>,
}

raw_deref!(EndOfCentralDirectoryRecord, RawEndOfCentralDirectoryRecord);

/// Writes the end of central directory record to the given writer.
///
/// This function does so by:
/// - writing the signature of the end of central directory record
/// - writing the raw end of central directory record
/// - writing the zip file comment
pub fn write<W: Write>(writer: &mut W, record: &EndOfCentralDirectoryRecord) -> Result<()> {
    write_u32(writer, SIGNATURE)?;

    raw_write(writer, &record.raw)?;
    writer.write_all(&record.zip_file_comment)?;

    Ok(())
}
