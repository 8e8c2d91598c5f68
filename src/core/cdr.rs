// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::core::raw;
use crate::error::Result;
use crate::utils::{read_u16, read_u32, write_u16, write_u32};

use std::io::{Read, Write};

pub const SIGNATURE: u32 = 0x02014b50;

/// The length of the fixed portion of the record, excluding its signature.
pub const LENGTH: usize = 42;

raw! {
    RawCentralDirectoryRecord {
        version_made_by, u16, read_u16, write_u16,
        version_needed_to_extract, u16, read_u16, write_u16,
        general_purpose_bit_flag, u16, read_u16, write_u16,
        compression_method, u16, read_u16, write_u16,
        last_mod_file_time, u16, read_u16, write_u16,
        last_mod_file_date, u16, read_u16, write_u16,
        crc_32, u32, read_u32, write_u32,
        compressed_size, u32, read_u32, write_u32,
        uncompressed_size, u32, read_u32, write_u32,
        file_name_length, u16, read_u16, write_u16,
        extra_field_length, u16, read_u16, write_u16,
        file_comment_length, u16, read_u16, write_u16,
        disk_number_start, u16, read_u16, write_u16,
        internal_file_attributes, u16, read_u16, write_u16,
        external_file_attributes, u32, read_u32, write_u32,
        relative_offset_of_local_header, u32, read_u32, write_u32
    }
}

#[derive(Clone, Debug)]
pub struct CentralDirectoryRecord {
    pub raw: RawCentralDirectoryRecord,
    pub file_name: Vec<u8>,
    pub extra_field: Vec<u8>,
    pub file_comment: Vec<u8>,
}

/// Reads the remainder of a central directory record whose signature has already been consumed.
///
/// This function does so by:
/// - reading the raw central directory record
/// - reading the file name
/// - reading the extra field
/// - reading the file comment
///
/// Each variable-length field is read for exactly its declared length, so a record cut short by the end of the
/// input surfaces as [`ZipError::UnexpectedEndOfInput`](crate::error::ZipError::UnexpectedEndOfInput).
pub fn read_after_signature<R: Read>(reader: &mut R) -> Result<CentralDirectoryRecord> {
    let raw = raw_read(reader)?;
    let file_name = crate::utils::read_bytes(reader, raw.file_name_length as usize)?;
    let extra_field = crate::utils::read_bytes(reader, raw.extra_field_length as usize)?;
    let file_comment = crate::utils::read_bytes(reader, raw.file_comment_length as usize)?;

    Ok(CentralDirectoryRecord { raw, file_name, extra_field, file_comment })
}

/// Writes a central directory record to the given writer.
///
/// This function does so by:
/// - writing the signature of the central directory record
/// - writing the raw central directory record
/// - writing the file name
/// - writing the extra field
/// - writing the file comment
pub fn write<W: Write>(writer: &mut W, record: &CentralDirectoryRecord) -> Result<()> {
    write_u32(writer, SIGNATURE)?;

    raw_write(writer, &record.raw)?;
    writer.write_all(&record.file_name)?;
    writer.write_all(&record.extra_field)?;
    writer.write_all(&record.file_comment)?;

    Ok(())
}
