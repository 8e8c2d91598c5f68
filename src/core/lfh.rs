// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::core::raw;
use crate::error::Result;
use crate::utils::{read_u16, read_u32, write_u16, write_u32};

use std::io::{Read, Write};

pub const SIGNATURE: u32 = 0x04034b50;

raw! {
    RawLocalFileHeader {
        version_needed_to_extract, u16, read_u16, write_u16,
        general_purpose_flags, u16, read_u16, write_u16,
        compression_method, u16, read_u16, write_u16,
        last_mod_file_time, u16, read_u16, write_u16,
        last_mod_file_date, u16, read_u16, write_u16,
        crc_32, u32, read_u32, write_u32,
        compressed_size, u32, read_u32, write_u32,
        uncompressed_size, u32, read_u32, write_u32,
        file_name_length, u16, read_u16, write_u16,
        extra_field_length, u16, read_u16, write_u16
    }
}

#[derive(Clone, Debug)]
pub struct LocalFileHeader {
    pub raw: RawLocalFileHeader,
    pub file_name: Vec<u8>,
    pub extra_field: Vec<u8>,
}

/// Reads a local file header from the given reader.
///
/// This function does so by:
/// - asserting the signature of the local file header
/// - reading the raw local file header
/// - reading the file name
/// - reading the extra field
pub fn read<R: Read>(reader: &mut R) -> Result<LocalFileHeader> {
    crate::utils::assert_signature(reader, SIGNATURE)?;

    let raw = raw_read(reader)?;
    let file_name = crate::utils::read_bytes(reader, raw.file_name_length as usize)?;
    let extra_field = crate::utils::read_bytes(reader, raw.extra_field_length as usize)?;

    Ok(LocalFileHeader { raw, file_name, extra_field })
}

/// Writes a local file header to the given writer.
///
/// This function does so by:
/// - writing the signature of the local file header
/// - writing the raw local file header
/// - writing the file name
/// - writing the extra field
pub fn write<W: Write>(writer: &mut W, header: &LocalFileHeader) -> Result<()> {
    write_u32(writer, SIGNATURE)?;

    raw_write(writer, &header.raw)?;
    writer.write_all(&header.file_name)?;
    writer.write_all(&header.extra_field)?;

    Ok(())
}
