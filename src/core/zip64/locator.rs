// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

use crate::core::raw;
use crate::error::Result;
use crate::utils::{read_u32, read_u64, write_u32, write_u64};

use std::io::Write;

pub const SIGNATURE: u32 = 0x07064b50;

/// The length of the fixed record, excluding its signature.
pub const LENGTH: usize = 16;

raw! {
    RawZip64EndOfCentralDirectoryLocator {
        // number of the disk with the start of the zip64 end of central directory - 4 bytes
        disk_with_start_eocdr, u32, read_u32, write_u32,
        // relative offset of the zip64 end of central directory record - 8 bytes
        relative_offset_eocdr, u64, read_u64, write_u64,
        // total number of disks - 4 bytes
        total_disks, u32, read_u32, write_u32
    }
}

/// Writes the ZIP64 end of central directory locator to the given writer.
pub fn write<W: Write>(writer: &mut W, locator: &RawZip64EndOfCentralDirectoryLocator) -> Result<()> {
    write_u32(writer, SIGNATURE)?;
    raw_write(writer, locator)
}
