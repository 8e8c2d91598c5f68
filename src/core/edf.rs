// Copyright (c) 2024 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! Extensible data fields, as stored within the extra field of local file headers and central directory records.
//!
//! <https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#452>

use crate::core::{raw, raw_deref};
use crate::error::{Result, ZipError};
use crate::utils::{read_u16, read_u32, read_u64, write_u16};

use std::io::Write;

/// The length of an extensible data field's header (its ID and data size).
pub const HEADER_LENGTH: usize = 4;

/// The header ID of the ZIP64 extended information extra field.
pub const ZIP64_HEADER_ID: u16 = 0x0001;

/// The header ID of the NTFS extra field.
pub const NTFS_HEADER_ID: u16 = 0x000a;

/// The header ID of the UNIX extra field.
pub const UNIX_HEADER_ID: u16 = 0x000d;

/// The header ID of the Info-ZIP extended timestamp extra field.
pub const EXTENDED_TIMESTAMP_HEADER_ID: u16 = 0x5455;

/// The header ID of the (superseded) Info-ZIP UNIX extra field.
pub const INFO_ZIP_UNIX_HEADER_ID: u16 = 0x5855;

/// The NTFS attribute tag holding the modification, access and creation times.
const NTFS_TIMES_TAG: u16 = 0x0001;

/// Seconds between the NTFS epoch (1601-01-01) and the Unix epoch.
const NTFS_EPOCH_OFFSET: i64 = 11_644_473_600;

/// NTFS timestamps count 100ns intervals.
const NTFS_TICKS_PER_SECOND: i64 = 10_000_000;

raw! {
    RawExtensibleDataField {
        // Head ID - 2 bytes
        header_id, u16, read_u16, write_u16,
        // Data Size - 2 bytes
        data_size, u16, read_u16, write_u16
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensibleDataField {
    pub raw: RawExtensibleDataField,
    pub data: Vec<u8>,
}

raw_deref!(ExtensibleDataField, RawExtensibleDataField);

/// Reads all extensible data fields from the provided extra field.
///
/// Fields with an unrecognised header ID are kept as-is; their data is skipped using the declared size. A trailing
/// remainder too short to hold a field header is ignored, whereas a field whose declared size overruns the extra
/// field is malformed.
pub fn read_all(mut data: &[u8]) -> Result<Vec<ExtensibleDataField>> {
    let mut fields = Vec::new();

    while data.len() >= HEADER_LENGTH {
        let raw = raw_read(&mut data)?;

        if raw.data_size as usize > data.len() {
            return Err(ZipError::MalformedRecord("extensible data field overruns the extra field"));
        }

        let (field, remaining) = data.split_at(raw.data_size as usize);
        fields.push(ExtensibleDataField { raw, data: field.to_vec() });
        data = remaining;
    }

    Ok(fields)
}

/// Writes an extensible data field to the provided writer.
pub fn write<W: Write>(writer: &mut W, field: &ExtensibleDataField) -> Result<()> {
    raw_write(writer, &field.raw)?;
    writer.write_all(&field.data)?;
    Ok(())
}

/// Serialises the provided extensible data fields into a single extra field.
pub fn as_bytes(fields: &[ExtensibleDataField]) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for field in fields {
        write(&mut bytes, field)?;
    }
    Ok(bytes)
}

/// Decodes a modification time, in seconds since the Unix epoch, from the timestamp-carrying fields among `fields`.
///
/// Recognises the extended timestamp, NTFS and both UNIX extra fields. Where several are present, the last one which
/// carries a modification time takes precedence. Fields too short to hold one are passed over.
pub fn modification_time(fields: &[ExtensibleDataField]) -> Option<i64> {
    fields
        .iter()
        .filter_map(|field| match field.header_id {
            EXTENDED_TIMESTAMP_HEADER_ID => extended_timestamp(&field.data),
            NTFS_HEADER_ID => ntfs_timestamp(&field.data),
            UNIX_HEADER_ID | INFO_ZIP_UNIX_HEADER_ID => unix_timestamp(&field.data),
            _ => None,
        })
        .last()
}

// Flags byte, then the modification time when bit 0 is set.
fn extended_timestamp(data: &[u8]) -> Option<i64> {
    let (&flags, mut data) = data.split_first()?;
    if flags & 0x01 == 0 {
        return None;
    }
    read_u32(&mut data).ok().map(i64::from)
}

// Four reserved bytes, then a sequence of tagged attributes.
fn ntfs_timestamp(mut data: &[u8]) -> Option<i64> {
    read_u32(&mut data).ok()?;

    while data.len() >= HEADER_LENGTH {
        let tag = read_u16(&mut data).ok()?;
        let size = read_u16(&mut data).ok()? as usize;
        if size > data.len() {
            return None;
        }

        let (mut attribute, remaining) = data.split_at(size);
        data = remaining;

        if tag == NTFS_TIMES_TAG && size == 24 {
            let ticks = read_u64(&mut attribute).ok()? as i64;
            return Some(ticks.div_euclid(NTFS_TICKS_PER_SECOND) - NTFS_EPOCH_OFFSET);
        }
    }

    None
}

// Access time, then modification time.
fn unix_timestamp(mut data: &[u8]) -> Option<i64> {
    if data.len() < 8 {
        return None;
    }
    read_u32(&mut data).ok()?;
    read_u32(&mut data).ok().map(i64::from)
}

/// Which fixed-size record fields held their sentinel value, and so are expected in the ZIP64 extra field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Zip64Sentinels {
    pub uncompressed_size: bool,
    pub compressed_size: bool,
    pub relative_header_offset: bool,
    pub disk_start_number: bool,
}

/// An extended information field for ZIP64, holding only the values whose 32-bit counterparts were sentinels.
///
/// <https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#453>
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Zip64ExtendedInformation {
    pub uncompressed_size: Option<u64>,
    pub compressed_size: Option<u64>,
    pub relative_header_offset: Option<u64>,
    pub disk_start_number: Option<u32>,
}

impl Zip64ExtendedInformation {
    /// Parses a ZIP64 extra field's data (excluding its header).
    ///
    /// Values appear in a fixed order (uncompressed size, compressed size, header offset, disk start number), but
    /// only those flagged in `sentinels` are present, so they're matched positionally.
    pub fn from_data(mut data: &[u8], sentinels: Zip64Sentinels) -> Result<Self> {
        let mut info = Zip64ExtendedInformation::default();

        if sentinels.uncompressed_size {
            ensure_remaining(data, 8)?;
            info.uncompressed_size = Some(read_u64(&mut data)?);
        }
        if sentinels.compressed_size {
            ensure_remaining(data, 8)?;
            info.compressed_size = Some(read_u64(&mut data)?);
        }
        if sentinels.relative_header_offset {
            ensure_remaining(data, 8)?;
            info.relative_header_offset = Some(read_u64(&mut data)?);
        }
        if sentinels.disk_start_number {
            ensure_remaining(data, 4)?;
            info.disk_start_number = Some(read_u32(&mut data)?);
        }

        Ok(info)
    }

    /// Converts this information into an extensible data field, writing only the values which are present.
    pub fn to_field(&self) -> ExtensibleDataField {
        let mut data = Vec::with_capacity(28);

        for value in [self.uncompressed_size, self.compressed_size, self.relative_header_offset].into_iter().flatten() {
            data.extend_from_slice(&value.to_le_bytes());
        }
        if let Some(disk_start_number) = self.disk_start_number {
            data.extend_from_slice(&disk_start_number.to_le_bytes());
        }

        let raw = RawExtensibleDataField { header_id: ZIP64_HEADER_ID, data_size: data.len() as u16 };
        ExtensibleDataField { raw, data }
    }
}

fn ensure_remaining(data: &[u8], length: usize) -> Result<()> {
    if data.len() < length {
        return Err(ZipError::MalformedRecord("zip64 extended information field is too short"));
    }
    Ok(())
}
