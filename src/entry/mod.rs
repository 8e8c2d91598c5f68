// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

pub mod builder;

use crate::core::cdr::{CentralDirectoryRecord, RawCentralDirectoryRecord};
use crate::core::edf::{self, ExtensibleDataField, ZIP64_HEADER_ID};
use crate::date::ZipDateTime;
use crate::error::Result;
use crate::spec::attribute::AttributeCompatibility;
use crate::spec::compression::Compression;
use crate::spec::flag::GeneralPurposeFlag;
use crate::string::ZipString;

#[cfg(feature = "chrono")]
use chrono::{DateTime, TimeZone, Utc};

/// An entry within a ZIP file's central directory.
///
/// Each entry is self-contained: it holds everything needed to later locate and decode its data (the local header
/// offset, compression method and sizes) without borrowing the reader it was parsed from. Sizes and the header offset
/// have already been resolved against any ZIP64 extended information.
///
/// # Note
/// The filename is the raw name stored in the archive. If calling [`ZipEntry::filename()`] on entries retrieved from
/// untrusted ZIP files, the filename should be sanitised before being used as a path to prevent [directory travesal
/// attacks](https://en.wikipedia.org/wiki/Directory_traversal_attack).
#[derive(Clone, Debug)]
pub struct ZipEntry {
    pub(crate) raw: RawCentralDirectoryRecord,
    pub(crate) filename: ZipString,
    pub(crate) extra_field: Vec<u8>,
    pub(crate) extra_fields: Vec<ExtensibleDataField>,
    pub(crate) comment: ZipString,
    pub(crate) uncompressed_size: u64,
    pub(crate) compressed_size: u64,
    pub(crate) header_offset: u64,
    pub(crate) disk_start: u32,
}

impl ZipEntry {
    /// Returns the entry's filename.
    pub fn filename(&self) -> &ZipString {
        &self.filename
    }

    /// Returns the entry's file comment.
    pub fn comment(&self) -> &ZipString {
        &self.comment
    }

    /// Returns the entry's raw compression method tag.
    pub fn compression_method(&self) -> u16 {
        self.raw.compression_method
    }

    /// Returns the entry's compression method, if known to this crate.
    pub fn compression(&self) -> Result<Compression> {
        Compression::try_from(self.raw.compression_method)
    }

    /// Returns the entry's CRC32 value.
    pub fn crc32(&self) -> u32 {
        self.raw.crc_32
    }

    /// Returns the entry's uncompressed size.
    pub fn uncompressed_size(&self) -> u64 {
        self.uncompressed_size
    }

    /// Returns the entry's compressed size.
    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }

    /// Returns the offset of the entry's local file header from the start of the archive.
    pub fn header_offset(&self) -> u64 {
        self.header_offset
    }

    /// Returns the number of the disk on which the entry starts.
    pub fn disk_start(&self) -> u32 {
        self.disk_start
    }

    /// Returns the entry's last modification time & date.
    pub fn last_modification_date(&self) -> ZipDateTime {
        ZipDateTime { date: self.raw.last_mod_file_date, time: self.raw.last_mod_file_time }
    }

    /// Returns the entry's last modification time in seconds since the Unix epoch, as stored in an extended
    /// timestamp, NTFS or UNIX extra field.
    ///
    /// Unlike [`ZipEntry::last_modification_date()`], this isn't limited to a two second granularity or the years
    /// 1980 to 2107. Returns `None` when no such field is present.
    pub fn last_modification_timestamp(&self) -> Option<i64> {
        edf::modification_time(&self.extra_fields)
    }

    /// Returns the entry's last modification time from its extra fields as chrono's [`DateTime`].
    ///
    /// Note that this requires the `chrono` feature.
    #[cfg(feature = "chrono")]
    pub fn last_modification_chrono(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.last_modification_timestamp()?, 0).single()
    }

    /// Returns the entry's general purpose flag.
    pub fn flags(&self) -> GeneralPurposeFlag {
        GeneralPurposeFlag::from(self.raw.general_purpose_bit_flag)
    }

    pub fn version_made_by(&self) -> u16 {
        self.raw.version_made_by
    }

    pub fn version_needed_to_extract(&self) -> u16 {
        self.raw.version_needed_to_extract
    }

    /// Returns the entry's attribute's host compatibility.
    pub fn attribute_compatibility(&self) -> AttributeCompatibility {
        AttributeCompatibility::from(self.raw.version_made_by)
    }

    /// Returns the entry's internal file attribute.
    pub fn internal_file_attribute(&self) -> u16 {
        self.raw.internal_file_attributes
    }

    /// Returns the entry's external file attribute.
    pub fn external_file_attribute(&self) -> u32 {
        self.raw.external_file_attributes
    }

    /// Returns the entry's integer-based UNIX permissions.
    ///
    /// # Note
    /// This will return None if the attribute host compatibility is not listed as Unix.
    pub fn unix_permissions(&self) -> Option<u16> {
        if !matches!(self.attribute_compatibility(), AttributeCompatibility::Unix) {
            return None;
        }

        Some((self.raw.external_file_attributes >> 16) as u16)
    }

    /// Returns the entry's extensible data fields, in the order they were stored.
    pub fn extra_fields(&self) -> &[ExtensibleDataField] {
        &self.extra_fields
    }

    /// Returns whether the entry carries ZIP64 extended information.
    pub fn zip64(&self) -> bool {
        self.extra_fields.iter().any(|field| field.header_id == ZIP64_HEADER_ID)
    }

    /// Returns whether or not the entry represents a directory.
    pub fn dir(&self) -> bool {
        self.filename.as_bytes().ends_with(b"/")
    }

    /// Rebuilds the central directory record this entry was parsed from (or will be written as).
    pub(crate) fn to_record(&self) -> CentralDirectoryRecord {
        CentralDirectoryRecord {
            raw: self.raw,
            file_name: self.filename.as_bytes().to_vec(),
            extra_field: self.extra_field.clone(),
            file_comment: self.comment.as_bytes().to_vec(),
        }
    }
}

/// An entry paired with the physical offset of its local file header.
#[derive(Clone, Debug)]
pub struct StoredZipEntry {
    pub(crate) entry: ZipEntry,
    pub(crate) file_offset: u64,
}

impl StoredZipEntry {
    /// Returns the inner entry.
    pub fn entry(&self) -> &ZipEntry {
        &self.entry
    }

    /// Returns the offset of the entry's local file header from the start of the archive.
    pub fn file_offset(&self) -> u64 {
        self.file_offset
    }
}

impl From<ZipEntry> for StoredZipEntry {
    fn from(entry: ZipEntry) -> Self {
        let file_offset = entry.header_offset;
        Self { entry, file_offset }
    }
}
