// Copyright (c) 2022 Harry [Majored] [hello@majored.pw]
// MIT License (https://github.com/Majored/rs-async-zip/blob/main/LICENSE)

//! <https://github.com/Majored/rs-async-zip/blob/main/SPECIFICATION.md#4316>
//!
//! As with other ZIP libraries, we face the predicament that the end of central directory record may contain a
//! variable-length file comment. As a result, we cannot just make the assumption that the start of this record is
//! 22 bytes from the end of the data - we must locate it ourselves.
//!
//! We read the tail of the data in reverse, in fixed-size buffers which overlap by the signature length so that a
//! signature crossing a buffer boundary is still matched, and linearly search each buffer in reverse for the EOCDR
//! signature. The search never extends further back than the longest possible record (22 bytes plus a 65,535 byte
//! comment).
//!
//! The comment is free-form data and so may itself contain the signature bytes. A match is therefore only accepted
//! when its declared comment length runs exactly to the end of the data; otherwise the search continues backwards.

use crate::core::eocdr::{self, RawEndOfCentralDirectoryRecord, MAX_COMMENT_LENGTH};
use crate::core::zip64::eocdr::{self as zip64_eocdr, RawZip64EndOfCentralDirectoryRecord};
use crate::core::zip64::locator::{self as zip64_locator};
use crate::core::SIGNATURE_LENGTH;
use crate::error::{Result, ZipError};
use crate::io::ReadAt;
use crate::string::{StringEncoding, ZipString};
use crate::utils::read_u32;

/// The buffer size used when locating the EOCDR, equal to 2KiB.
const BUFFER_SIZE: usize = 2048;

/// The length of the fixed portion of the EOCDR, including its signature.
const EOCDR_LENGTH: u64 = (SIGNATURE_LENGTH + eocdr::LENGTH) as u64;

/// The length of the ZIP64 EOCDL, including its signature.
const ZIP64_EOCDL_LENGTH: u64 = (SIGNATURE_LENGTH + zip64_locator::LENGTH) as u64;

/// The length of the fixed portion of the ZIP64 EOCDR, including its signature.
const ZIP64_EOCDR_LENGTH: u64 = (SIGNATURE_LENGTH + zip64_eocdr::LENGTH) as u64;

/// The furthest distance from the end of the data at which the EOCDR may start.
const SEARCH_WINDOW: u64 = EOCDR_LENGTH + MAX_COMMENT_LENGTH as u64;

/// The location and shape of an archive's central directory, as described by its end records.
#[derive(Clone, Debug)]
pub struct EndOfCentralDirectory {
    pub(crate) directory_offset: u64,
    pub(crate) directory_records: u64,
    pub(crate) directory_size: u64,
    pub(crate) comment: ZipString,
    pub(crate) zip64: bool,
    pub(crate) record_offset: u64,
}

impl EndOfCentralDirectory {
    /// Returns the offset of the first central directory record.
    pub fn directory_offset(&self) -> u64 {
        self.directory_offset
    }

    /// Returns the number of central directory records the archive declares.
    pub fn directory_records(&self) -> u64 {
        self.directory_records
    }

    /// Returns the declared size of the central directory in bytes.
    pub fn directory_size(&self) -> u64 {
        self.directory_size
    }

    /// Returns the archive's comment.
    pub fn comment(&self) -> &ZipString {
        &self.comment
    }

    /// Returns whether the values above were taken from a ZIP64 end of central directory record.
    pub fn zip64(&self) -> bool {
        self.zip64
    }

    /// Returns the offset of the (non-ZIP64) end of central directory record's signature.
    pub fn record_offset(&self) -> u64 {
        self.record_offset
    }
}

/// Combines all the fields in EOCDR and Zip64EOCDR into one struct.
struct CombinedCentralDirectoryRecord {
    disk_number: u32,
    disk_number_start_of_cd: u32,
    num_entries_in_directory_on_disk: u64,
    num_entries_in_directory: u64,
    directory_size: u64,
    offset_of_start_of_directory: u64,
}

impl From<&RawEndOfCentralDirectoryRecord> for CombinedCentralDirectoryRecord {
    fn from(record: &RawEndOfCentralDirectoryRecord) -> Self {
        Self {
            disk_number: record.number_of_this_disk.into(),
            disk_number_start_of_cd: record.disk_with_start_of_cd.into(),
            num_entries_in_directory_on_disk: record.total_entries_in_cd_on_this_disk.into(),
            num_entries_in_directory: record.total_entries_in_cd.into(),
            directory_size: record.size_of_cd.into(),
            offset_of_start_of_directory: record.offset_start_of_cd.into(),
        }
    }
}

// The ZIP64 values supersede every 32-bit value, not only those holding sentinels.
impl From<&RawZip64EndOfCentralDirectoryRecord> for CombinedCentralDirectoryRecord {
    fn from(record: &RawZip64EndOfCentralDirectoryRecord) -> Self {
        Self {
            disk_number: record.number_of_this_disk,
            disk_number_start_of_cd: record.disk_with_start_of_cd,
            num_entries_in_directory_on_disk: record.total_entries_in_cd_on_this_disk,
            num_entries_in_directory: record.total_entries_in_cd,
            directory_size: record.size_of_cd,
            offset_of_start_of_directory: record.offset_start_of_cd,
        }
    }
}

/// Locates and parses the end of central directory record (and, where signalled, its ZIP64 counterpart) within the
/// first `size` bytes of the reader.
#[tracing::instrument(skip(reader))]
pub fn end_of_central_directory<R: ReadAt + ?Sized>(reader: &R, size: u64) -> Result<EndOfCentralDirectory> {
    let (record_offset, eocdr) = eocdr(reader, size)?;

    let mut comment = vec![0; eocdr.zip_file_comment_length as usize];
    reader.read_exact_at(record_offset + EOCDR_LENGTH, &mut comment)?;
    let comment = ZipString::new(comment, StringEncoding::Utf8);

    let zip64 = match eocdr.has_zip64_sentinel() {
        true => zip64_eocdr(reader, record_offset)?,
        false => None,
    };

    let (combined, directory_limit) = match &zip64 {
        Some((zip64_offset, zip64_record)) => (CombinedCentralDirectoryRecord::from(zip64_record), *zip64_offset),
        None => (CombinedCentralDirectoryRecord::from(&eocdr), record_offset),
    };

    // Outdated feature so unlikely to ever make it into this crate.
    if combined.disk_number != combined.disk_number_start_of_cd
        || combined.num_entries_in_directory != combined.num_entries_in_directory_on_disk
    {
        return Err(ZipError::FeatureNotSupported("Spanned/split files"));
    }

    if combined.offset_of_start_of_directory > directory_limit {
        return Err(ZipError::MalformedRecord("central directory starts beyond the end of central directory record"));
    }

    tracing::debug!(
        record_offset,
        directory_offset = combined.offset_of_start_of_directory,
        directory_records = combined.num_entries_in_directory,
        zip64 = zip64.is_some(),
        "located end of central directory"
    );

    Ok(EndOfCentralDirectory {
        directory_offset: combined.offset_of_start_of_directory,
        directory_records: combined.num_entries_in_directory,
        directory_size: combined.directory_size,
        comment,
        zip64: zip64.is_some(),
        record_offset,
    })
}

/// Locate the `end of central directory record` offset, if one exists.
/// The returned offset is that of the record's signature.
///
/// This method involves buffered reading in reverse and reverse linear searching along those buffers for the EOCDR
/// signature. Each match is then checked against its declared comment length before being accepted.
pub(crate) fn eocdr<R: ReadAt + ?Sized>(reader: &R, size: u64) -> Result<(u64, RawEndOfCentralDirectoryRecord)> {
    if size < EOCDR_LENGTH {
        return Err(ZipError::NotAZipArchive);
    }

    let signature = eocdr::SIGNATURE.to_le_bytes();
    let lower_bound = size.saturating_sub(SEARCH_WINDOW);
    let mut buffer = [0; BUFFER_SIZE];

    // The exclusive end of the next buffer. A record must fit entirely, so no signature may start past size - 22.
    let mut end = size - EOCDR_LENGTH + SIGNATURE_LENGTH as u64;

    loop {
        let position = end.saturating_sub(BUFFER_SIZE as u64).max(lower_bound);
        let buffer = &mut buffer[..(end - position) as usize];
        reader.read_exact_at(position, buffer)?;

        let mut search_end = buffer.len();
        while let Some(match_index) = reverse_search_buffer(&buffer[..search_end], &signature) {
            let candidate = position + match_index as u64;

            if let Some(record) = validate_candidate(reader, candidate, size)? {
                return Ok((candidate, record));
            }

            search_end = match_index + SIGNATURE_LENGTH - 1;
        }

        // If we hit the start of the data or the lower bound, we're unable to locate the EOCDR.
        if position == lower_bound {
            return Err(ZipError::NotAZipArchive);
        }

        // To handle the case where the EOCDR signature crosses buffer boundaries, we simply overlap reads by the
        // signature length (minus one, so a match is never found twice).
        end = position + SIGNATURE_LENGTH as u64 - 1;
    }
}

/// Reads the fixed EOCDR fields following a signature match, returning them if the comment length is consistent.
fn validate_candidate<R: ReadAt + ?Sized>(
    reader: &R,
    candidate: u64,
    size: u64,
) -> Result<Option<RawEndOfCentralDirectoryRecord>> {
    let mut buffer = [0; eocdr::LENGTH];
    reader.read_exact_at(candidate + SIGNATURE_LENGTH as u64, &mut buffer)?;
    let record = eocdr::raw_read(&mut buffer.as_slice())?;

    if candidate + EOCDR_LENGTH + u64::from(record.zip_file_comment_length) != size {
        tracing::trace!(candidate, "rejected EOCDR signature match with inconsistent comment length");
        return Ok(None);
    }

    Ok(Some(record))
}

/// Follows the ZIP64 EOCDL directly preceding the EOCDR to the ZIP64 EOCDR, returning its offset and contents.
///
/// An absent EOCDL isn't an error; the 32-bit values are used as-is.
fn zip64_eocdr<R: ReadAt + ?Sized>(
    reader: &R,
    eocdr_offset: u64,
) -> Result<Option<(u64, RawZip64EndOfCentralDirectoryRecord)>> {
    let Some(locator_offset) = eocdr_offset.checked_sub(ZIP64_EOCDL_LENGTH) else {
        return Ok(None);
    };

    let mut buffer = [0; ZIP64_EOCDL_LENGTH as usize];
    reader.read_exact_at(locator_offset, &mut buffer)?;
    let mut cursor = buffer.as_slice();

    if read_u32(&mut cursor)? != zip64_locator::SIGNATURE {
        tracing::debug!("sentinel values present without a zip64 end of central directory locator");
        return Ok(None);
    }

    let locator = zip64_locator::raw_read(&mut cursor)?;
    if locator.total_disks > 1 {
        return Err(ZipError::FeatureNotSupported("Spanned/split files"));
    }

    let record_offset = locator.relative_offset_eocdr;
    if record_offset.checked_add(ZIP64_EOCDR_LENGTH).map_or(true, |record_end| record_end > locator_offset) {
        return Err(ZipError::MalformedRecord("zip64 end of central directory record overlaps its locator"));
    }

    let mut buffer = [0; ZIP64_EOCDR_LENGTH as usize];
    reader.read_exact_at(record_offset, &mut buffer)?;
    let mut cursor = buffer.as_slice();

    crate::utils::assert_signature(&mut cursor, zip64_eocdr::SIGNATURE)?;
    let record = zip64_eocdr::raw_read(&mut cursor)?;

    Ok(Some((record_offset, record)))
}

/// A naive reverse linear search along the buffer for the specified signature bytes, returning the index at which
/// the last occurrence starts.
pub(crate) fn reverse_search_buffer(buffer: &[u8], signature: &[u8]) -> Option<usize> {
    buffer.windows(signature.len()).rposition(|window| window == signature)
}
